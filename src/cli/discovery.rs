//! Source file discovery for the `check` command.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::AnalysisError;

/// A source file to analyze, with the path its report is named after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path below the walked directory, or just the file name for files named
    /// on the command line.
    pub relative: PathBuf,
}

/// Expands `paths` into the list of source files to analyze.
///
/// Files named directly are always included. Directories are walked
/// recursively for files ending in `.{ext}`; each directory's matches are
/// sorted so runs are deterministic.
pub fn discover_sources(paths: &[PathBuf], ext: &str) -> Result<Vec<SourceFile>, AnalysisError> {
    let mut sources = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(path) {
                let entry = entry?;
                if entry.file_type().is_file() && has_extension(entry.path(), ext) {
                    let relative = entry
                        .path()
                        .strip_prefix(path)
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|_| file_name(entry.path()));
                    found.push(SourceFile {
                        path: entry.into_path(),
                        relative,
                    });
                }
            }
            found.sort_by(|a, b| a.path.cmp(&b.path));
            sources.extend(found);
        } else {
            sources.push(SourceFile {
                path: path.clone(),
                relative: file_name(path),
            });
        }
    }

    if sources.is_empty() {
        return Err(AnalysisError::NoInputs { ext: ext.into() });
    }
    Ok(sources)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

fn file_name(path: &Path) -> PathBuf {
    path.file_name()
        .map_or_else(|| PathBuf::from("source"), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_walks_directories_and_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.txt"), "#").unwrap();
        fs::write(dir.path().join("a.txt"), "#").unwrap();
        fs::write(dir.path().join("notes.md"), "#").unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "#").unwrap();

        let found = discover_sources(&[dir.path().to_path_buf()], "txt").unwrap();
        let names: Vec<_> = found.iter().map(|s| s.relative.clone()).collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b.txt"),
                PathBuf::from("nested").join("c.txt"),
            ]
        );
        assert!(found.iter().all(|s| s.path == dir.path().join(&s.relative)));
    }

    #[test]
    fn test_same_name_in_sibling_directories_stays_distinct() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["a", "b"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("t1.txt"), "#").unwrap();
        }

        let found = discover_sources(&[dir.path().to_path_buf()], "txt").unwrap();
        let names: Vec<_> = found.iter().map(|s| s.relative.clone()).collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a").join("t1.txt"),
                PathBuf::from("b").join("t1.txt"),
            ]
        );
    }

    #[test]
    fn test_explicit_files_are_kept() {
        let path = PathBuf::from("some").join("does-not-matter.rat");
        let found = discover_sources(&[path.clone()], "txt").unwrap();
        assert_eq!(
            found,
            vec![SourceFile {
                path,
                relative: PathBuf::from("does-not-matter.rat"),
            }]
        );
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_sources(&[dir.path().to_path_buf()], "txt").unwrap_err();
        assert!(matches!(err, AnalysisError::NoInputs { .. }));
    }
}

//! The Rat25F Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions: reading sources, running the analyzer, and
//! writing reports.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, OutputFormat, Rat25fArgs};
use crate::cli::discovery::{discover_sources, SourceFile};
use crate::cli::output::{print_status, render_token_table, Report};
use crate::errors::{print_error, print_with_source, AnalysisError};
use crate::syntax::tokenize;

pub mod args;
pub mod discovery;
pub mod output;

/// Exit status when at least one program was rejected.
const EXIT_REJECTED: i32 = 1;
/// Exit status when the run itself failed (I/O, arguments, serialization).
const EXIT_FAILURE: i32 = 2;

/// The main entry point for the CLI.
pub fn run() {
    let args = Rat25fArgs::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Check {
            paths,
            output,
            format,
            ext,
        } => handle_check(&paths, output.as_deref(), format, &ext),
        Command::Tokens { file } => handle_tokens(&file),
    };

    let _ = std::io::stdout().flush();
    match result {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_REJECTED),
        Err(e) => {
            print_error(e);
            process::exit(EXIT_FAILURE);
        }
    }
}

/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

/// Handles the `check` subcommand. Returns whether every program was accepted.
fn handle_check(
    paths: &[PathBuf],
    output: Option<&Path>,
    format: OutputFormat,
    ext: &str,
) -> Result<bool, AnalysisError> {
    let sources = discover_sources(paths, ext)?;
    let destinations = match output {
        Some(out) => Some(report_destinations(out, &sources, format)?),
        None => None,
    };
    let single = sources.len() == 1;
    let mut all_accepted = true;

    for (i, source) in sources.iter().enumerate() {
        let text = read_source(&source.path)?;
        let report = Report::analyze(&text)?;
        info!(
            path = %source.path.display(),
            accepted = report.is_success(),
            "analyzed source"
        );

        let rendered = report.render(format)?;
        match &destinations {
            None => {
                if !single {
                    println!("==> {} <==", source.path.display());
                }
                print!("{rendered}");
            }
            Some(destinations) => {
                let destination = &destinations[i];
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent).map_err(|e| AnalysisError::io(parent, e))?;
                }
                fs::write(destination, rendered)
                    .map_err(|e| AnalysisError::io(destination, e))?;
                print_status(&report, destination);
            }
        }

        if !report.is_success() {
            all_accepted = false;
            explain_failure(report, &source.path, &text);
        }
    }

    Ok(all_accepted)
}

/// Handles the `tokens` subcommand.
fn handle_tokens(path: &Path) -> Result<bool, AnalysisError> {
    let text = read_source(path)?;
    match tokenize(&text) {
        Ok(tokens) => {
            print!("{}", render_token_table(&tokens));
            Ok(true)
        }
        Err(e) => {
            print_with_source(e, &path.display().to_string(), &text);
            Ok(false)
        }
    }
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn read_source(path: &Path) -> Result<String, AnalysisError> {
    fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))
}

/// One input writes to `out` itself unless `out` is a directory. Otherwise each
/// input writes `<stem>.syntax.<ext>` under `out`, mirroring its path below the
/// walked directory. Two inputs may not share a report.
fn report_destinations(
    out: &Path,
    sources: &[SourceFile],
    format: OutputFormat,
) -> Result<Vec<PathBuf>, AnalysisError> {
    if let [only] = sources {
        if !out.is_dir() {
            debug!(path = %only.path.display(), report = %out.display(), "single report");
            return Ok(vec![out.to_path_buf()]);
        }
    }

    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut destinations = Vec::with_capacity(sources.len());
    for source in sources {
        let stem = source
            .relative
            .file_stem()
            .map_or_else(|| "source".into(), |s| s.to_string_lossy());
        let name = format!("{stem}.syntax.{}", format.extension());
        let destination = out.join(source.relative.with_file_name(name));
        if let Some(first) = claimed.insert(destination.clone(), &source.path) {
            return Err(AnalysisError::ReportClash {
                first: first.to_path_buf(),
                second: source.path.clone(),
                report: destination,
            });
        }
        destinations.push(destination);
    }
    Ok(destinations)
}

/// Renders the failing token against the source on stderr.
fn explain_failure(report: Report, path: &Path, text: &str) {
    let name = path.display().to_string();
    match report {
        Report::Rejected(error) => {
            debug!(path = %name, index = error.index, "syntax error");
            print_with_source(error, &name, text);
        }
        Report::Unlexable(error) => {
            debug!(path = %name, "lexical error");
            print_with_source(error, &name, text);
        }
        Report::Accepted(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(path: &str, relative: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(path),
            relative: PathBuf::from(relative),
        }
    }

    #[test]
    fn test_reports_mirror_relative_paths() {
        let out = tempfile::tempdir().unwrap();
        let sources = [source("in/a/t1.txt", "a/t1.txt"), source("in/b/t1.txt", "b/t1.txt")];
        let destinations = report_destinations(out.path(), &sources, OutputFormat::Json).unwrap();
        assert_eq!(
            destinations,
            vec![
                out.path().join("a").join("t1.syntax.json"),
                out.path().join("b").join("t1.syntax.json"),
            ]
        );
    }

    #[test]
    fn test_shared_report_is_an_error() {
        let out = tempfile::tempdir().unwrap();
        let sources = [source("x/t1.txt", "t1.txt"), source("y/t1.txt", "t1.txt")];
        let err = report_destinations(out.path(), &sources, OutputFormat::Text).unwrap_err();
        match err {
            AnalysisError::ReportClash { first, second, report } => {
                assert_eq!(first, PathBuf::from("x/t1.txt"));
                assert_eq!(second, PathBuf::from("y/t1.txt"));
                assert_eq!(report, out.path().join("t1.syntax.txt"));
            }
            other => panic!("expected a report clash, got {other:?}"),
        }
    }

    #[test]
    fn test_single_input_writes_to_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("syntax_output.txt");
        let destinations =
            report_destinations(&out, &[source("in/t1.txt", "t1.txt")], OutputFormat::Text).unwrap();
        assert_eq!(destinations, vec![out]);
    }
}

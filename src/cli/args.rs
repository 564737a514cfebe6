//! Defines the command-line arguments and subcommands for the Rat25F CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "rat25f",
    version,
    about = "Syntax analyzer for the Rat25F teaching language."
)]
pub struct Rat25fArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Overrides RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check source files against the Rat25F grammar and write a report.
    Check {
        /// Source files, or directories to search for source files.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Report destination: a file for one input, a directory for several.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Report format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Extension of source files picked up from directories.
        #[arg(long, default_value = "txt")]
        ext: String,
    },
    /// Print the token table the lexer produces for a file.
    Tokens {
        /// The path to the Rat25F source file to tokenize.
        #[arg(required = true)]
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    /// File extension for reports written in this format.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Rat25fArgs::command().debug_assert();
    }

    #[test]
    fn test_check_defaults() {
        let args = Rat25fArgs::parse_from(["rat25f", "check", "prog.txt"]);
        match args.command {
            Command::Check {
                paths,
                output,
                format,
                ext,
            } => {
                assert_eq!(paths, vec![PathBuf::from("prog.txt")]);
                assert!(output.is_none());
                assert_eq!(format, OutputFormat::Text);
                assert_eq!(ext, "txt");
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(args.verbose, 0);
    }
}

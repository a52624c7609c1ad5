//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::commands::check::Format;

/// Color output mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "siberian")]
#[command(about = "Expand Siberian declaration macros in Swift sources", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./siberian.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Color output: auto, always, never
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand macros and write the generated source
    Expand {
        /// Files or directories to expand
        #[arg(value_name = "PATHS", required = true)]
        files: Vec<String>,
        /// Output file, or directory when expanding several files (stdout if omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Exit with an error if any file would change, without writing
        #[arg(long)]
        check: bool,
    },

    /// Report macro diagnostics without generating output
    Check {
        /// Files or directories to check
        #[arg(default_value = ".")]
        files: Vec<String>,
        /// Diagnostic output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// List the available macros
    Macros,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_expand() {
        let cli = Cli::try_parse_from(["siberian", "expand", "a.swift", "-o", "out.swift", "--color", "never"]).unwrap();
        assert_eq!(cli.color, ColorMode::Never);
        match cli.command {
            Commands::Expand { files, output, check } => {
                assert_eq!(files, ["a.swift"]);
                assert_eq!(output, Some(PathBuf::from("out.swift")));
                assert!(!check);
            }
            _ => panic!("expected expand"),
        }
    }

    #[test]
    fn test_parse_check_json() {
        let cli = Cli::try_parse_from(["siberian", "--config", "c.toml", "check", "--format", "json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        match cli.command {
            Commands::Check { files, format } => {
                assert_eq!(files, ["."]);
                assert_eq!(format, Format::Json);
            }
            _ => panic!("expected check"),
        }
    }
}

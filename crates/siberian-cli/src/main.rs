//! `siberian` command-line tool
//!
//! Expands `@AutoMockable`, `@PublicMemberwiseInit` and `@CustomCodable` in
//! Swift sources, reports their diagnostics and lists the available macros.

use clap::Parser;
use siberian_cli::cli::{Cli, Commands};
use siberian_cli::commands::{self, check, expand, macros};
use siberian_cli::output::{resolve_color_choice, StyledOutput};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Initialize tracing if SIBERIAN_LOG is set
    if let Ok(filter) = EnvFilter::try_from_env("SIBERIAN_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run one command; `Ok(false)` means it finished but failed.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut output = StyledOutput::new(resolve_color_choice(cli.color));

    match cli.command {
        Commands::Expand { files, output: out, check } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let options = expand::ExpandOptions {
                files,
                output: out,
                check,
            };
            let report = expand::execute(&options, &config, &mut output)?;
            Ok(report.is_success(check))
        }

        Commands::Check { files, format } => {
            let config = commands::load_config(cli.config.as_deref())?;
            let report = check::execute(&files, format, &config, &mut output)?;
            Ok(report.is_success())
        }

        Commands::Macros => {
            macros::execute(&mut output)?;
            Ok(true)
        }
    }
}

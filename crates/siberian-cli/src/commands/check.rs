//! `siberian check`: Report macro diagnostics without writing output.

use anyhow::Context;
use clap::ValueEnum;
use siberian_macros::diagnostic::{create_files, JsonDiagnostic};
use siberian_macros::{expand_source, ExpansionConfig};
use termcolor::WriteColor;

use super::files::{collect_swift_files, SwiftSource};
use crate::output::{count_severities, StyledOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Rendered with source snippets on stderr
    #[default]
    Pretty,
    /// One JSON array on stdout
    Json,
}

#[derive(Debug, Default)]
pub struct CheckReport {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckReport {
    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}

pub fn execute<O: WriteColor, E: WriteColor>(
    files: &[String],
    format: Format,
    config: &ExpansionConfig,
    output: &mut StyledOutput<O, E>,
) -> anyhow::Result<CheckReport> {
    let sources = collect_swift_files(files)?;
    if sources.is_empty() {
        anyhow::bail!("no .swift files found");
    }

    let mut report = CheckReport {
        files: sources.len(),
        ..Default::default()
    };
    let mut json: Vec<JsonDiagnostic> = Vec::new();

    for SwiftSource { path, .. } in &sources {
        let source = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let expansion = expand_source(&source, config);

        let (errors, warnings) = count_severities(&expansion.diagnostics);
        report.errors += errors;
        report.warnings += warnings;

        match format {
            Format::Pretty => output.diagnostics(path, &source, &expansion.diagnostics)?,
            Format::Json => {
                let files = create_files(path.as_path(), source.as_str());
                json.extend(
                    expansion
                        .diagnostics
                        .iter()
                        .map(|d| JsonDiagnostic::from_diagnostic(d, &files, 0)),
                );
            }
        }
    }

    match format {
        Format::Pretty => output.summary("Checked", report.files, report.errors, report.warnings),
        Format::Json => {
            let text = serde_json::to_string_pretty(&json)?;
            output.result(&text)?;
            output.result("\n")?;
        }
    }
    output.flush();

    Ok(report)
}

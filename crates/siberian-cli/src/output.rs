//! Shared colored output utilities for CLI commands.
//!
//! Uses `termcolor` for cross-platform colored terminal output.
//! Respects `NO_COLOR` environment variable and `--color` flag.

use crate::cli::ColorMode;
use anyhow::Context;
use siberian_macros::diagnostic::create_files;
use siberian_macros::{Diagnostic, Severity};
use std::io::Write;
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(mode: ColorMode) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto => ColorChoice::Auto,
    }
}

/// Styled output: results on `out`, diagnostics and status lines on `err`.
pub struct StyledOutput<O = StandardStream, E = StandardStream> {
    pub out: O,
    pub err: E,
}

impl StyledOutput {
    /// Standard streams with the given color choice.
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            out: StandardStream::stdout(choice),
            err: StandardStream::stderr(choice),
        }
    }
}

impl<O: WriteColor, E: WriteColor> StyledOutput<O, E> {
    pub fn with_writers(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Write `text` to the result stream verbatim.
    pub fn result(&mut self, text: &str) -> std::io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    /// Cargo-style status line on stderr: a right-aligned bold label, then the text.
    pub fn status(&mut self, label: &str, color: Color, text: &str) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color)).set_bold(true);
        let _ = self.err.set_color(&spec);
        let _ = write!(self.err, "{:>12}", label);
        let _ = self.err.reset();
        let _ = writeln!(self.err, " {}", text);
    }

    /// Render the diagnostics of one file with source snippets.
    pub fn diagnostics(&mut self, path: &Path, source: &str, diagnostics: &[Diagnostic]) -> anyhow::Result<()> {
        if diagnostics.is_empty() {
            return Ok(());
        }
        let files = create_files(path, source);
        for diagnostic in diagnostics {
            diagnostic
                .emit(&mut self.err, &files, 0)
                .with_context(|| format!("failed to render diagnostics for {}", path.display()))?;
        }
        Ok(())
    }

    /// Final one-line summary.
    pub fn summary(&mut self, verb: &str, files: usize, errors: usize, warnings: usize) {
        let text = format!(
            "{} {} file(s): {} error(s), {} warning(s)",
            verb, files, errors, warnings
        );
        if errors > 0 {
            self.status("Failed", Color::Red, &text);
        } else if warnings > 0 {
            self.status("Finished", Color::Yellow, &text);
        } else {
            self.status("Finished", Color::Green, &text);
        }
    }

    pub fn flush(&mut self) {
        let _ = self.out.flush();
        let _ = self.err.flush();
    }
}

/// Error and warning counts over a set of diagnostics.
pub fn count_severities(diagnostics: &[Diagnostic]) -> (usize, usize) {
    diagnostics.iter().fold((0, 0), |(errors, warnings), d| match d.severity {
        Severity::Error => (errors + 1, warnings),
        Severity::Warning => (errors, warnings + 1),
        Severity::Note => (errors, warnings),
    })
}

//! `siberian expand`: Expand macros and write the result.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rustc_hash::FxHashMap;
use siberian_macros::{expand_source, ExpansionConfig};
use termcolor::{Color, WriteColor};

use super::files::{collect_swift_files, SwiftSource};
use crate::output::{count_severities, StyledOutput};

pub struct ExpandOptions {
    pub files: Vec<String>,
    /// Output file (one input) or directory; stdout when absent
    pub output: Option<PathBuf>,
    /// Report files that would change without writing anything
    pub check: bool,
}

#[derive(Debug, Default)]
pub struct ExpandReport {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Inputs whose expansion differs from the source
    pub changed: Vec<PathBuf>,
    pub written: Vec<PathBuf>,
}

impl ExpandReport {
    pub fn is_success(&self, check: bool) -> bool {
        self.errors == 0 && !(check && !self.changed.is_empty())
    }
}

enum OutputTarget {
    Stdout,
    File(PathBuf),
    Dir(PathBuf),
}

impl OutputTarget {
    fn resolve(output: Option<&Path>, inputs: usize) -> Self {
        match output {
            None => OutputTarget::Stdout,
            Some(path) if inputs == 1 && !path.is_dir() => OutputTarget::File(path.to_path_buf()),
            Some(path) => OutputTarget::Dir(path.to_path_buf()),
        }
    }

    /// Where `source` is written; `None` for stdout. Directory output keeps
    /// each file's location below its input directory.
    fn destination(&self, source: &SwiftSource) -> Option<PathBuf> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(file) => Some(file.clone()),
            OutputTarget::Dir(dir) => Some(dir.join(&source.relative)),
        }
    }

    /// Fail before anything is written when two inputs map to one output.
    fn check_collisions(&self, sources: &[SwiftSource]) -> anyhow::Result<()> {
        let mut seen: FxHashMap<PathBuf, &Path> = FxHashMap::default();
        for source in sources {
            let Some(destination) = self.destination(source) else {
                continue;
            };
            if let Some(first) = seen.insert(destination.clone(), &source.path) {
                anyhow::bail!(
                    "{} and {} would both be written to {}",
                    first.display(),
                    source.path.display(),
                    destination.display()
                );
            }
        }
        Ok(())
    }
}

pub fn execute<O: WriteColor, E: WriteColor>(
    options: &ExpandOptions,
    config: &ExpansionConfig,
    output: &mut StyledOutput<O, E>,
) -> anyhow::Result<ExpandReport> {
    // 1. Collect source files
    let sources = collect_swift_files(&options.files)?;
    if sources.is_empty() {
        anyhow::bail!("no .swift files found");
    }
    let target = OutputTarget::resolve(options.output.as_deref(), sources.len());
    if !options.check {
        target.check_collisions(&sources)?;
    }

    let mut report = ExpandReport {
        files: sources.len(),
        ..Default::default()
    };

    // 2. Expand each file
    for input in &sources {
        let path = &input.path;
        let source = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let expansion = expand_source(&source, config);
        output.diagnostics(path, &source, &expansion.diagnostics)?;

        let (errors, warnings) = count_severities(&expansion.diagnostics);
        report.errors += errors;
        report.warnings += warnings;

        let changed = expansion.source != source;
        tracing::debug!(path = %path.display(), changed, errors, warnings, "expanded file");

        if options.check {
            if changed {
                output.status("Would expand", Color::Yellow, &path.display().to_string());
                report.changed.push(path.clone());
            }
            continue;
        }

        // A file with errors is never written
        if errors > 0 {
            output.status("Skipped", Color::Red, &path.display().to_string());
            continue;
        }
        if changed {
            report.changed.push(path.clone());
        }

        // 3. Write the result
        let Some(destination) = target.destination(input) else {
            output.result(&expansion.source)?;
            continue;
        };
        write_file(&destination, &expansion.source)?;
        output.status("Wrote", Color::Green, &destination.display().to_string());
        report.written.push(destination);
    }

    // 4. Summary
    let verb = if options.check { "Checked" } else { "Expanded" };
    output.summary(verb, report.files, report.errors, report.warnings);
    output.flush();

    Ok(report)
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

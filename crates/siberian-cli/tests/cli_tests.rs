//! Integration tests for the `expand` and `check` commands.

use pretty_assertions::assert_eq;
use siberian_cli::commands::check::{self, Format};
use siberian_cli::commands::expand::{self, ExpandOptions};
use siberian_cli::output::StyledOutput;
use siberian_macros::ExpansionConfig;
use std::path::Path;
use tempfile::TempDir;
use termcolor::Buffer;

const SERVICE: &str = "@AutoMockable
protocol Service {
    func load(id: Int) -> String
}
";

const MISPLACED: &str = "@AutoMockable
struct Model {
    var id: Int
}
";

fn buffers() -> StyledOutput<Buffer, Buffer> {
    StyledOutput::with_writers(Buffer::no_color(), Buffer::no_color())
}

fn text(buffer: &Buffer) -> String {
    String::from_utf8_lossy(buffer.as_slice()).to_string()
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.display().to_string()
}

#[test]
fn test_expand_to_stdout() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "Service.swift", SERVICE);
    let mut output = buffers();

    let options = ExpandOptions {
        files: vec![file],
        output: None,
        check: false,
    };
    let report = expand::execute(&options, &ExpansionConfig::default(), &mut output).unwrap();

    assert!(report.is_success(false));
    assert_eq!(report.changed.len(), 1);
    let stdout = text(&output.out);
    assert!(stdout.starts_with("protocol Service {"));
    assert!(stdout.contains("class MockService: Service {"));
    assert!(stdout.contains("    var loadIdReceivedId: Int?"));
}

#[test]
fn test_expand_to_output_file() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "Service.swift", SERVICE);
    let destination = dir.path().join("generated/Service.swift");
    let mut output = buffers();

    let options = ExpandOptions {
        files: vec![file.clone()],
        output: Some(destination.clone()),
        check: false,
    };
    let report = expand::execute(&options, &ExpansionConfig::default(), &mut output).unwrap();

    assert_eq!(report.written, [destination.clone()]);
    let generated = std::fs::read_to_string(&destination).unwrap();
    assert!(generated.contains("func load(id: Int) -> String {"));
    // The input is left alone
    assert_eq!(std::fs::read_to_string(&file).unwrap(), SERVICE);
    assert!(output.out.as_slice().is_empty());
}

#[test]
fn test_expand_directory_into_directory() {
    let dir = TempDir::new().unwrap();
    let sources = dir.path().join("Sources");
    std::fs::create_dir_all(&sources).unwrap();
    write(&sources, "Service.swift", SERVICE);
    write(&sources, "Plain.swift", "struct Plain {\n}\n");
    let out_dir = dir.path().join("out");
    let mut output = buffers();

    let options = ExpandOptions {
        files: vec![sources.display().to_string()],
        output: Some(out_dir.clone()),
        check: false,
    };
    let report = expand::execute(&options, &ExpansionConfig::default(), &mut output).unwrap();

    assert_eq!(report.files, 2);
    assert_eq!(report.changed.len(), 1);
    assert_eq!(std::fs::read_to_string(out_dir.join("Plain.swift")).unwrap(), "struct Plain {\n}\n");
    assert!(std::fs::read_to_string(out_dir.join("Service.swift"))
        .unwrap()
        .contains("class MockService"));
}

#[test]
fn test_expand_check_reports_changes() {
    let dir = TempDir::new().unwrap();
    let changed = write(dir.path(), "Service.swift", SERVICE);
    let unchanged = write(dir.path(), "Plain.swift", "struct Plain {\n}\n");
    let mut output = buffers();

    let options = ExpandOptions {
        files: vec![changed.clone(), unchanged],
        output: None,
        check: true,
    };
    let report = expand::execute(&options, &ExpansionConfig::default(), &mut output).unwrap();

    assert!(!report.is_success(true));
    assert_eq!(report.changed.len(), 1);
    assert!(report.written.is_empty());
    assert!(output.out.as_slice().is_empty());
    assert!(text(&output.err).contains(&format!("Would expand {}", changed)));
}

#[test]
fn test_expand_skips_files_with_errors() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "Model.swift", MISPLACED);
    let mut output = buffers();

    let options = ExpandOptions {
        files: vec![file],
        output: None,
        check: false,
    };
    let report = expand::execute(&options, &ExpansionConfig::default(), &mut output).unwrap();

    assert_eq!(report.errors, 1);
    assert!(!report.is_success(false));
    assert!(output.out.as_slice().is_empty());
    let stderr = text(&output.err);
    assert!(stderr.contains("error[AutoMockable.invalidInputType]: @AutoMockable is only applicable to protocols"));
    assert!(stderr.contains("Skipped"));
}

#[test]
fn test_expand_without_sources_fails() {
    let dir = TempDir::new().unwrap();
    let mut output = buffers();
    let options = ExpandOptions {
        files: vec![dir.path().display().to_string()],
        output: None,
        check: false,
    };
    let err = expand::execute(&options, &ExpansionConfig::default(), &mut output).unwrap_err();
    assert_eq!(err.to_string(), "no .swift files found");
}

#[test]
fn test_check_pretty() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "Model.swift", MISPLACED);
    let mut output = buffers();

    let report = check::execute(&[file], Format::Pretty, &ExpansionConfig::default(), &mut output).unwrap();

    assert!(!report.is_success());
    let stderr = text(&output.err);
    assert!(stderr.contains("Model.swift:1:1"));
    assert!(stderr.contains("attached to a struct declaration"));
    assert!(stderr.contains("Failed Checked 1 file(s): 1 error(s), 0 warning(s)"));
}

#[test]
fn test_check_json() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "Model.swift", MISPLACED);
    write(dir.path(), "Service.swift", SERVICE);
    let mut output = buffers();

    let report = check::execute(
        &[dir.path().display().to_string()],
        Format::Json,
        &ExpansionConfig::default(),
        &mut output,
    )
    .unwrap();

    assert_eq!((report.files, report.errors, report.warnings), (2, 1, 0));
    let json: serde_json::Value = serde_json::from_str(&text(&output.out)).unwrap();
    let diagnostics = json.as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["code"], "AutoMockable.invalidInputType");
    assert_eq!(diagnostics[0]["severity"], "error");
    assert_eq!(diagnostics[0]["labels"][0]["file"], file.as_str());
    assert_eq!(diagnostics[0]["labels"][0]["start_line"], 1);
    assert!(output.err.as_slice().is_empty());
}

#[test]
fn test_expand_directory_keeps_relative_paths() {
    let dir = TempDir::new().unwrap();
    let sources = dir.path().join("Sources");
    std::fs::create_dir_all(sources.join("Billing")).unwrap();
    std::fs::create_dir_all(sources.join("Shipping")).unwrap();
    write(&sources.join("Billing"), "Service.swift", SERVICE);
    write(&sources.join("Shipping"), "Service.swift", "struct Service {\n}\n");
    let out_dir = dir.path().join("out");
    let mut output = buffers();

    let options = ExpandOptions {
        files: vec![sources.display().to_string()],
        output: Some(out_dir.clone()),
        check: false,
    };
    let report = expand::execute(&options, &ExpansionConfig::default(), &mut output).unwrap();

    assert_eq!(
        report.written,
        [out_dir.join("Billing/Service.swift"), out_dir.join("Shipping/Service.swift")]
    );
    assert!(std::fs::read_to_string(out_dir.join("Billing/Service.swift"))
        .unwrap()
        .contains("class MockService"));
    assert_eq!(
        std::fs::read_to_string(out_dir.join("Shipping/Service.swift")).unwrap(),
        "struct Service {\n}\n"
    );
}

#[test]
fn test_expand_refuses_colliding_outputs() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("a")).unwrap();
    std::fs::create_dir_all(dir.path().join("b")).unwrap();
    let first = write(&dir.path().join("a"), "Service.swift", SERVICE);
    let second = write(&dir.path().join("b"), "Service.swift", SERVICE);
    let out_dir = dir.path().join("out");
    let mut output = buffers();

    let options = ExpandOptions {
        files: vec![first.clone(), second.clone()],
        output: Some(out_dir.clone()),
        check: false,
    };
    let err = expand::execute(&options, &ExpansionConfig::default(), &mut output).unwrap_err();

    assert_eq!(
        err.to_string(),
        format!(
            "{} and {} would both be written to {}",
            first,
            second,
            out_dir.join("Service.swift").display()
        )
    );
    assert!(!out_dir.exists());
}

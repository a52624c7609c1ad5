//! Shared file collection utilities for CLI commands.

use std::path::{Path, PathBuf};

const SWIFT_EXTENSION: &str = "swift";

/// Directories that hold build products or vendored code
const SKIPPED_DIRS: &[&str] = &["DerivedData", "Pods", "Carthage"];

/// A collected source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwiftSource {
    pub path: PathBuf,
    /// Location below the directory argument it was found in; just the file
    /// name for a file named explicitly
    pub relative: PathBuf,
}

/// Collect all .swift source files from the given paths (files or directories).
///
/// A file named explicitly is taken whatever its extension. Directories are
/// searched recursively and the result is sorted.
pub fn collect_swift_files(paths: &[String]) -> anyhow::Result<Vec<SwiftSource>> {
    let mut files = Vec::new();

    for path_str in paths {
        let path = Path::new(path_str);
        if path.is_file() {
            files.push(SwiftSource {
                path: path.to_path_buf(),
                relative: relative_to(path.parent().unwrap_or(path), path),
            });
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_swift_in_dir(path, &mut found)?;
            found.sort();
            files.extend(found.into_iter().map(|file| SwiftSource {
                relative: relative_to(path, &file),
                path: file,
            }));
        } else {
            anyhow::bail!("{}: no such file or directory", path_str);
        }
    }

    Ok(files)
}

fn relative_to(root: &Path, file: &Path) -> PathBuf {
    match file.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => file.file_name().map(PathBuf::from).unwrap_or_else(|| file.to_path_buf()),
    }
}

/// Recursively collect .swift files in a directory.
fn collect_swift_in_dir(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        // Skip hidden dirs (.build, .git, .swiftpm) and build products
        if path.is_dir() {
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.starts_with('.') || SKIPPED_DIRS.contains(&name_str.as_ref()) {
                continue;
            }
            collect_swift_in_dir(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(SWIFT_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collects_recursively_and_skips_build_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("Sources/App")).unwrap();
        std::fs::create_dir_all(root.join(".build/debug")).unwrap();
        std::fs::create_dir_all(root.join("Pods/Lib")).unwrap();
        std::fs::write(root.join("Sources/App/b.swift"), "").unwrap();
        std::fs::write(root.join("Sources/App/a.swift"), "").unwrap();
        std::fs::write(root.join("Sources/App/notes.md"), "").unwrap();
        std::fs::write(root.join(".build/debug/gen.swift"), "").unwrap();
        std::fs::write(root.join("Pods/Lib/lib.swift"), "").unwrap();

        let files = collect_swift_files(&[root.display().to_string()]).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.relative.clone()).collect();
        assert_eq!(
            names,
            [PathBuf::from("Sources/App/a.swift"), PathBuf::from("Sources/App/b.swift")]
        );
        assert_eq!(files[0].path, root.join("Sources/App/a.swift"));

        let nested = collect_swift_files(&[root.join("Sources").display().to_string()]).unwrap();
        assert_eq!(nested[1].relative, PathBuf::from("App/b.swift"));
    }

    #[test]
    fn test_explicit_file_and_missing_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Model.swift.in");
        std::fs::write(&file, "").unwrap();

        let files = collect_swift_files(&[file.display().to_string()]).unwrap();
        assert_eq!(files[0].path, file);
        assert_eq!(files[0].relative, PathBuf::from("Model.swift.in"));

        let missing = dir.path().join("missing.swift").display().to_string();
        assert!(collect_swift_files(&[missing]).is_err());
    }
}

//! CLI command implementations

pub mod check;
pub mod expand;
pub mod files;
pub mod macros;

use anyhow::Context;
use siberian_macros::ExpansionConfig;
use std::path::Path;

/// Load the expansion config: `--config PATH` when given, otherwise
/// `siberian.toml` in the working directory, otherwise defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ExpansionConfig> {
    match path {
        Some(path) => ExpansionConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("failed to read the working directory")?;
            ExpansionConfig::discover(&cwd).context("failed to load siberian.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siberian_macros::NamingStrategy;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_config_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[mock]\nnaming = \"indexed\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.mock.naming, NamingStrategy::Indexed);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().starts_with("failed to load config from"));
    }
}

//! Expansion settings (`siberian.toml`)
//!
//! ```toml
//! [mock]
//! prefix = "Mock"
//! backing-prefix = "__"
//! naming = "shared"
//!
//! [memberwise]
//! access = "public"
//!
//! [output]
//! indent = 4
//! ```
//!
//! Every key is optional.

use crate::naming::NamingStrategy;
use serde::{Deserialize, Serialize};
use siberian_syntax::ast::ACCESS_MODIFIERS;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "siberian.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Settings shared by every macro in one expansion run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExpansionConfig {
    pub mock: MockConfig,
    pub memberwise: MemberwiseConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MockConfig {
    /// Prepended to the protocol name to form the mock class name
    pub prefix: String,

    /// Prepended to a property name to form its backing field
    pub backing_prefix: String,

    /// How repeated function stems are handled
    pub naming: NamingStrategy,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            prefix: "Mock".to_string(),
            backing_prefix: "__".to_string(),
            naming: NamingStrategy::Shared,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MemberwiseConfig {
    /// Access modifier of the generated initializer; empty for none
    pub access: String,
}

impl Default for MemberwiseConfig {
    fn default() -> Self {
        Self {
            access: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Spaces per indentation level in generated code
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: siberian_syntax::DEFAULT_INDENT,
        }
    }
}

impl ExpansionConfig {
    /// Load config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: ExpansionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `siberian.toml` from `dir`, falling back to defaults when absent
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_identifier_fragment(&self.mock.prefix) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid mock prefix: '{}'. Must be a non-empty identifier",
                self.mock.prefix
            )));
        }

        if !is_identifier_fragment(&self.mock.backing_prefix) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid backing prefix: '{}'. Must be a non-empty identifier",
                self.mock.backing_prefix
            )));
        }

        let access = self.memberwise.access.as_str();
        if !access.is_empty() && (access == "open" || !ACCESS_MODIFIERS.contains(&access)) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid initializer access: '{}'",
                access
            )));
        }

        if self.output.indent == 0 || self.output.indent > 16 {
            return Err(ConfigError::ValidationError(format!(
                "Invalid indent: {}. Must be between 1 and 16",
                self.output.indent
            )));
        }

        Ok(())
    }
}

fn is_identifier_fragment(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = ExpansionConfig::from_str("").unwrap();
        assert_eq!(config, ExpansionConfig::default());
        assert_eq!(config.mock.prefix, "Mock");
        assert_eq!(config.mock.backing_prefix, "__");
        assert_eq!(config.memberwise.access, "public");
        assert_eq!(config.output.indent, 4);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
[mock]
prefix = "Fake"
naming = "indexed"

[output]
indent = 2
"#;
        let config = ExpansionConfig::from_str(toml).unwrap();
        assert_eq!(config.mock.prefix, "Fake");
        assert_eq!(config.mock.backing_prefix, "__");
        assert_eq!(config.mock.naming, NamingStrategy::Indexed);
        assert_eq!(config.output.indent, 2);
    }

    #[test]
    fn test_backing_prefix_key_is_kebab_case() {
        let config = ExpansionConfig::from_str("[mock]\nbacking-prefix = \"_stub_\"").unwrap();
        assert_eq!(config.mock.backing_prefix, "_stub_");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = ExpansionConfig::from_str("[mock]\nprefx = \"Fake\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ExpansionConfig::from_str("[mock]\nprefix = \"1Mock\""),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            ExpansionConfig::from_str("[memberwise]\naccess = \"open\""),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            ExpansionConfig::from_str("[output]\nindent = 0"),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(ExpansionConfig::from_str("[memberwise]\naccess = \"\"").is_ok());
    }

    #[test]
    fn test_discover_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ExpansionConfig::discover(dir.path()).unwrap(), ExpansionConfig::default());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[memberwise]\naccess = \"internal\"").unwrap();
        let config = ExpansionConfig::discover(dir.path()).unwrap();
        assert_eq!(config.memberwise.access, "internal");
    }
}

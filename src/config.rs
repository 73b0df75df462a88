//! Configuration for content schema tooling
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (content-schemas.toml)
//! - Environment variables (CONTENT_SCHEMAS__*)
//!
//! ## Example config file (content-schemas.toml):
//! ```toml
//! [registry]
//! path = "./schemas"
//! root = "./packs"
//!
//! [resolve]
//! default_version = "1.21.0"
//! output_format = "pretty"
//!
//! [logging]
//! level = "info"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::version::FormatVersion;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Resolution settings
    #[serde(default)]
    pub resolve: ResolveConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry file, or directory of entry files
    #[serde(default = "default_registry_path")]
    pub path: PathBuf,

    /// Directory that relative `fileMatch` patterns are anchored to
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// Resolution configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Version assumed for documents that declare none
    #[serde(default)]
    pub default_version: Option<String>,

    /// Output format for resolved schemas
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_registry_path() -> PathBuf {
    PathBuf::from("schemas")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: default_registry_path(),
            root: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SchemaConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "content-schemas.toml",
            ".content-schemas.toml",
            "config/content-schemas.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "content-schemas") {
            let xdg_config = config_dir.config_dir().join("content-schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // CONTENT_SCHEMAS__RESOLVE__DEFAULT_VERSION=1.21.0
        builder = builder.add_source(
            Environment::with_prefix("CONTENT_SCHEMAS")
                .prefix_separator("__")
                .separator("__"),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Get the registry path (resolves relative paths)
    pub fn registry_path(&self) -> PathBuf {
        absolute(&self.registry.path)
    }

    /// Get the pattern root, if configured
    pub fn registry_root(&self) -> Option<PathBuf> {
        self.registry.root.as_deref().map(absolute)
    }

    /// Parsed default version
    pub fn default_version(&self) -> Option<FormatVersion> {
        self.resolve
            .default_version
            .as_deref()
            .map(FormatVersion::parse)
    }

    /// Check settings that cannot be validated by deserialization alone
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(version) = &self.resolve.default_version {
            FormatVersion::parse_strict(version)?;
        }
        Ok(())
    }
}

fn absolute(path: &std::path::Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = SchemaConfig::default();
        assert_eq!(config.registry.path, PathBuf::from("schemas"));
        assert_eq!(config.logging.level, "info");
        assert!(config.default_version().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialize_config() {
        let config = SchemaConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[registry]"));
        assert!(toml_str.contains("[resolve]"));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[registry]\npath = \"/data/schemas\"\n\n[resolve]\ndefault_version = \"1.20.0\"\noutput_format = \"compact\"\n",
        )
        .unwrap();

        let config = SchemaConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.registry_path(), PathBuf::from("/data/schemas"));
        assert_eq!(config.default_version(), Some(FormatVersion::parse("1.20")));
        assert!(matches!(config.resolve.output_format, OutputFormat::Compact));
    }

    #[test]
    fn test_validate_rejects_malformed_default_version() {
        let mut config = SchemaConfig::default();
        config.resolve.default_version = Some("1.x".to_string());
        assert!(config.validate().is_err());
    }
}

//! Engine configuration
//!
//! Loaded from YAML. Every field has a default, so an empty document is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable naming a YAML config file
pub const CONFIG_ENV_VAR: &str = "DRAFT_CONFIG";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// On-disk encoding of a graph dump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    #[default]
    Json,
    Binary,
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpFormat::Json => write!(f, "json"),
            DumpFormat::Binary => write!(f, "binary"),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Graph name, used in log output
    pub name: String,
    /// Dump to preload at start (None = start empty)
    pub dump_path: Option<PathBuf>,
    /// Encoding of `dump_path`
    pub dump_format: DumpFormat,
    /// trace, debug, info, warn or error
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "draft".to_string(),
            dump_path: None,
            dump_format: DumpFormat::Json,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Load from the file named by `DRAFT_CONFIG`, or fall back to defaults
    pub fn from_env() -> ConfigResult<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::from_file(PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }

    /// Configured log level as a tracing level
    pub fn tracing_level(&self) -> ConfigResult<tracing::Level> {
        tracing::Level::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.name, "draft");
        assert_eq!(config.dump_path, None);
        assert_eq!(config.dump_format, DumpFormat::Json);
        assert_eq!(config.tracing_level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(EngineConfig::from_yaml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = EngineConfig::from_yaml_str(
            "name: garden\ndump_path: /tmp/garden.bin\ndump_format: binary\n",
        )
        .unwrap();
        assert_eq!(config.name, "garden");
        assert_eq!(config.dump_path, Some(PathBuf::from("/tmp/garden.bin")));
        assert_eq!(config.dump_format, DumpFormat::Binary);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            EngineConfig::from_yaml_str("dump_format: xml"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_log_levels() {
        let mut config = EngineConfig::default();
        config.log_level = "DEBUG".to_string();
        assert_eq!(config.tracing_level().unwrap(), tracing::Level::DEBUG);

        config.log_level = "loud".to_string();
        assert!(matches!(
            config.tracing_level(),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level: warn").unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tracing_level().unwrap(), tracing::Level::WARN);

        assert!(matches!(
            EngineConfig::from_file("/nonexistent/draft.yaml"),
            Err(ConfigError::Io { .. })
        ));
    }
}

//! Configuration file loading for the negamax driver.
//!
//! Settings come from an optional TOML file; command-line flags override
//! whatever the file provides.

use chess_engine::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A value parsed but makes no sense.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Driver configuration.
///
/// ```toml
/// log_level = "info"
///
/// [search]
/// depth = 4
/// parallel = false
/// threads = 0
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Search settings.
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            search: SearchConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from [`Self::default_path()`]
    /// when no path is given.
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, or
    /// [`ConfigError::Invalid`] if the search depth is zero.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the path of the implicit configuration file.
    ///
    /// Currently returns `negamax.toml` in the current working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("negamax.toml")
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.depth == 0 {
            return Err(ConfigError::Invalid(
                "search.depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
log_level = "debug"

[search]
depth = 3
parallel = true
threads = 2
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.search,
            SearchConfig {
                depth: 3,
                parallel: true,
                threads: 2
            }
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("[search]\nparallel = true\n").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.search.depth, SearchConfig::default().depth);
        assert!(config.search.parallel);

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[search]\ndepth = 2").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.search.depth, 2);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_invalid_toml_and_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[search\ndepth = ").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::ParseError(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[search]\ndepth = 0").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("depth"));
    }
}

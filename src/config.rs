// rc file configuration (~/.crawlboard/rc)
//
// Plain `key=value` lines, `#` starts a comment:
//
//   data.location=./board.db
//   status.open.text=NEW
//   status.waiting.color=info
//   status.finished.rank=2

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use thiserror::Error;

use crate::badge::{CatalogError, ColorToken, StatusCatalog};
use crate::models::Status;

/// Failure to load the rc file. Reported to the user as a usage error
/// rather than an internal one.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Database path, already resolved against the rc file directory
    pub data_location: Option<PathBuf>,
    /// Standard catalog with any `status.*` overrides applied
    pub catalog: StatusCatalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_location: None,
            catalog: StatusCatalog::standard(),
        }
    }
}

impl Config {
    /// Directory holding the rc file and the default database
    pub fn config_dir() -> PathBuf {
        let home = std::env::var_os("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(".crawlboard")
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("rc")
    }

    /// Load the rc file, falling back to defaults when it does not exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load a specific rc file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse(&content, base_dir).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse rc content; relative `data.location` values resolve against `base_dir`
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self> {
        let mut config = Self::default();
        let mut builder = StatusCatalog::standard().to_builder();

        for (lineno, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                anyhow::bail!("Line {}: expected key=value, got '{}'", lineno + 1, line);
            };
            let (key, value) = (key.trim(), value.trim());

            if key == "data.location" {
                let path = PathBuf::from(value);
                config.data_location = Some(if path.is_relative() {
                    base_dir.join(path)
                } else {
                    path
                });
                continue;
            }

            if let Some(rest) = key.strip_prefix("status.") {
                let Some((status_key, field)) = rest.rsplit_once('.') else {
                    anyhow::bail!("Line {}: malformed status key '{}'", lineno + 1, key);
                };
                let status = Status::from_str(status_key)
                    .ok_or_else(|| CatalogError::UnknownStatus(status_key.to_string()))?;
                let style = builder
                    .style_mut(status)
                    .ok_or_else(|| CatalogError::UnknownStatus(status_key.to_string()))?;
                match field {
                    "text" => style.display_text = value.to_string(),
                    "color" => style.color = ColorToken::parse(value)?,
                    "rank" => {
                        style.rank = if value.eq_ignore_ascii_case("none") {
                            None
                        } else {
                            Some(value.parse::<u32>().with_context(|| {
                                format!("Line {}: invalid rank '{}'", lineno + 1, value)
                            })?)
                        };
                    }
                    _ => anyhow::bail!("Line {}: unknown status field '{}'", lineno + 1, field),
                }
                continue;
            }

            log::warn!("Ignoring unknown config key '{}'", key);
        }

        config.catalog = builder.build();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_location_relative() {
        let config = Config::parse("data.location=./custom.db\n", Path::new("/tmp/cb")).unwrap();
        assert_eq!(config.data_location, Some(PathBuf::from("/tmp/cb/./custom.db")));
    }

    #[test]
    fn test_parse_data_location_absolute() {
        let config = Config::parse("data.location=/var/lib/board.db", Path::new("/tmp")).unwrap();
        assert_eq!(config.data_location, Some(PathBuf::from("/var/lib/board.db")));
    }

    #[test]
    fn test_parse_status_overrides() {
        let content = "# catalog tweaks\nstatus.open.text=NEW\nstatus.waiting.color=info\nstatus.finished.rank=none\n";
        let config = Config::parse(content, Path::new(".")).unwrap();
        let open = config.catalog.lookup(Status::Open).unwrap();
        assert_eq!(open.display_text, "NEW");
        assert_eq!(open.color, ColorToken::Danger);
        assert_eq!(config.catalog.lookup(Status::Waiting).unwrap().color, ColorToken::Info);
        assert_eq!(config.catalog.lookup(Status::Finished).unwrap().rank, None);
    }

    #[test]
    fn test_parse_unknown_status_key() {
        let err = Config::parse("status.closed.text=DONE", Path::new(".")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CatalogError>(),
            Some(&CatalogError::UnknownStatus("closed".to_string()))
        );
    }

    #[test]
    fn test_parse_invalid_rank() {
        assert!(Config::parse("status.open.rank=first", Path::new(".")).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage_line() {
        assert!(Config::parse("just some words", Path::new(".")).is_err());
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("rc")).unwrap();
        assert!(config.data_location.is_none());
    }

    #[test]
    fn test_load_from_reports_typed_errors() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let rc = temp_dir.path().join("rc");
        std::fs::write(&rc, "status.closed.text=DONE\n").unwrap();
        match Config::load_from(&rc) {
            Err(ConfigError::Invalid { path, source }) => {
                assert_eq!(path, rc);
                assert_eq!(
                    source.downcast_ref::<CatalogError>(),
                    Some(&CatalogError::UnknownStatus("closed".to_string()))
                );
            }
            other => panic!("expected invalid config, got {:?}", other.map(|_| ())),
        }

        // a directory where the rc file should be cannot be read
        let dir_rc = temp_dir.path().join("rc.d");
        std::fs::create_dir(&dir_rc).unwrap();
        assert!(matches!(Config::load_from(&dir_rc), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_defaults_without_content() {
        let config = Config::parse("", Path::new(".")).unwrap();
        assert!(config.data_location.is_none());
        assert_eq!(config.catalog, StatusCatalog::standard());
    }
}

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::config::Config;
use crate::db::migrations::MigrationManager;

/// Database connection manager
pub struct DbConnection;

impl DbConnection {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        Config::config_dir().join("board.db")
    }

    /// Database path from the configuration, or the default
    pub fn resolve_path(config: &Config) -> PathBuf {
        config
            .data_location
            .clone()
            .unwrap_or_else(Self::default_path)
    }

    /// Connect to the configured database, creating it and parent directories if needed
    pub fn connect(config: &Config) -> Result<Connection> {
        Self::connect_at(&Self::resolve_path(config))
    }

    /// Connect to a database file at an explicit path
    pub fn connect_at(db_path: &Path) -> Result<Connection> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        log::debug!("Opening database at {}", db_path.display());
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }

    /// Connect to an in-memory database (for testing)
    pub fn connect_in_memory() -> Result<Connection> {
        let conn = Connection::open_in_memory()
            .context("Failed to open in-memory database")?;

        MigrationManager::initialize(&conn)
            .context("Failed to initialize database schema")?;

        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_path() {
        let path = DbConnection::default_path();
        assert!(path.to_string_lossy().contains(".crawlboard"));
        assert!(path.to_string_lossy().ends_with("board.db"));
    }

    #[test]
    fn test_resolve_path_prefers_config() {
        let config = Config {
            data_location: Some(PathBuf::from("/tmp/elsewhere.db")),
            ..Config::default()
        };
        assert_eq!(DbConnection::resolve_path(&config), PathBuf::from("/tmp/elsewhere.db"));
    }

    #[test]
    fn test_connect_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("test.db");

        let conn = DbConnection::connect_at(&db_path).unwrap();
        assert!(db_path.exists());
        assert_eq!(MigrationManager::get_version(&conn).unwrap(), 2);
    }

    #[test]
    fn test_connect_in_memory() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let version = MigrationManager::get_version(&conn).unwrap();
        assert_eq!(version, 2);
    }
}

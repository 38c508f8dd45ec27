//! Client configuration file storage.
//!
//! Loads [`ClientConfig`] from `<config_dir>/stayfinder/config.toml`. A
//! missing or empty file yields the defaults; a file that exists but cannot
//! be read or parsed is an error.

use std::fs;
use std::path::PathBuf;
use stayfinder_core::config::ClientConfig;
use stayfinder_core::error::{Result, StayError};

use crate::paths::StayPaths;

/// Read-only storage for the client configuration file.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates storage pointing at the default config file path.
    ///
    /// # Errors
    ///
    /// Returns [`StayError::Config`] if the platform config directory
    /// cannot be determined.
    pub fn new() -> Result<Self> {
        let path = StayPaths::config_file().map_err(|e| StayError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration, falling back to defaults when no file
    /// exists yet.
    pub fn load(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!("no config file at {:?}, using defaults", self.path);
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }

    /// Returns the path to the config file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_yields_defaults() {
        let storage = ConfigStorage::with_path(PathBuf::from("/nonexistent/config.toml"));
        assert_eq!(storage.load().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = NamedTempFile::new().unwrap();
        let storage = ConfigStorage::with_path(file.path().to_path_buf());
        assert_eq!(storage.load().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_fields() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"api_base_url = "https://api.stayfinder.example""#).unwrap();

        let storage = ConfigStorage::with_path(file.path().to_path_buf());
        let config = storage.load().unwrap();

        assert_eq!(config.api_base_url, "https://api.stayfinder.example");
        assert_eq!(
            config.request_timeout_secs,
            ClientConfig::default().request_timeout_secs
        );
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_base_url = [not valid").unwrap();

        let storage = ConfigStorage::with_path(file.path().to_path_buf());
        assert!(storage.load().is_err());
    }
}

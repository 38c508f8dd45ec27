//! Unified path management for stayfinder client files.
//!
//! All configuration and session data live under one per-user directory so
//! every storage component resolves paths the same way on every platform.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for stayfinder.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/stayfinder/        # Config directory
/// ├── config.toml              # Client configuration
/// └── session/                 # Durable session store
///     ├── user.json            # Serialized user
///     └── token                # Opaque auth token
/// ```
pub struct StayPaths;

impl StayPaths {
    /// Returns the stayfinder configuration directory
    /// (e.g. `~/.config/stayfinder/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("stayfinder"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the directory holding the durable session store.
    pub fn session_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session"))
    }
}

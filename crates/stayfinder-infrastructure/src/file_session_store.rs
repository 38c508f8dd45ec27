//! File-backed implementation of [`SessionStore`].
//!
//! Keeps the two store keys as files under one directory: `user.json` (the
//! serialized user) and `token` (the opaque token as plain text). Saves go
//! through a tmp file plus atomic rename, and save/clear always touch both
//! files, so the pair can never end up half-updated by a crash mid-write.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use stayfinder_core::error::{Result, StayError};
use stayfinder_core::session::{Session, SessionStore};
use stayfinder_core::user::User;
use tokio::fs;

use crate::paths::StayPaths;

const USER_FILE: &str = "user.json";
const TOKEN_FILE: &str = "token";

/// Durable session store persisted to the user's config directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Creates a store at the default location
    /// (`<config_dir>/stayfinder/session/`).
    ///
    /// # Errors
    ///
    /// Returns [`StayError::Config`] if the platform config directory
    /// cannot be determined.
    pub fn default_location() -> Result<Self> {
        let dir = StayPaths::session_dir().map_err(|e| StayError::config(e.to_string()))?;
        Ok(Self { dir })
    }

    /// Creates a store rooted at a custom directory (for testing).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    /// Writes via a sibling tmp file and atomic rename.
    async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn remove_if_present(path: &Path) -> Result<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        let user_raw = match fs::read_to_string(self.user_path()).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let token = match fs::read_to_string(self.token_path()).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Half a pair should not exist; treat it as no session
                // rather than restoring a user without a token.
                tracing::warn!("user key present without token, treating session as absent");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let user: User = serde_json::from_str(&user_raw)?;
        Ok(Some(Session { user, token }))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;

        let user_json = serde_json::to_vec_pretty(&session.user)?;
        Self::write_atomic(&self.user_path(), &user_json).await?;
        Self::write_atomic(&self.token_path(), session.token.as_bytes()).await?;

        tracing::debug!("persisted session for user {}", session.user.id);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        Self::remove_if_present(&self.user_path()).await?;
        Self::remove_if_present(&self.token_path()).await?;
        Ok(())
    }
}

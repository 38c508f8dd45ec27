//! Durable session store trait.
//!
//! Defines the interface for session persistence across restarts.

use super::model::Session;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract durable store for the current session.
///
/// The underlying storage keeps two keys, the serialized `user` and the
/// opaque `token`, but the interface only deals in whole [`Session`] values:
/// `save` writes both keys and `clear` removes both, so one key can never go
/// stale while the other changes.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the persisted session, if any.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: A complete session was persisted
    /// - `Ok(None)`: Nothing persisted (or an incomplete pair, which is
    ///   treated as absent)
    /// - `Err(_)`: Storage access failed
    async fn load(&self) -> Result<Option<Session>>;

    /// Persists the session, writing both underlying keys together.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Removes any persisted session, clearing both underlying keys.
    /// Clearing an empty store is a no-op.
    async fn clear(&self) -> Result<()>;
}

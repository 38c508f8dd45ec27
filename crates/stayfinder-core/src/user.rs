//! User domain model.

use serde::{Deserialize, Serialize};

/// A registered user as returned by the backend.
///
/// The client holds a read-mostly cached copy. It is replaced only from a
/// successful backend response, never mutated optimistically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier (the backend serializes it as `_id`)
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    /// URL of the profile picture, if one has been uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

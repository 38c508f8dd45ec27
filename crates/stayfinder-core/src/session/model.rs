//! Session domain model.

use crate::user::User;
use serde::{Deserialize, Serialize};

/// The authenticated user together with its auth token, held as one unit.
///
/// Both fields are non-optional so a session either exists in full or not at
/// all; the system can never hold a user without a token or vice versa.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    /// Opaque auth token; the client never inspects it
    pub token: String,
}

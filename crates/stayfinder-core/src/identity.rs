//! Federated identity credential decoding.
//!
//! Extracts display fields from a Google identity credential (a JWT) without
//! any network call.
//!
//! # Security Note
//!
//! The credential's signature is NOT verified here. This is a display-name
//! extraction only and must never be treated as a trust boundary; the
//! backend performs its own verification when the extracted fields are sent
//! to `POST /users/google/login`.

use crate::error::{Result, StayError};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// Display fields carried in a Google identity credential payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GoogleIdentity {
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    pub email: String,
}

impl GoogleIdentity {
    /// The user-facing display name, `"given family"` or just the given
    /// name when no family name is present.
    pub fn display_name(&self) -> String {
        if self.family_name.is_empty() {
            self.given_name.clone()
        } else {
            format!("{} {}", self.given_name, self.family_name)
        }
    }
}

/// Decodes the payload segment of a federated identity credential.
///
/// # Errors
///
/// Returns [`StayError::Decode`] if the credential is not a JWT or its
/// payload is not valid base64url/JSON. Unlike the session operations this
/// error is meant to propagate to the caller.
pub fn decode_google_credential(credential: &str) -> Result<GoogleIdentity> {
    let payload = credential
        .split('.')
        .nth(1)
        .ok_or_else(|| StayError::decode("credential is not a JWT"))?;

    // JWT segments are unpadded base64url; strip padding in case a caller
    // hands over a padded variant.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| StayError::decode(format!("invalid base64 payload: {e}")))?;

    serde_json::from_slice(&bytes).map_err(|e| StayError::decode(format!("invalid JSON payload: {e}")))
}

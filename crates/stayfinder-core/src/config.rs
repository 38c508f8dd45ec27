//! Client configuration domain model.
//!
//! The TOML loader lives in the infrastructure crate; this module only
//! defines the type and its defaults.

use serde::{Deserialize, Serialize};

/// Configuration for the backend gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend API, without a trailing slash
    pub api_base_url: String,
    /// Bound on every gateway request; a hung call resolves to a failure
    /// after this interval instead of leaving a loading flag stuck
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

//! Remote gateway trait and its wire types.
//!
//! Defines the interface to the backend HTTP API. The trait keeps the state
//! managers decoupled from the transport so tests can swap in mocks, and the
//! infrastructure crate provides the reqwest-backed implementation.

use crate::error::Result;
use crate::place::Place;
use crate::user::User;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request body for `POST /users/register`.
#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /users/login`.
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /users/google/login`.
///
/// Carries only the display fields extracted client-side from the federated
/// credential; the backend never sees the credential itself.
#[derive(Clone, Debug, Serialize)]
pub struct GoogleLoginRequest {
    pub name: String,
    pub email: String,
}

/// Response body shared by the three login-style endpoints.
///
/// Both fields are optional on the wire: a 2xx response missing either one
/// is malformed and must not produce a session.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub user: Option<User>,
    pub token: Option<String>,
}

/// Response body for `GET /users/logout`.
#[derive(Clone, Debug, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub success: bool,
}

/// Request body for `PUT /users/update-user`.
///
/// `email` identifies the account and always comes from the current session;
/// the optional fields are the changes being requested.
#[derive(Clone, Debug, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Response body for `PUT /users/update-user`.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateUserResponse {
    #[serde(default)]
    pub success: bool,
    pub user: Option<User>,
}

/// A picture file queued for multipart upload.
#[derive(Clone, Debug)]
pub struct PictureUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The backend HTTP API boundary.
///
/// One method per endpoint; exact paths are part of the contract and are
/// documented on each method. All methods suspend the caller and surface
/// failures as [`crate::StayError`] values.
///
/// Note the response-shape asymmetry between the two places endpoints:
/// `fetch_places` unwraps a `{ "places": [...] }` envelope while
/// `search_places` receives a bare array.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// `POST /users/register`
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse>;

    /// `POST /users/login`
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse>;

    /// `POST /users/google/login`
    async fn google_login(&self, request: &GoogleLoginRequest) -> Result<AuthResponse>;

    /// `GET /users/logout`
    async fn logout(&self) -> Result<LogoutResponse>;

    /// `POST /users/upload-picture` (multipart, field name `picture`)
    ///
    /// Returns the raw response document; its shape is not pinned down by
    /// the backend contract beyond being JSON.
    async fn upload_picture(&self, upload: PictureUpload) -> Result<serde_json::Value>;

    /// `PUT /users/update-user`
    async fn update_user(&self, request: &UpdateUserRequest) -> Result<UpdateUserResponse>;

    /// `GET /places`
    async fn fetch_places(&self) -> Result<Vec<Place>>;

    /// `GET /places/search/:destination`
    ///
    /// The destination text is passed through as-is, empty string included;
    /// what an empty query returns is the backend's contract.
    async fn search_places(&self, destination: &str) -> Result<Vec<Place>>;
}

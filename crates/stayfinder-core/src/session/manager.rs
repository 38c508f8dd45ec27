//! Authenticated-session lifecycle manager.

use super::model::Session;
use super::store::SessionStore;
use crate::error::StayError;
use crate::gateway::{
    AuthResponse, GoogleLoginRequest, LoginRequest, PictureUpload, RegisterRequest, RemoteGateway,
    UpdateUserRequest,
};
use crate::identity::decode_google_credential;
use crate::user::User;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Value-level result of a session operation.
///
/// Failures are reported here rather than as errors so nothing escapes to a
/// global handler; `message` is always short and user-displayable, never a
/// raw stack trace or HTML fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Result of a picture upload, carrying the raw response data on success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOutcome {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Result of a profile update, carrying the refreshed user on success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub success: bool,
    pub message: String,
    pub user: Option<User>,
}

impl UpdateOutcome {
    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
        }
    }
}

/// Profile fields a user may change; `None` leaves a field untouched.
/// The account email is never taken from here, it always comes from the
/// current session.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
    pub picture: Option<String>,
}

/// Owns the authenticated-user lifecycle.
///
/// `AuthSessionManager` is the only writer of the session cell: every
/// mutation happens inside its methods, always on a success path, and the
/// in-memory session and the durable store are updated together. Failures
/// are non-destructive; the one exception is `logout`, whose success path is
/// itself the state-clearing action.
pub struct AuthSessionManager {
    gateway: Arc<dyn RemoteGateway>,
    store: Arc<dyn SessionStore>,
    session: RwLock<Option<Session>>,
    /// True only during the startup restore, not during network calls
    restoring: AtomicBool,
    activated: AtomicBool,
}

impl AuthSessionManager {
    pub fn new(gateway: Arc<dyn RemoteGateway>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            store,
            session: RwLock::new(None),
            restoring: AtomicBool::new(true),
            activated: AtomicBool::new(false),
        }
    }

    /// Restores any persisted session on first activation.
    ///
    /// The restored token is trusted as still valid; no revalidation call is
    /// made at startup (an explicit non-goal). Re-activation is a no-op.
    pub async fn activate(&self) {
        if self.activated.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.store.load().await {
            Ok(Some(session)) => {
                *self.session.write().await = Some(session);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("failed to restore persisted session: {}", e);
            }
        }

        self.restoring.store(false, Ordering::SeqCst);
    }

    /// The current cached user, if a session exists.
    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    /// True while the startup restore has not completed yet.
    pub fn is_restoring(&self) -> bool {
        self.restoring.load(Ordering::SeqCst)
    }

    /// Registers a new account via `POST /users/register`.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Outcome {
        let request = RegisterRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        };

        match self.gateway.register(&request).await {
            Ok(response) => {
                self.adopt(response, "Registration successful", "Registration failed")
                    .await
            }
            Err(e) => Outcome::fail(failure_message(&e, "Registration failed")),
        }
    }

    /// Logs in via `POST /users/login`.
    pub async fn login(&self, email: &str, password: &str) -> Outcome {
        let request = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };

        match self.gateway.login(&request).await {
            Ok(response) => self.adopt(response, "Login successful", "Login failed").await,
            Err(e) => Outcome::fail(failure_message(&e, "Login failed")),
        }
    }

    /// Logs in with a federated identity credential.
    ///
    /// The credential is decoded locally for its display fields only (no
    /// signature check, no network call) before the extracted name and email
    /// are sent to `POST /users/google/login`.
    ///
    /// # Errors
    ///
    /// A malformed credential propagates as [`StayError::Decode`]. This is
    /// the one deliberate exception to the value-level failure contract of
    /// the other session operations.
    pub async fn google_login(&self, credential: &str) -> crate::Result<Outcome> {
        let identity = decode_google_credential(credential)?;
        let request = GoogleLoginRequest {
            name: identity.display_name(),
            email: identity.email,
        };

        Ok(match self.gateway.google_login(&request).await {
            Ok(response) => self.adopt(response, "Login successful", "Login failed").await,
            Err(e) => Outcome::fail(failure_message(&e, "Login failed")),
        })
    }

    /// Logs out via `GET /users/logout`.
    ///
    /// The session is cleared only when the backend confirms with an
    /// explicit success flag; a transient failure never silently logs the
    /// user out. Logging out with no session is a no-op success.
    pub async fn logout(&self) -> Outcome {
        match self.gateway.logout().await {
            Ok(response) => {
                if response.success {
                    if let Err(e) = self.store.clear().await {
                        tracing::warn!("failed to clear persisted session: {}", e);
                        return Outcome::fail("Something went wrong!");
                    }
                    *self.session.write().await = None;
                }
                Outcome::ok("Logout successful")
            }
            Err(e) => {
                tracing::warn!("logout request failed: {}", e);
                Outcome::fail("Something went wrong!")
            }
        }
    }

    /// Uploads a profile picture as multipart form data.
    ///
    /// An HTML error page from the backend (a non-JSON body) is reported as
    /// a fixed "Server error" message rather than surfacing markup.
    pub async fn upload_picture(&self, upload: PictureUpload) -> UploadOutcome {
        match self.gateway.upload_picture(upload).await {
            Ok(data) => UploadOutcome {
                success: true,
                message: "Picture uploaded".to_string(),
                data: Some(data),
            },
            Err(e) => {
                tracing::warn!("picture upload failed: {}", e);
                let message = if e.is_malformed() {
                    "Server error".to_string()
                } else {
                    failure_message(&e, "Image upload failed")
                };
                UploadOutcome {
                    success: false,
                    message,
                    data: None,
                }
            }
        }
    }

    /// Updates the profile via `PUT /users/update-user`.
    ///
    /// Fails immediately without a network call when no session exists. On
    /// success the cached user is replaced and re-persisted alongside the
    /// existing token; on failure the cached user is left untouched.
    pub async fn update_user(&self, update: UserUpdate) -> UpdateOutcome {
        let Some(current) = self.session.read().await.clone() else {
            return UpdateOutcome::fail("User not authenticated");
        };

        let request = UpdateUserRequest {
            name: update.name,
            password: update.password,
            email: current.user.email.clone(),
            picture: update.picture,
        };

        match self.gateway.update_user(&request).await {
            Ok(response) => match (response.success, response.user) {
                (true, Some(user)) => {
                    let session = Session {
                        user: user.clone(),
                        token: current.token,
                    };
                    if let Err(e) = self.store.save(&session).await {
                        tracing::warn!("failed to persist updated session: {}", e);
                        return UpdateOutcome::fail("Update failed");
                    }
                    *self.session.write().await = Some(session);
                    UpdateOutcome {
                        success: true,
                        message: "Profile updated successfully".to_string(),
                        user: Some(user),
                    }
                }
                _ => UpdateOutcome::fail("Update failed"),
            },
            Err(e) => UpdateOutcome::fail(failure_message(&e, "Update failed")),
        }
    }

    /// Adopts an auth response as the new session: persists first, then
    /// swaps the in-memory cell, so a failed persist leaves state untouched.
    /// A 2xx body missing either field is malformed and produces no session.
    async fn adopt(&self, response: AuthResponse, ok_message: &str, err_message: &str) -> Outcome {
        match (response.user, response.token) {
            (Some(user), Some(token)) => {
                let session = Session { user, token };
                if let Err(e) = self.store.save(&session).await {
                    tracing::warn!("failed to persist session: {}", e);
                    return Outcome::fail(err_message);
                }
                *self.session.write().await = Some(session);
                Outcome::ok(ok_message)
            }
            _ => {
                tracing::warn!("auth response missing user or token");
                Outcome::fail(err_message)
            }
        }
    }
}

/// Prefers the backend-supplied error message, falling back to the
/// operation's own short message for transport-level failures.
fn failure_message(err: &StayError, fallback: &str) -> String {
    err.server_message()
        .map_or_else(|| fallback.to_string(), str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::gateway::{LogoutResponse, UpdateUserResponse};
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicU32;

    fn user(id: &str, name: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            picture: None,
        }
    }

    // Mock RemoteGateway for testing: responses are fixed at construction,
    // calls are counted so tests can assert that an operation short-circuits.
    #[derive(Default)]
    struct MockGateway {
        auth: Option<AuthResponse>,
        auth_error: Option<StayError>,
        logout: Option<LogoutResponse>,
        update: Option<UpdateUserResponse>,
        upload_error: Option<StayError>,
        calls: AtomicU32,
    }

    impl MockGateway {
        fn auth_ok(user: User, token: &str) -> Self {
            Self {
                auth: Some(AuthResponse {
                    user: Some(user),
                    token: Some(token.to_string()),
                }),
                ..Self::default()
            }
        }

        fn auth_failing(error: StayError) -> Self {
            Self {
                auth_error: Some(error),
                ..Self::default()
            }
        }

        fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn respond_auth(&self) -> Result<AuthResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = &self.auth_error {
                return Err(error.clone());
            }
            Ok(self.auth.clone().expect("mock auth response not configured"))
        }
    }

    #[async_trait::async_trait]
    impl RemoteGateway for MockGateway {
        async fn register(&self, _request: &RegisterRequest) -> Result<AuthResponse> {
            self.respond_auth()
        }

        async fn login(&self, _request: &LoginRequest) -> Result<AuthResponse> {
            self.respond_auth()
        }

        async fn google_login(&self, _request: &GoogleLoginRequest) -> Result<AuthResponse> {
            self.respond_auth()
        }

        async fn logout(&self) -> Result<LogoutResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = &self.auth_error {
                return Err(error.clone());
            }
            Ok(self.logout.clone().expect("mock logout response not configured"))
        }

        async fn upload_picture(&self, _upload: PictureUpload) -> Result<serde_json::Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = &self.upload_error {
                return Err(error.clone());
            }
            Ok(serde_json::json!({ "url": "https://cdn.example.com/p.png" }))
        }

        async fn update_user(&self, _request: &UpdateUserRequest) -> Result<UpdateUserResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = &self.auth_error {
                return Err(error.clone());
            }
            Ok(self.update.clone().expect("mock update response not configured"))
        }

        async fn fetch_places(&self) -> Result<Vec<crate::place::Place>> {
            Err(StayError::internal("not used in these tests"))
        }

        async fn search_places(&self, _destination: &str) -> Result<Vec<crate::place::Place>> {
            Err(StayError::internal("not used in these tests"))
        }
    }

    // Mock SessionStore for testing
    #[derive(Default)]
    struct MockStore {
        session: Mutex<Option<Session>>,
        fail_save: bool,
    }

    impl MockStore {
        fn with_session(session: Session) -> Self {
            Self {
                session: Mutex::new(Some(session)),
                fail_save: false,
            }
        }

        fn persisted(&self) -> Option<Session> {
            self.session.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SessionStore for MockStore {
        async fn load(&self) -> Result<Option<Session>> {
            Ok(self.session.lock().unwrap().clone())
        }

        async fn save(&self, session: &Session) -> Result<()> {
            if self.fail_save {
                return Err(StayError::io("disk full"));
            }
            *self.session.lock().unwrap() = Some(session.clone());
            Ok(())
        }

        async fn clear(&self) -> Result<()> {
            *self.session.lock().unwrap() = None;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_login_persists_session_and_reports_success() {
        let gateway = Arc::new(MockGateway::auth_ok(user("1", "A", "a@x.com"), "tok1"));
        let store = Arc::new(MockStore::default());
        let manager = AuthSessionManager::new(gateway, store.clone());

        let outcome = manager.login("a@x.com", "pw").await;

        assert!(outcome.success);
        assert_eq!(manager.current_user().await, Some(user("1", "A", "a@x.com")));
        let persisted = store.persisted().unwrap();
        assert_eq!(persisted.token, "tok1");
        assert_eq!(persisted.user.id, "1");
    }

    #[tokio::test]
    async fn test_restart_restores_persisted_user() {
        let gateway = Arc::new(MockGateway::auth_ok(user("1", "A", "a@x.com"), "tok1"));
        let store = Arc::new(MockStore::default());

        let manager = AuthSessionManager::new(gateway.clone(), store.clone());
        assert!(manager.register("A", "a@x.com", "pw").await.success);

        // A fresh manager over the same store stands in for an app restart.
        let restarted = AuthSessionManager::new(gateway, store);
        assert!(restarted.is_restoring());
        restarted.activate().await;

        assert!(!restarted.is_restoring());
        assert_eq!(
            restarted.current_user().await,
            Some(user("1", "A", "a@x.com"))
        );
    }

    #[tokio::test]
    async fn test_activate_with_empty_store_leaves_no_session() {
        let gateway = Arc::new(MockGateway::default());
        let manager = AuthSessionManager::new(gateway, Arc::new(MockStore::default()));

        manager.activate().await;

        assert!(!manager.is_restoring());
        assert_eq!(manager.current_user().await, None);
    }

    #[tokio::test]
    async fn test_login_failure_uses_server_message_and_leaves_state() {
        let gateway = Arc::new(MockGateway::auth_failing(StayError::Network {
            message: "status 401".to_string(),
            server_message: Some("Invalid credentials".to_string()),
        }));
        let store = Arc::new(MockStore::default());
        let manager = AuthSessionManager::new(gateway, store.clone());

        let outcome = manager.login("a@x.com", "bad").await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Invalid credentials");
        assert_eq!(manager.current_user().await, None);
        assert!(store.persisted().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back_to_operation_message() {
        let gateway = Arc::new(MockGateway::auth_failing(StayError::network(
            "connection refused",
        )));
        let manager = AuthSessionManager::new(gateway, Arc::new(MockStore::default()));

        let outcome = manager.register("A", "a@x.com", "pw").await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Registration failed");
    }

    #[tokio::test]
    async fn test_auth_response_missing_token_is_a_failure() {
        let gateway = Arc::new(MockGateway {
            auth: Some(AuthResponse {
                user: Some(user("1", "A", "a@x.com")),
                token: None,
            }),
            ..MockGateway::default()
        });
        let store = Arc::new(MockStore::default());
        let manager = AuthSessionManager::new(gateway, store.clone());

        let outcome = manager.login("a@x.com", "pw").await;

        assert!(!outcome.success);
        assert_eq!(manager.current_user().await, None);
        assert!(store.persisted().is_none());
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_session_unchanged() {
        let gateway = Arc::new(MockGateway::auth_ok(user("1", "A", "a@x.com"), "tok1"));
        let store = Arc::new(MockStore {
            fail_save: true,
            ..MockStore::default()
        });
        let manager = AuthSessionManager::new(gateway, store);

        let outcome = manager.login("a@x.com", "pw").await;

        assert!(!outcome.success);
        assert_eq!(manager.current_user().await, None);
    }

    #[tokio::test]
    async fn test_logout_without_session_is_noop_success() {
        let gateway = Arc::new(MockGateway {
            logout: Some(LogoutResponse { success: true }),
            ..MockGateway::default()
        });
        let store = Arc::new(MockStore::default());
        let manager = AuthSessionManager::new(gateway, store.clone());

        let outcome = manager.logout().await;

        assert!(outcome.success);
        assert!(store.persisted().is_none());
    }

    #[tokio::test]
    async fn test_logout_network_failure_keeps_session() {
        let session = Session {
            user: user("1", "A", "a@x.com"),
            token: "tok1".to_string(),
        };
        let gateway = Arc::new(MockGateway::auth_failing(StayError::network("timed out")));
        let store = Arc::new(MockStore::with_session(session.clone()));
        let manager = AuthSessionManager::new(gateway, store.clone());
        manager.activate().await;

        let outcome = manager.logout().await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Something went wrong!");
        assert_eq!(manager.current_user().await, Some(session.user.clone()));
        assert_eq!(store.persisted(), Some(session));
    }

    #[tokio::test]
    async fn test_logout_clears_both_memory_and_store() {
        let session = Session {
            user: user("1", "A", "a@x.com"),
            token: "tok1".to_string(),
        };
        let gateway = Arc::new(MockGateway {
            logout: Some(LogoutResponse { success: true }),
            ..MockGateway::default()
        });
        let store = Arc::new(MockStore::with_session(session));
        let manager = AuthSessionManager::new(gateway, store.clone());
        manager.activate().await;

        let outcome = manager.logout().await;

        assert!(outcome.success);
        assert_eq!(manager.current_user().await, None);
        assert!(store.persisted().is_none());
    }

    #[tokio::test]
    async fn test_update_user_without_session_makes_no_network_call() {
        let gateway = Arc::new(MockGateway::default());
        let manager = AuthSessionManager::new(gateway.clone(), Arc::new(MockStore::default()));

        let outcome = manager.update_user(UserUpdate::default()).await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "User not authenticated");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_cached_user_unchanged() {
        let session = Session {
            user: user("1", "A", "a@x.com"),
            token: "tok1".to_string(),
        };
        let gateway = Arc::new(MockGateway::auth_failing(StayError::network("timed out")));
        let store = Arc::new(MockStore::with_session(session.clone()));
        let manager = AuthSessionManager::new(gateway, store.clone());
        manager.activate().await;

        let outcome = manager
            .update_user(UserUpdate {
                name: Some("B".to_string()),
                ..UserUpdate::default()
            })
            .await;

        assert!(!outcome.success);
        assert_eq!(manager.current_user().await, Some(session.user.clone()));
        assert_eq!(store.persisted(), Some(session));
    }

    #[tokio::test]
    async fn test_successful_update_replaces_user_and_keeps_token() {
        let session = Session {
            user: user("1", "A", "a@x.com"),
            token: "tok1".to_string(),
        };
        let renamed = user("1", "B", "a@x.com");
        let gateway = Arc::new(MockGateway {
            update: Some(UpdateUserResponse {
                success: true,
                user: Some(renamed.clone()),
            }),
            ..MockGateway::default()
        });
        let store = Arc::new(MockStore::with_session(session));
        let manager = AuthSessionManager::new(gateway, store.clone());
        manager.activate().await;

        let outcome = manager
            .update_user(UserUpdate {
                name: Some("B".to_string()),
                ..UserUpdate::default()
            })
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.user, Some(renamed.clone()));
        assert_eq!(manager.current_user().await, Some(renamed.clone()));
        let persisted = store.persisted().unwrap();
        assert_eq!(persisted.user, renamed);
        assert_eq!(persisted.token, "tok1");
    }

    #[tokio::test]
    async fn test_google_login_decode_failure_propagates() {
        let gateway = Arc::new(MockGateway::default());
        let manager = AuthSessionManager::new(gateway.clone(), Arc::new(MockStore::default()));

        let err = manager.google_login("not-a-credential").await.unwrap_err();

        assert!(err.is_decode());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_google_login_adopts_session() {
        let payload = URL_SAFE_NO_PAD
            .encode(r#"{"given_name":"A","family_name":"B","email":"a@x.com"}"#);
        let credential = format!("aGVhZGVy.{payload}.sig");

        let gateway = Arc::new(MockGateway::auth_ok(user("1", "A B", "a@x.com"), "tok1"));
        let store = Arc::new(MockStore::default());
        let manager = AuthSessionManager::new(gateway, store.clone());

        let outcome = manager.google_login(&credential).await.unwrap();

        assert!(outcome.success);
        assert_eq!(store.persisted().unwrap().token, "tok1");
    }

    #[tokio::test]
    async fn test_upload_html_error_body_becomes_server_error() {
        let gateway = Arc::new(MockGateway {
            upload_error: Some(StayError::malformed("non-JSON error body (status 500)")),
            ..MockGateway::default()
        });
        let manager = AuthSessionManager::new(gateway, Arc::new(MockStore::default()));

        let outcome = manager
            .upload_picture(PictureUpload {
                file_name: "p.png".to_string(),
                bytes: vec![1, 2, 3],
            })
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Server error");
        assert!(outcome.data.is_none());
    }

    #[tokio::test]
    async fn test_upload_success_returns_raw_data() {
        let gateway = Arc::new(MockGateway::default());
        let manager = AuthSessionManager::new(gateway, Arc::new(MockStore::default()));

        let outcome = manager
            .upload_picture(PictureUpload {
                file_name: "p.png".to_string(),
                bytes: vec![1, 2, 3],
            })
            .await;

        assert!(outcome.success);
        assert_eq!(
            outcome.data,
            Some(serde_json::json!({ "url": "https://cdn.example.com/p.png" }))
        );
    }
}

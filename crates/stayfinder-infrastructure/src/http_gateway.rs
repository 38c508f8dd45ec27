//! Reqwest-backed implementation of [`RemoteGateway`].
//!
//! Every request shares one client built with a bounded timeout, so a hung
//! backend call resolves to a failure instead of leaving a loading flag
//! stuck. Non-2xx responses have their JSON `message` field extracted for
//! display; a non-JSON error body (an HTML error page, typically) is
//! reported as [`StayError::MalformedResponse`] so callers can substitute a
//! fixed message instead of surfacing markup.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use stayfinder_core::config::ClientConfig;
use stayfinder_core::error::{Result, StayError};
use stayfinder_core::gateway::{
    AuthResponse, GoogleLoginRequest, LoginRequest, LogoutResponse, PictureUpload,
    RegisterRequest, RemoteGateway, UpdateUserRequest, UpdateUserResponse,
};
use stayfinder_core::place::Place;

/// HTTP gateway to the stayfinder backend API.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Builds a gateway from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StayError::Config`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StayError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| StayError::malformed(format!("unexpected response body: {e}")))
    }
}

fn transport_error(err: reqwest::Error) -> StayError {
    StayError::network(err.to_string())
}

/// Builds the error for a non-2xx response, extracting the backend's
/// `{ "message": ... }` when the body is JSON.
fn error_from_body(status: StatusCode, body: &str) -> StayError {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => StayError::Network {
            message: format!("request failed with status {status}"),
            server_message: value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_owned),
        },
        Err(_) => StayError::malformed(format!("non-JSON error body (status {status})")),
    }
}

/// `GET /places` wraps the collection, unlike the search endpoint.
#[derive(Deserialize)]
struct PlacesEnvelope {
    places: Vec<Place>,
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        let response = self
            .client
            .post(self.url("/users/register"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_json(response).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let response = self
            .client
            .post(self.url("/users/login"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_json(response).await
    }

    async fn google_login(&self, request: &GoogleLoginRequest) -> Result<AuthResponse> {
        let response = self
            .client
            .post(self.url("/users/google/login"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_json(response).await
    }

    async fn logout(&self) -> Result<LogoutResponse> {
        let response = self
            .client
            .get(self.url("/users/logout"))
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_json(response).await
    }

    async fn upload_picture(&self, upload: PictureUpload) -> Result<serde_json::Value> {
        let part = multipart::Part::bytes(upload.bytes).file_name(upload.file_name);
        let form = multipart::Form::new().part("picture", part);

        let response = self
            .client
            .post(self.url("/users/upload-picture"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_json(response).await
    }

    async fn update_user(&self, request: &UpdateUserRequest) -> Result<UpdateUserResponse> {
        let response = self
            .client
            .put(self.url("/users/update-user"))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_json(response).await
    }

    async fn fetch_places(&self) -> Result<Vec<Place>> {
        let response = self
            .client
            .get(self.url("/places"))
            .send()
            .await
            .map_err(transport_error)?;
        let envelope: PlacesEnvelope = Self::read_json(response).await?;
        Ok(envelope.places)
    }

    async fn search_places(&self, destination: &str) -> Result<Vec<Place>> {
        // Bare array response, and the trimmed text goes into the path
        // verbatim (empty string included).
        let response = self
            .client
            .get(self.url(&format!("/places/search/{destination}")))
            .send()
            .await
            .map_err(transport_error)?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_json_body_extracts_message() {
        let err = error_from_body(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Invalid credentials"}"#,
        );
        assert_eq!(err.server_message(), Some("Invalid credentials"));
    }

    #[test]
    fn test_error_from_json_body_without_message_field() {
        let err = error_from_body(StatusCode::BAD_REQUEST, r#"{"error":"nope"}"#);
        assert!(err.is_network());
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn test_html_error_body_is_malformed() {
        let err = error_from_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            "<html><body>Internal Server Error</body></html>",
        );
        assert!(err.is_malformed());
    }

    #[test]
    fn test_places_envelope_shape() {
        let envelope: PlacesEnvelope = serde_json::from_str(
            r#"{"places":[{"_id":"p1","title":"T","address":"A","photos":[],
                "description":"D","perks":["Pool"],"extraInfo":"","checkIn":14,
                "checkOut":11,"maxGuests":2,"price":120,"owner":"u1"}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.places.len(), 1);
        assert_eq!(envelope.places[0].id, "p1");
        assert_eq!(envelope.places[0].check_in, 14);
    }

    #[test]
    fn test_search_response_is_bare_array() {
        let places: Vec<Place> = serde_json::from_str(
            r#"[{"_id":"p1","title":"T","address":"A","photos":[],
                "description":"D","perks":[],"extraInfo":"x","checkIn":13,
                "checkOut":12,"maxGuests":4,"price":90,"owner":"u1"}]"#,
        )
        .unwrap();
        assert_eq!(places[0].max_guests, 4);
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let gateway = HttpGateway::new(&ClientConfig {
            api_base_url: "http://localhost:4000/".to_string(),
            request_timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(gateway.url("/places"), "http://localhost:4000/places");
    }
}

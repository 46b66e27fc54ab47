//! # Backend client for the auth endpoints
//!
//! [`AuthBackend`] is the seam between the session core and the REST backend.
//! [`HttpClient`] is the production implementation on top of `reqwest`; tests
//! substitute scripted fakes.
//!
//! ## Credentials
//!
//! The backend authenticates with an HTTP-only cookie it sets on login or
//! registration. In the browser the cookie is managed by the user agent and
//! requests are sent with `credentials: include`. On native targets the client
//! keeps its own cookie jar. If a login response also carries a `token`, it is
//! remembered and sent as a bearer credential. [`AuthBackend::clear_credentials`]
//! forgets the token and, on native targets, the cookie jar.
//!
//! ## Responses
//!
//! Parsing is done on the response text by pure functions so it can be tested
//! without a server:
//!
//! - success bodies for login/register are `{"user": {...}, "token"?: "..."}`
//! - the current-user body is either `{"user": {...}}` or the bare profile; a
//!   `null` body or `null` user means "no user"
//! - error bodies contribute their `detail`, `message` or `error` field as the
//!   error message, otherwise the raw text, otherwise the status reason

use std::sync::{Mutex, MutexGuard, PoisonError};

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{LoginRequest, Registration, User};

/// Async trait for the remote identity backend.
pub trait AuthBackend {
    /// Check credentials. The backend sets its session cookie out of band.
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl std::future::Future<Output = Result<User, ApiError>>;
    fn register(
        &self,
        registration: &Registration,
    ) -> impl std::future::Future<Output = Result<User, ApiError>>;
    /// Resolve the session cookie to a user. `Ok(None)` means no user.
    fn current_user(&self) -> impl std::future::Future<Output = Result<Option<User>, ApiError>>;
    /// Drop any credential the client holds itself.
    fn clear_credentials(&self);
}

/// `reqwest`-based [`AuthBackend`].
pub struct HttpClient {
    config: ApiConfig,
    http: Mutex<reqwest::Client>,
    token: Mutex<Option<String>>,
}

impl HttpClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = build_http()?;
        Ok(Self {
            config,
            http: Mutex::new(http),
            token: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // Neither lock is held across a call that can panic; recover the value if
    // one ever is poisoned.
    fn http(&self) -> MutexGuard<'_, reqwest::Client> {
        self.http.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn token(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let http = self.http().clone();
        let mut builder = http.request(method, self.config.url(path));
        #[cfg(target_arch = "wasm32")]
        {
            builder = builder.fetch_credentials_include();
        }
        if let Some(token) = self.token().as_deref() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }

    async fn authenticate<T: serde::Serialize>(&self, path: &str, body: &T) -> Result<User, ApiError> {
        let (status, text) = self.send(self.request(Method::POST, path).json(body)).await?;
        let (user, token) = parse_auth_response(status, &text)?;
        if let Some(token) = token {
            *self.token() = Some(token);
        }
        Ok(user)
    }
}

impl AuthBackend for HttpClient {
    async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        let path = self.config.endpoints.login.clone();
        self.authenticate(&path, request).await
    }

    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        let path = self.config.endpoints.register.clone();
        self.authenticate(&path, registration).await
    }

    async fn current_user(&self) -> Result<Option<User>, ApiError> {
        let path = self.config.endpoints.current_user.clone();
        let (status, text) = self.send(self.request(Method::GET, &path)).await?;
        parse_current_user(status, &text)
    }

    fn clear_credentials(&self) {
        *self.token() = None;
        // A fresh client starts with an empty cookie jar.
        #[cfg(not(target_arch = "wasm32"))]
        {
            match build_http() {
                Ok(http) => *self.http() = http,
                Err(e) => tracing::warn!("Failed to reset HTTP client: {}", e),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http() -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .cookie_store(true)
        .connect_timeout(std::time::Duration::from_secs(10))
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| ApiError::Network(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn build_http() -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| ApiError::Network(e.to_string()))
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CurrentUserResponse {
    // Tried first: a missing `user` field would otherwise read as `None`.
    Bare(User),
    Wrapped { user: Option<User> },
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    message: Option<String>,
    error: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_auth_response(status: StatusCode, text: &str) -> Result<(User, Option<String>), ApiError> {
    if !status.is_success() {
        return Err(status_error(status, text));
    }
    let body: AuthResponse =
        serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))?;
    let user = body.user.ok_or(ApiError::MissingUser)?;
    Ok((user, body.token))
}

fn parse_current_user(status: StatusCode, text: &str) -> Result<Option<User>, ApiError> {
    if !status.is_success() {
        return Err(status_error(status, text));
    }
    if text.trim().is_empty() {
        return Ok(None);
    }
    let body: Option<CurrentUserResponse> =
        serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(match body {
        None => None,
        Some(CurrentUserResponse::Wrapped { user }) => user,
        Some(CurrentUserResponse::Bare(user)) => Some(user),
    })
}

fn status_error(status: StatusCode, text: &str) -> ApiError {
    let message = error_message(text).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

fn error_message(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let Ok(body) = serde_json::from_str::<ErrorBody>(text) else {
        return Some(text.to_string());
    };
    let detail = body.detail.and_then(|d| match d {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    });
    detail.or(body.message).or(body.error).or_else(|| Some(text.to_string()))
}

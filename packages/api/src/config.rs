//! # Client configuration: backend location and session policy
//!
//! [`ApiConfig`] tells the client where the REST backend lives, which paths its
//! auth endpoints use, and how the session reacts to a failed refresh. Every
//! field has a production default, so a missing or empty config is valid.
//!
//! ## Sources
//!
//! - [`ApiConfig::from_toml`] parses a TOML document:
//!
//! ```toml
//! base_url = "https://api.anaghahealthconnect.com"
//! refresh_policy = "keep_stale"     # or "collapse" (default)
//!
//! [endpoints]
//! login = "/api/users/login"
//! register = "/api/users/register"
//! current_user = "/api/users/me"
//! ```
//!
//! - [`ApiConfig::from_env`] reads `API_BASE_URL` and `AUTH_REFRESH_POLICY`. On
//!   native targets a `.env` file is loaded first via `dotenvy`; in the browser
//!   the values are baked in at compile time.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.anaghahealthconnect.com";

/// Top-level client configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,
    #[serde(default)]
    pub endpoints: Endpoints,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_policy: RefreshPolicy::default(),
            endpoints: Endpoints::default(),
        }
    }
}

/// Paths of the auth endpoints, relative to `base_url`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
    pub current_user: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/api/users/login".to_string(),
            register: "/api/users/register".to_string(),
            current_user: "/api/users/me".to_string(),
        }
    }
}

/// What a failed bootstrap or refresh does to an already known user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Any failure drops the user and the cached profile.
    #[default]
    Collapse,
    /// Network failures keep the last known user, marked stale. Rejected
    /// sessions still collapse.
    KeepStale,
}

impl RefreshPolicy {
    /// Parse "collapse" / "keep_stale" (also accepts "keep-stale").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "collapse" => Some(Self::Collapse),
            "keep_stale" | "keep-stale" => Some(Self::KeepStale),
            _ => None,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the refresh policy.
    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let (base_url, policy) = {
            dotenvy::dotenv().ok();
            (
                std::env::var("API_BASE_URL").ok(),
                std::env::var("AUTH_REFRESH_POLICY").ok(),
            )
        };
        #[cfg(target_arch = "wasm32")]
        let (base_url, policy) = (
            option_env!("API_BASE_URL").map(str::to_string),
            option_env!("AUTH_REFRESH_POLICY").map(str::to_string),
        );

        Self::from_values(base_url, policy)
    }

    fn from_values(base_url: Option<String>, policy: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = policy {
            match RefreshPolicy::parse(&raw) {
                Some(p) => config.refresh_policy = p,
                None => tracing::warn!("Ignoring unknown AUTH_REFRESH_POLICY {:?}", raw),
            }
        }
        config
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

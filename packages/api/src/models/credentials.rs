//! # Credential payloads for login and registration
//!
//! ## [`LoginRequest`]
//!
//! Body of the credential check: `{"mobile": "...", "password": "..."}`.
//!
//! ## [`Registration`]
//!
//! Body of the sign-up call. Name, mobile and password are required; email and
//! the role profile are optional. The profile is flattened so the backend
//! receives the same flat shape it returns for users:
//!
//! ```json
//! { "name": "A", "mobile": "9999999999", "password": "...", "role": "doctor", "specialty": "ENT" }
//! ```
//!
//! Leaving the profile out omits `role` entirely and lets the backend apply its
//! default.
//!
//! Neither type prints its password through `Debug`.

use std::fmt;

use serde::Serialize;
use store::RoleProfile;

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub mobile: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(mobile: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mobile: mobile.into(),
            password: password.into(),
        }
    }

    /// Name of the first required field that is blank.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.mobile.trim().is_empty() {
            Some("mobile")
        } else if self.password.is_empty() {
            Some("password")
        } else {
            None
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("mobile", &self.mobile)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub mobile: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub profile: Option<RoleProfile>,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        mobile: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mobile: mobile.into(),
            password: password.into(),
            email: None,
            profile: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_profile(mut self, profile: RoleProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Name of the first required field that is blank.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.mobile.trim().is_empty() {
            Some("mobile")
        } else if self.password.is_empty() {
            Some("password")
        } else {
            None
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("mobile", &self.mobile)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("profile", &self.profile)
            .finish()
    }
}

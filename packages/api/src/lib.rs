//! # API crate: backend client and session core for Health Connect
//!
//! This crate is everything the front-ends need to talk to the Health Connect
//! REST backend about identity, independent of any UI framework. The Dioxus
//! layer in `ui` wraps [`AuthSession`] in a context; tests drive it directly.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | [`AuthSession`]: bootstrap, login, registration, logout and refresh over an owned state container |
//! | [`client`] | [`AuthBackend`] trait and the `reqwest` implementation [`HttpClient`] |
//! | [`config`] | [`ApiConfig`]: base URL, endpoint paths, refresh policy (TOML or environment) |
//! | [`error`] | [`ApiError`] taxonomy for backend calls |
//! | [`models`] | Login and registration payloads; user types re-exported from `store` |
//!
//! ## Endpoints used
//!
//! - `POST /api/users/login`: `{mobile, password}` → `{user}`
//! - `POST /api/users/register`: `{name, mobile, password, role?, email?, ...}` → `{user}`
//! - `GET /api/users/me`: session cookie → user profile

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use auth::{AuthError, AuthPhase, AuthSession, AuthState, Navigator, LOGIN_ROUTE};
pub use client::{AuthBackend, HttpClient};
pub use config::{ApiConfig, RefreshPolicy};
pub use error::ApiError;
pub use models::{LoginRequest, Registration};

pub use store::{Role, RoleProfile, User};

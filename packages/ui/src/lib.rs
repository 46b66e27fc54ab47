//! This crate contains all shared UI for the workspace.

mod platform;
pub use platform::{make_session, make_session_with, make_store, AppSession, BrowserNavigator, PlatformStore};

mod auth;
pub use auth::{use_auth, AuthContext, AuthProvider, LogoutButton};

mod navbar;
pub use navbar::Navbar;

mod session_badge;
pub use session_badge::SessionBadge;

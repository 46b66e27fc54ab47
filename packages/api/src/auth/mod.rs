//! Client-side session management.

mod session;

pub use session::{AuthError, AuthPhase, AuthSession, AuthState, Navigator, LOGIN_ROUTE};

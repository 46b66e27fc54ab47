//! Request models sent to the backend.

mod credentials;

pub use credentials::{LoginRequest, Registration};
pub use store::{Role, RoleProfile, User};

//! HTTP middleware stack for the admin panel.

pub mod auth;
pub mod session;

pub use auth::{RequireAdminAuth, clear_session_auth, set_session_auth};
pub use session::create_session_layer;

//! Session-related types.
//!
//! Types stored in the session for authentication and cart state.

use serde::{Deserialize, Serialize};

use samaya_core::{Role, UserId};

use crate::api::types::Profile;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
/// Rebuilt from the backend profile whenever the bearer credential is
/// exchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Backend user id.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Account role.
    pub role: Role,
}

impl From<Profile> for CurrentUser {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            email: profile.email,
            role: profile.role,
        }
    }
}

/// Session keys for authentication and cart data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the persisted bearer credential.
    pub const AUTH_TOKEN: &str = "auth_token";

    /// Key for the cart badge count.
    pub const CART_COUNT: &str = "cart_count";

    /// Key for unsubmitted quantity edits, a map of booking id to quantity.
    pub const CART_QUANTITIES: &str = "cart_quantities";
}

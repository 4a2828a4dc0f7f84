//! Session-related types.

use serde::{Deserialize, Serialize};

use samaya_core::UserId;

use crate::api::types::Profile;

/// Session-stored admin identity.
///
/// Only profiles carrying the admin role are ever stored here; the auth
/// extractor rejects everyone else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Backend user id.
    pub id: UserId,
    /// Display name.
    pub username: String,
    /// Email address.
    pub email: String,
}

impl From<Profile> for CurrentAdmin {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            email: profile.email,
        }
    }
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the persisted bearer credential.
    pub const AUTH_TOKEN: &str = "auth_token";
}

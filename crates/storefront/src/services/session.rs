//! Session store operations.
//!
//! The session is the single source of truth for "who is logged in" and
//! "how many items are in the cart". It persists only the bearer credential
//! durably; the profile is a cached projection re-fetched from the backend
//! when missing, and the cart count is re-derived after every cart mutation.

use std::collections::HashMap;

use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiClient;
use crate::middleware::auth::SessionAuth;
use crate::models::{CurrentUser, session_keys};

/// Restore the authentication pair from the session.
///
/// When the session carries a credential but no cached profile (first
/// request after a restart, or the cache was dropped), the credential is
/// exchanged for a profile via the backend. An expired or rejected
/// credential is removed silently - the caller sees an anonymous session,
/// never an error.
#[instrument(skip_all)]
pub async fn restore(session: &Session, api: &ApiClient) -> Option<SessionAuth> {
    let token: String = session
        .get(session_keys::AUTH_TOKEN)
        .await
        .ok()
        .flatten()?;

    if let Ok(Some(user)) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
    {
        return Some(SessionAuth { user, token });
    }

    match api.me(&token).await {
        Ok(profile) => {
            let user = CurrentUser::from(profile);
            if let Err(e) = session.insert(session_keys::CURRENT_USER, &user).await {
                tracing::error!("Failed to cache restored profile: {e}");
            }
            refresh_cart_count(session, api, &token).await;
            Some(SessionAuth { user, token })
        }
        Err(e) => {
            tracing::debug!("Stored credential rejected, dropping it: {e}");
            let _ = session.remove::<String>(session_keys::AUTH_TOKEN).await;
            None
        }
    }
}

/// Replace the current identity after a successful login.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn set_identity(
    session: &Session,
    token: &str,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    crate::middleware::set_session_auth(session, token, user).await
}

/// Clear all session state.
///
/// Local-only by design: the backend is never called on logout.
#[instrument(skip_all)]
pub async fn logout(session: &Session) {
    if let Err(e) = crate::middleware::clear_session_auth(session).await {
        tracing::error!("Failed to clear session: {e}");
    }
}

/// Re-derive the cart badge from the full booking list.
///
/// The badge equals the number of the user's pending bookings whose
/// shipping address is still empty - the same filter the cart page
/// renders, so a cancelled line stops counting. Called after login and
/// after every cart mutation; a failed fetch leaves the previous badge in
/// place.
#[instrument(skip_all)]
pub async fn refresh_cart_count(session: &Session, api: &ApiClient, token: &str) -> u32 {
    use samaya_core::BookingStatus;

    match api.my_bookings(token).await {
        Ok(bookings) => {
            let count = u32::try_from(
                bookings
                    .iter()
                    .filter(|b| b.status == BookingStatus::Pending && b.is_in_cart())
                    .count(),
            )
            .unwrap_or(u32::MAX);
            if let Err(e) = session.insert(session_keys::CART_COUNT, count).await {
                tracing::error!("Failed to store cart count: {e}");
            }
            count
        }
        Err(e) => {
            tracing::warn!("Failed to refresh cart count: {e}");
            cart_count(session).await
        }
    }
}

/// The cached cart badge count (zero for anonymous sessions).
pub async fn cart_count(session: &Session) -> u32 {
    session
        .get(session_keys::CART_COUNT)
        .await
        .ok()
        .flatten()
        .unwrap_or(0)
}

/// Unsubmitted quantity edits, keyed by booking id.
///
/// Quantity changes are local until checkout submits them - one backend
/// round-trip per checkout instead of one per click.
pub async fn quantity_edits(session: &Session) -> HashMap<String, u32> {
    session
        .get(session_keys::CART_QUANTITIES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Record a quantity edit for one cart line.
pub async fn remember_quantity(session: &Session, booking_id: &str, quantity: u32) {
    let mut edits = quantity_edits(session).await;
    edits.insert(booking_id.to_string(), quantity);
    if let Err(e) = session.insert(session_keys::CART_QUANTITIES, &edits).await {
        tracing::error!("Failed to store quantity edit: {e}");
    }
}

/// Forget the quantity edit for one cart line (after cancellation).
pub async fn forget_quantity(session: &Session, booking_id: &str) {
    let mut edits = quantity_edits(session).await;
    if edits.remove(booking_id).is_some() {
        if let Err(e) = session.insert(session_keys::CART_QUANTITIES, &edits).await {
            tracing::error!("Failed to store quantity edits: {e}");
        }
    }
}

/// Drop all quantity edits (after a completed checkout).
pub async fn clear_quantity_edits(session: &Session) {
    let _ = session
        .remove::<HashMap<String, u32>>(session_keys::CART_QUANTITIES)
        .await;
}

/// Zero the badge without a backend round-trip (after a completed checkout
/// every line has a shipping address, so the count is zero by definition).
pub async fn zero_cart_count(session: &Session) {
    if let Err(e) = session.insert(session_keys::CART_COUNT, 0_u32).await {
        tracing::error!("Failed to zero cart count: {e}");
    }
}

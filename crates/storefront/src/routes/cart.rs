//! Cart and checkout route handlers.
//!
//! The cart lists the user's unconfirmed bookings (pending status, empty
//! shipping address). Quantity edits stay in the session until submission -
//! one backend round-trip per checkout instead of one per click. Submission
//! either finalizes the lines for cash on delivery or renders the signed
//! payment-gateway handoff form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use samaya_core::{BookingId, BookingStatus, PaymentMethod, ProductId, Quantity};

use crate::api::types::Booking;
use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::services::esewa::GatewayRequest;
use crate::services::{checkout, esewa, session as session_store};
use crate::state::AppState;

use super::Nav;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nav: Nav,
    pub items: Vec<CartItemView>,
    pub total_items: u32,
    pub subtotal: String,
    pub delivery_charge: String,
    pub total: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Auto-submitting gateway handoff template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/esewa_redirect.html")]
pub struct EsewaRedirectTemplate {
    pub request: GatewayRequest,
}

/// A loaded cart: the checkout lines plus their display projections.
struct LoadedCart {
    lines: Vec<checkout::CartLine>,
    items: Vec<CartItemView>,
}

/// Load the user's cart lines with session quantity edits applied.
async fn load_cart(state: &AppState, session: &Session, token: &str) -> Result<LoadedCart> {
    let bookings = state.api().my_bookings(token).await?;
    let edits = session_store::quantity_edits(session).await;

    let mut lines = Vec::new();
    let mut items = Vec::new();

    for booking in bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Pending && b.is_in_cart())
    {
        let quantity = edits
            .get(booking.id.as_str())
            .copied()
            .map_or(booking.quantity, |q| Quantity::clamped(q));

        lines.push(checkout::CartLine {
            booking_id: booking.id.clone(),
            unit_price: booking.price,
            quantity,
        });
        items.push(CartItemView {
            id: booking.id.to_string(),
            name: booking.product_short_name.clone(),
            image_url: resolve_image(state, booking),
            quantity: quantity.get(),
            line_total: booking.price.times(quantity.get()).to_string(),
        });
    }

    Ok(LoadedCart { lines, items })
}

fn resolve_image(state: &AppState, booking: &Booking) -> String {
    booking
        .product_image
        .as_deref()
        .filter(|path| !path.is_empty())
        .map(|path| state.api().image_url(path))
        .unwrap_or_default()
}

// =============================================================================
// Cart Page
// =============================================================================

/// Message query parameters.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the cart page with the shipping form.
///
/// Without a logged-in user the cart is empty by definition; no backend
/// call is made.
#[instrument(skip(state, nav, auth, session))]
pub async fn show(
    State(state): State<AppState>,
    nav: Nav,
    OptionalAuth(auth): OptionalAuth,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<CartShowTemplate> {
    let cart = match &auth {
        Some(auth) => load_cart(&state, &session, &auth.token).await?,
        None => LoadedCart {
            lines: Vec::new(),
            items: Vec::new(),
        },
    };

    Ok(CartShowTemplate {
        nav,
        total_items: cart.lines.iter().map(|line| line.quantity.get()).sum(),
        subtotal: checkout::subtotal(&cart.lines).to_string(),
        delivery_charge: checkout::delivery_charge().to_string(),
        total: checkout::total(&cart.lines).to_string(),
        items: cart.items,
        error: query.error,
        success: query.success,
    })
}

// =============================================================================
// Cart Mutations
// =============================================================================

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
    pub dial: Option<String>,
    pub band: Option<String>,
    /// Where to send the user back to.
    pub next: Option<String>,
}

/// Add a product to the cart.
///
/// Creates a booking with no shipping fields. Anonymous users are sent to
/// the login page instead of failing silently.
#[instrument(skip(state, auth, session, form))]
pub async fn add(
    State(state): State<AppState>,
    OptionalAuth(auth): OptionalAuth,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let Some(auth) = auth else {
        return Redirect::to("/auth/login?error=login_required").into_response();
    };

    let product_id = ProductId::new(form.product_id.clone());
    let product = match state.api().product(&product_id).await {
        Ok(product) => product,
        Err(e) => {
            tracing::error!("Failed to fetch product for add-to-cart: {e}");
            return redirect_back(form.next.as_deref(), "error=add_failed");
        }
    };

    let quantity = Quantity::clamped(form.quantity.unwrap_or(1));
    let mut booking = super::products::default_booking(&product, quantity);

    // An explicit color selection from the detail page overrides the default
    // combination when the exact pair is offered.
    if let (Some(dial), Some(band)) = (form.dial.as_deref(), form.band.as_deref())
        && let Some(combo) = product.combination(dial, band)
    {
        booking.product_image = combo.image_url.clone();
        booking.dial_color = Some(combo.dial_color.clone());
        booking.band_color = Some(combo.band_color.clone());
    }

    match state.api().create_booking(&auth.token, &booking).await {
        Ok(()) => {
            session_store::refresh_cart_count(&session, state.api(), &auth.token).await;
            redirect_back(form.next.as_deref(), "success=added")
        }
        Err(e) => {
            tracing::error!("Add to cart failed: {e}");
            redirect_back(form.next.as_deref(), "error=add_failed")
        }
    }
}

/// Quantity edit form data. The form carries the displayed quantity so no
/// backend call is needed to apply the delta.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub booking_id: String,
    pub current: u32,
    pub delta: i32,
}

/// Apply a local quantity edit, clamped to the orderable range.
///
/// Nothing is persisted until checkout submission.
#[instrument(skip(_auth, session, form))]
pub async fn quantity(
    RequireAuth(_auth): RequireAuth,
    session: Session,
    Form(form): Form<QuantityForm>,
) -> Response {
    let adjusted = Quantity::clamped(form.current).adjusted(form.delta);
    session_store::remember_quantity(&session, &form.booking_id, adjusted.get()).await;
    Redirect::to("/cart").into_response()
}

/// Cancel form data.
#[derive(Debug, Deserialize)]
pub struct CancelForm {
    pub booking_id: String,
}

/// Cancel one cart line.
///
/// The line is removed locally only after the backend confirms; a failure
/// leaves it in place with a transient error.
#[instrument(skip(state, auth, session, form))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    session: Session,
    Form(form): Form<CancelForm>,
) -> Response {
    let booking_id = BookingId::new(form.booking_id.clone());

    match state.api().cancel_booking(&auth.token, &booking_id).await {
        Ok(()) => {
            session_store::forget_quantity(&session, &form.booking_id).await;
            session_store::refresh_cart_count(&session, state.api(), &auth.token).await;
            Redirect::to("/cart?success=cancelled").into_response()
        }
        Err(e) => {
            tracing::error!("Cancel failed: {e}");
            Redirect::to("/cart?error=cancel_failed").into_response()
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Shipping form data.
#[derive(Debug, Deserialize)]
pub struct ShippingForm {
    pub address_one: String,
    pub number: String,
}

/// Validate and load everything a submission needs, or answer with the
/// redirect describing what is wrong.
async fn prepare_submission(
    state: &AppState,
    session: &Session,
    token: &str,
    form: &ShippingForm,
) -> std::result::Result<LoadedCart, Response> {
    if let Err(e) = checkout::validate_shipping(&form.address_one, &form.number) {
        let code = match e {
            checkout::ShippingError::MissingFields => "fields",
            checkout::ShippingError::InvalidPhone => "phone",
        };
        return Err(Redirect::to(&format!("/cart?error={code}")).into_response());
    }

    let cart = match load_cart(state, session, token).await {
        Ok(cart) => cart,
        Err(e) => return Err(e.into_response()),
    };

    if cart.lines.is_empty() {
        return Err(Redirect::to("/cart?error=empty").into_response());
    }

    Ok(cart)
}

/// Submit the cart for cash on delivery.
///
/// One update per line, all required to succeed. On success the cart is
/// empty server-side (every line now has an address), so local state and
/// the badge are simply reset.
#[instrument(skip(state, auth, session, form))]
pub async fn checkout_cod(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    session: Session,
    Form(form): Form<ShippingForm>,
) -> Response {
    let cart = match prepare_submission(&state, &session, &auth.token, &form).await {
        Ok(cart) => cart,
        Err(response) => return response,
    };

    match checkout::submit(
        state.api(),
        &auth.token,
        &cart.lines,
        form.address_one.trim(),
        form.number.trim(),
        PaymentMethod::CashOnDelivery,
    )
    .await
    {
        Ok(()) => {
            session_store::clear_quantity_edits(&session).await;
            session_store::zero_cart_count(&session).await;
            Redirect::to("/cart?success=ordered").into_response()
        }
        Err(e) => {
            tracing::error!("Checkout failed: {e}");
            Redirect::to("/cart?error=checkout_failed").into_response()
        }
    }
}

/// Submit the cart for gateway payment and hand the browser to the gateway.
///
/// The lines are finalized with the gateway payment type first; only then is
/// the signed form rendered, so an aborted payment still leaves a coherent
/// order for the backend to reconcile.
#[instrument(skip(state, auth, session, form))]
pub async fn checkout_esewa(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    session: Session,
    Form(form): Form<ShippingForm>,
) -> Response {
    let cart = match prepare_submission(&state, &session, &auth.token, &form).await {
        Ok(cart) => cart,
        Err(response) => return response,
    };

    if let Err(e) = checkout::submit(
        state.api(),
        &auth.token,
        &cart.lines,
        form.address_one.trim(),
        form.number.trim(),
        PaymentMethod::Esewa,
    )
    .await
    {
        tracing::error!("Failed to prepare gateway payment: {e}");
        return Redirect::to("/cart?error=esewa_failed").into_response();
    }

    session_store::clear_quantity_edits(&session).await;
    session_store::zero_cart_count(&session).await;

    let request = esewa::build_request(
        &state.config().esewa,
        &state.config().base_url,
        checkout::subtotal(&cart.lines),
        checkout::delivery_charge(),
    );

    EsewaRedirectTemplate { request }.into_response()
}

fn redirect_back(next: Option<&str>, message: &str) -> Response {
    // Only ever redirect within the site.
    let target = next
        .filter(|n| n.starts_with('/') && !n.starts_with("//"))
        .unwrap_or("/products");
    let separator = if target.contains('?') { '&' } else { '?' };
    Redirect::to(&format!("{target}{separator}{message}")).into_response()
}

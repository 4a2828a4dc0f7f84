//! Catalog and product-detail route handlers.
//!
//! Filtering is in-process over the full fetched product list: category
//! equality, stock flag, price ceiling on the effective price, and a
//! case-insensitive substring match on the short name. The data volumes the
//! backend serves make server-side pagination unnecessary.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use samaya_core::{PaymentMethod, Price, ProductId, Quantity, ReviewId, Role};

use crate::api::types::{Product, ReviewInput};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::state::AppState;

use super::Nav;

// =============================================================================
// View Types
// =============================================================================

/// Product card display data for the catalog grid.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub short_name: String,
    pub price: String,
    pub discount_price: Option<String>,
    pub stars: usize,
    pub image_url: String,
    pub in_stock: bool,
    pub bookmarked: bool,
}

impl ProductCardView {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn build(product: &Product, api: &crate::api::ApiClient, bookmarked: bool) -> Self {
        let image_url = product
            .default_combination()
            .map(|combo| api.image_url(&combo.image_url))
            .unwrap_or_default();
        let stars = product.rating.unwrap_or(4.0).round().clamp(0.0, 5.0) as usize;

        Self {
            id: product.id.to_string(),
            short_name: product.short_name.clone(),
            price: product.price.to_string(),
            discount_price: product.discount_price.map(|p| p.to_string()),
            stars,
            image_url,
            in_stock: product.in_stock,
            bookmarked,
        }
    }
}

/// Applied catalog filters, echoed back into the sidebar.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
    pub max_price: Option<u32>,
    pub search: Option<String>,
}

impl CatalogQuery {
    /// Whether a product passes every applied filter.
    fn matches(&self, product: &Product) -> bool {
        let category_match = self
            .category
            .as_deref()
            .is_none_or(|category| category == "All" || product.kind == category);
        let stock_match = !self.in_stock || product.in_stock;
        let price_match = self
            .max_price
            .is_none_or(|ceiling| product.effective_price() <= Price::from_rupees(ceiling.into()));
        let search_match = self.search.as_deref().is_none_or(|needle| {
            product
                .short_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });

        category_match && stock_match && price_match && search_match
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct CatalogTemplate {
    pub nav: Nav,
    pub products: Vec<ProductCardView>,
    pub categories: Vec<String>,
    pub selected_category: String,
    pub in_stock_only: bool,
    pub price_ceiling: u32,
    pub price_bound: u32,
    pub search: String,
}

/// Review display data.
#[derive(Clone)]
pub struct ReviewView {
    pub id: String,
    pub username: String,
    pub rating: u8,
    pub comment: String,
    pub can_delete: bool,
}

/// Review form state: create mode when the viewer has no review yet, edit
/// mode pre-filled with their existing one.
#[derive(Clone)]
pub struct ReviewFormView {
    pub editing: bool,
    pub rating: u8,
    pub comment: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub nav: Nav,
    pub id: String,
    pub short_name: String,
    pub full_name: String,
    pub description: String,
    pub price: String,
    pub effective_price: String,
    pub has_discount: bool,
    pub rating: String,
    pub selected_dial: String,
    pub selected_band: String,
    pub selected_image: String,
    pub dial_colors: Vec<String>,
    pub band_colors: Vec<String>,
    pub thumbnails: Vec<ThumbnailView>,
    pub reviews: Vec<ReviewView>,
    pub review_form: ReviewFormView,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Thumbnail display data: a selectable (dial, band) pair.
#[derive(Clone)]
pub struct ThumbnailView {
    pub dial_color: String,
    pub band_color: String,
    pub image_url: String,
    pub selected: bool,
}

// =============================================================================
// Catalog
// =============================================================================

/// Display the catalog with the applied filters.
#[instrument(skip(state, nav, auth))]
pub async fn index(
    State(state): State<AppState>,
    nav: Nav,
    OptionalAuth(auth): OptionalAuth,
    Query(query): Query<CatalogQuery>,
) -> Result<CatalogTemplate> {
    let products = state.api().products().await?;

    // Bookmarked ids for the heart badges; anonymous visitors get none.
    let bookmarked: std::collections::HashSet<String> = match &auth {
        Some(auth) => state
            .api()
            .bookmarks(&auth.token)
            .await
            .map(|products| products.into_iter().map(|p| p.id.to_string()).collect())
            .unwrap_or_default(),
        None => std::collections::HashSet::new(),
    };

    let mut categories: Vec<String> = products.iter().map(|p| p.kind.clone()).collect();
    categories.sort();
    categories.dedup();

    // Slider upper bound: the most expensive effective price on offer.
    let price_bound = products
        .iter()
        .map(|p| p.effective_price())
        .max()
        .and_then(|price| {
            use rust_decimal::prelude::ToPrimitive;
            price.amount().ceil().to_u32()
        })
        .unwrap_or(100_000);

    let cards = products
        .iter()
        .filter(|p| query.matches(p))
        .map(|p| ProductCardView::build(p, state.api(), bookmarked.contains(p.id.as_str())))
        .collect();

    Ok(CatalogTemplate {
        nav,
        products: cards,
        categories,
        selected_category: query.category.unwrap_or_else(|| "All".to_string()),
        in_stock_only: query.in_stock,
        price_ceiling: query.max_price.unwrap_or(price_bound),
        price_bound,
        search: query.search.unwrap_or_default(),
    })
}

// =============================================================================
// Detail
// =============================================================================

/// Color-selection state carried in the query string.
#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub dial: Option<String>,
    pub band: Option<String>,
    /// The image currently on screen, kept when the new (dial, band) pair
    /// has no exact combination.
    pub img: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the product detail page.
#[instrument(skip(state, nav, auth), fields(id = %id))]
pub async fn show(
    State(state): State<AppState>,
    nav: Nav,
    OptionalAuth(auth): OptionalAuth,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<ProductShowTemplate> {
    let product_id = ProductId::new(id);
    let product = state.api().product(&product_id).await?;

    let default_combo = product.default_combination().ok_or_else(|| {
        AppError::Internal(format!("product {product_id} has no image combinations"))
    })?;

    let selected_dial = query.dial.unwrap_or_else(|| default_combo.dial_color.clone());
    let selected_band = query.band.unwrap_or_else(|| default_combo.band_color.clone());

    // Resolve the image for the exact pair; when the pair does not exist,
    // the previously displayed image stays unchanged.
    let selected_image = product
        .combination(&selected_dial, &selected_band)
        .map(|combo| state.api().image_url(&combo.image_url))
        .or(query.img)
        .unwrap_or_else(|| state.api().image_url(&default_combo.image_url));

    let dial_colors = unique(product.image_combinations.iter().map(|c| &c.dial_color));
    let band_colors = unique(product.image_combinations.iter().map(|c| &c.band_color));

    let thumbnails = product
        .image_combinations
        .iter()
        .take(3)
        .map(|combo| ThumbnailView {
            dial_color: combo.dial_color.clone(),
            band_color: combo.band_color.clone(),
            image_url: state.api().image_url(&combo.image_url),
            selected: combo.dial_color == selected_dial && combo.band_color == selected_band,
        })
        .collect();

    let viewer = auth.as_ref().map(|a| &a.user);
    let reviews = product
        .reviews
        .iter()
        .map(|review| ReviewView {
            id: review.id.to_string(),
            username: review.username.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            can_delete: viewer.is_some_and(|user| {
                user.id == review.user || user.role == Role::Admin
            }),
        })
        .collect();

    let review_form = viewer
        .and_then(|user| product.review_by(&user.id))
        .map_or(
            ReviewFormView {
                editing: false,
                rating: 5,
                comment: String::new(),
            },
            |existing| ReviewFormView {
                editing: true,
                rating: existing.rating,
                comment: existing.comment.clone(),
            },
        );

    Ok(ProductShowTemplate {
        nav,
        id: product.id.to_string(),
        short_name: product.short_name.clone(),
        full_name: product.full_name.clone(),
        description: product.description.clone(),
        price: product.price.to_string(),
        effective_price: product.effective_price().to_string(),
        has_discount: product.discount_price.is_some(),
        rating: product
            .rating
            .map_or_else(|| "5".to_string(), |r| format!("{r:.1}")),
        selected_dial,
        selected_band,
        selected_image,
        dial_colors,
        band_colors,
        thumbnails,
        reviews,
        review_form,
        error: query.error,
        success: query.success,
    })
}

// =============================================================================
// Reviews
// =============================================================================

/// Review form data.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub rating: u8,
    pub comment: String,
}

/// Create or update the caller's review on a product.
///
/// Create vs. update is decided by whether the caller already authored a
/// review, matching what the detail form displays.
#[instrument(skip(state, auth, form), fields(id = %id))]
pub async fn submit_review(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<String>,
    Form(form): Form<ReviewForm>,
) -> Response {
    let product_id = ProductId::new(id.clone());

    if !(1..=5).contains(&form.rating) {
        return Redirect::to(&format!("/products/{id}?error=rating")).into_response();
    }
    if form.comment.trim().is_empty() {
        return Redirect::to(&format!("/products/{id}?error=comment")).into_response();
    }

    let editing = match state.api().product(&product_id).await {
        Ok(product) => product.review_by(&auth.user.id).is_some(),
        Err(e) => {
            tracing::error!("Failed to fetch product before review: {e}");
            return Redirect::to(&format!("/products/{id}?error=review")).into_response();
        }
    };

    let review = ReviewInput {
        rating: form.rating,
        comment: form.comment.trim().to_string(),
    };

    let result = if editing {
        state
            .api()
            .update_review(&auth.token, &product_id, &review)
            .await
    } else {
        state
            .api()
            .add_review(&auth.token, &product_id, &review)
            .await
    };

    match result {
        Ok(()) => {
            let flag = if editing { "updated" } else { "added" };
            Redirect::to(&format!("/products/{id}?success={flag}")).into_response()
        }
        Err(e) => {
            tracing::error!("Review submission failed: {e}");
            Redirect::to(&format!("/products/{id}?error=review")).into_response()
        }
    }
}

/// Delete a review (own, or any as admin - the backend checks too).
#[instrument(skip(state, auth), fields(id = %id, review_id = %review_id))]
pub async fn delete_review(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path((id, review_id)): Path<(String, String)>,
) -> Response {
    let product_id = ProductId::new(id.clone());
    let review_id = ReviewId::new(review_id);

    match state
        .api()
        .delete_review(&auth.token, &product_id, &review_id)
        .await
    {
        Ok(()) => Redirect::to(&format!("/products/{id}?success=deleted")).into_response(),
        Err(e) => {
            tracing::error!("Review deletion failed: {e}");
            Redirect::to(&format!("/products/{id}?error=delete")).into_response()
        }
    }
}

/// Distinct values in first-occurrence order.
fn unique<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .filter(|value| seen.insert(value.as_str().to_string()))
        .cloned()
        .collect()
}

// Used by the cart handlers when adding from a card without color choice.
pub(crate) fn default_booking(
    product: &Product,
    quantity: Quantity,
) -> crate::api::types::NewBooking {
    let combo = product.default_combination();
    crate::api::types::NewBooking {
        product_id: product.id.clone(),
        quantity,
        product_image: combo.map(|c| c.image_url.clone()).unwrap_or_default(),
        product_short_name: product.short_name.clone(),
        price: product.effective_price(),
        dial_color: combo.map(|c| c.dial_color.clone()),
        band_color: combo.map(|c| c.band_color.clone()),
        address_one: None,
        number: None,
        payment_type: None::<PaymentMethod>,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::types::ImageCombination;

    fn product(kind: &str, in_stock: bool, price: i64, discount: Option<i64>, name: &str) -> Product {
        Product {
            id: ProductId::new("p1"),
            short_name: name.to_string(),
            full_name: format!("Omega {name}"),
            price: Price::from_rupees(price),
            discount_price: discount.map(Price::from_rupees),
            kind: kind.to_string(),
            in_stock,
            rating: None,
            description: String::new(),
            image_combinations: vec![ImageCombination {
                dial_color: "black".to_string(),
                band_color: "black".to_string(),
                image_url: "/uploads/p1.png".to_string(),
            }],
            reviews: Vec::new(),
        }
    }

    fn no_filters() -> CatalogQuery {
        CatalogQuery {
            category: None,
            in_stock: false,
            max_price: None,
            search: None,
        }
    }

    #[test]
    fn test_no_filters_match_everything() {
        assert!(no_filters().matches(&product("analog", false, 9000, None, "Seamaster")));
    }

    #[test]
    fn test_category_filter() {
        let query = CatalogQuery {
            category: Some("digital".to_string()),
            ..no_filters()
        };
        assert!(query.matches(&product("digital", true, 9000, None, "G-Shock")));
        assert!(!query.matches(&product("analog", true, 9000, None, "Seamaster")));

        let all = CatalogQuery {
            category: Some("All".to_string()),
            ..no_filters()
        };
        assert!(all.matches(&product("analog", true, 9000, None, "Seamaster")));
    }

    #[test]
    fn test_stock_filter() {
        let query = CatalogQuery {
            in_stock: true,
            ..no_filters()
        };
        assert!(query.matches(&product("analog", true, 9000, None, "Seamaster")));
        assert!(!query.matches(&product("analog", false, 9000, None, "Seamaster")));
    }

    #[test]
    fn test_price_ceiling_uses_effective_price() {
        let query = CatalogQuery {
            max_price: Some(5000),
            ..no_filters()
        };
        // List price over the ceiling, but discounted under it
        assert!(query.matches(&product("analog", true, 9000, Some(4500), "Seamaster")));
        assert!(!query.matches(&product("analog", true, 9000, None, "Seamaster")));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let query = CatalogQuery {
            search: Some("SEA".to_string()),
            ..no_filters()
        };
        assert!(query.matches(&product("analog", true, 9000, None, "Seamaster")));
        assert!(!query.matches(&product("analog", true, 9000, None, "Speedmaster")));
    }

    #[test]
    fn test_unique_keeps_first_occurrence_order() {
        let values = vec![
            "blue".to_string(),
            "black".to_string(),
            "blue".to_string(),
            "white".to_string(),
        ];
        assert_eq!(unique(values.iter()), vec!["blue", "black", "white"]);
    }

    #[test]
    fn test_default_booking_uses_default_combination() {
        let product = product("analog", true, 9000, Some(7500), "Seamaster");
        let booking = default_booking(&product, Quantity::clamped(2));
        assert_eq!(booking.price, Price::from_rupees(7500));
        assert_eq!(booking.quantity.get(), 2);
        assert_eq!(booking.dial_color.as_deref(), Some("black"));
        assert!(booking.address_one.is_none());
        assert!(booking.payment_type.is_none());
    }
}

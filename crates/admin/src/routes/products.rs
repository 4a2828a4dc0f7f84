//! Products panel: catalog management with image-combination uploads.
//!
//! Product submissions are multipart: scalar fields plus up to three
//! (dial color, band color, image file) rows. Rows without a file are
//! skipped, so an update that only touches scalar fields uploads nothing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use samaya_core::ProductId;

use crate::api::types::{CombinationUpload, ProductFields};
use crate::components::data_table::{TableColumn, columns};
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdminAuth;
use crate::state::AppState;

use super::MessageQuery;

/// Product row display data.
#[derive(Clone)]
pub struct ProductRow {
    pub id: String,
    pub short_name: String,
    pub full_name: String,
    pub price: String,
    pub price_plain: String,
    pub discount_price: String,
    pub kind: String,
    pub in_stock: bool,
    pub rating: String,
    pub combination_count: usize,
    pub description: String,
}

/// Products page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub admin_name: String,
    pub columns: Vec<TableColumn>,
    pub products: Vec<ProductRow>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the product table with the create form.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Result<ProductsTemplate> {
    let catalog = state.api().products().await?;

    let products = catalog
        .into_iter()
        .map(|product| ProductRow {
            id: product.id.to_string(),
            short_name: product.short_name,
            full_name: product.full_name,
            price: product.price.to_string(),
            price_plain: product.price.plain(),
            discount_price: product
                .discount_price
                .map_or_else(|| "N/A".to_string(), |p| p.to_string()),
            kind: product.kind,
            in_stock: product.in_stock,
            rating: product
                .rating
                .map_or_else(|| "0".to_string(), |r| format!("{r:.1}")),
            combination_count: product.image_combinations.len(),
            description: product.description,
        })
        .collect();

    Ok(ProductsTemplate {
        admin_name: auth.admin.username,
        columns: columns(&[
            ("short_name", "Short Name"),
            ("price", "Price"),
            ("discount", "Discount"),
            ("type", "Type"),
            ("stock", "Stock"),
            ("rating", "Rating"),
            ("combinations", "Combinations"),
            ("actions", "Action"),
        ]),
        products,
        error: query.error,
        success: query.success,
    })
}

/// A parsed product submission.
struct ProductSubmission {
    fields: ProductFields,
    combinations: Vec<CombinationUpload>,
}

/// Read a product submission out of a multipart body.
///
/// Combination rows arrive as repeated `dial_color` / `band_color` /
/// `image` fields in row order.
async fn read_submission(mut multipart: Multipart) -> Option<ProductSubmission> {
    let mut short_name = String::new();
    let mut full_name = String::new();
    let mut price = String::new();
    let mut discount_price = None;
    let mut kind = "analog".to_string();
    let mut in_stock = true;
    let mut description = String::new();

    let mut dial_colors: Vec<String> = Vec::new();
    let mut band_colors: Vec<String> = Vec::new();
    let mut images: Vec<Option<(String, Vec<u8>)>> = Vec::new();

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "short_name" => short_name = field.text().await.ok()?,
            "full_name" => full_name = field.text().await.ok()?,
            "price" => price = field.text().await.ok()?,
            "discount_price" => {
                discount_price = field.text().await.ok().filter(|v| !v.is_empty());
            }
            "type" => kind = field.text().await.ok()?,
            "in_stock" => in_stock = field.text().await.ok()? == "true",
            "description" => description = field.text().await.ok()?,
            "dial_color" => dial_colors.push(field.text().await.ok()?),
            "band_color" => band_colors.push(field.text().await.ok()?),
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.ok()?;
                if file_name.is_empty() || bytes.is_empty() {
                    images.push(None);
                } else {
                    images.push(Some((file_name, bytes.to_vec())));
                }
            }
            _ => {}
        }
    }

    let combinations = dial_colors
        .into_iter()
        .zip(band_colors)
        .zip(images)
        .filter_map(|((dial_color, band_color), image)| {
            let (file_name, bytes) = image?;
            if dial_color.is_empty() || band_color.is_empty() {
                return None;
            }
            Some(CombinationUpload {
                dial_color,
                band_color,
                file_name,
                bytes,
            })
        })
        .collect();

    Some(ProductSubmission {
        fields: ProductFields {
            short_name,
            full_name,
            price,
            discount_price,
            kind,
            in_stock,
            description,
        },
        combinations,
    })
}

fn validate(submission: &ProductSubmission) -> bool {
    !submission.fields.short_name.is_empty()
        && !submission.fields.full_name.is_empty()
        && submission.fields.price.parse::<f64>().is_ok()
}

/// Create a product.
#[instrument(skip(state, auth, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    multipart: Multipart,
) -> Response {
    let Some(submission) = read_submission(multipart).await else {
        return Redirect::to("/products?error=fields").into_response();
    };

    if !validate(&submission) {
        return Redirect::to("/products?error=fields").into_response();
    }
    if submission.combinations.is_empty() {
        // A product is unsellable without at least one image combination.
        return Redirect::to("/products?error=combinations").into_response();
    }

    match state
        .api()
        .create_product(&auth.token, &submission.fields, submission.combinations)
        .await
    {
        Ok(()) => Redirect::to("/products?success=created").into_response(),
        Err(e) => {
            tracing::error!("Failed to create product: {e}");
            Redirect::to("/products?error=create_failed").into_response()
        }
    }
}

/// Update a product.
#[instrument(skip(state, auth, multipart), fields(id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let product_id = ProductId::new(id);

    let Some(submission) = read_submission(multipart).await else {
        return Redirect::to("/products?error=fields").into_response();
    };

    if !validate(&submission) {
        return Redirect::to("/products?error=fields").into_response();
    }

    match state
        .api()
        .update_product(
            &auth.token,
            &product_id,
            &submission.fields,
            submission.combinations,
        )
        .await
    {
        Ok(()) => Redirect::to("/products?success=updated").into_response(),
        Err(e) => {
            tracing::error!("Failed to update product: {e}");
            Redirect::to("/products?error=update_failed").into_response()
        }
    }
}

/// Delete a product.
#[instrument(skip(state, auth), fields(id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Path(id): Path<String>,
) -> Response {
    let product_id = ProductId::new(id);
    match state.api().delete_product(&auth.token, &product_id).await {
        Ok(()) => Redirect::to("/products?success=deleted").into_response(),
        Err(e) => {
            tracing::error!("Failed to delete product: {e}");
            Redirect::to("/products?error=delete_failed").into_response()
        }
    }
}

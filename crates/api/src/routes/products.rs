//! Catalog and product administration route handlers.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use futures::future::try_join_all;
use kicks_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AdminEnvelope, Envelope};
use crate::config::{MAX_IMAGE_BYTES, MAX_IMAGES};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{PRODUCTS_COLLECTION, Product, ProductPatch};
use crate::services::images::{self, ImageUpload};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProductListEnvelope {
    pub success: bool,
    pub products: Vec<Product>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ProductEnvelope {
    pub success: bool,
    pub product: Product,
    pub message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListRequest {
    pub product_list: Vec<ProductId>,
}

#[derive(Deserialize)]
pub struct ProductIdRequest {
    pub id: ProductId,
}

fn parse_product(doc: Value) -> Result<Product> {
    serde_json::from_value(doc)
        .map_err(|err| AppError::Internal(format!("Corrupt product document: {err}")))
}

/// Fetch a set of products concurrently, preserving request order.
pub(super) async fn fetch_products(state: &AppState, ids: &[ProductId]) -> Result<Vec<Product>> {
    let fetches = ids
        .iter()
        .map(|id| state.store().get(PRODUCTS_COLLECTION, id.as_str()));

    try_join_all(fetches)
        .await?
        .into_iter()
        .map(parse_product)
        .collect()
}

/// All products in the catalog.
pub async fn index(State(state): State<AppState>) -> Result<Json<ProductListEnvelope>> {
    let products = state
        .store()
        .list(PRODUCTS_COLLECTION)
        .await?
        .into_iter()
        .map(parse_product)
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(ProductListEnvelope {
        success: true,
        products,
        message: "Product list has been retrieved".to_string(),
    }))
}

/// Prefix search on `primaryName`.
///
/// The frontend encodes spaces as hyphens in the path segment, so they are
/// folded back before querying. Matching is case-sensitive, like the
/// underlying range query.
pub async fn search(
    State(state): State<AppState>,
    Path(value): Path<String>,
) -> Result<Json<ProductListEnvelope>> {
    let term = value.replace('-', " ");

    let products = state
        .store()
        .query_prefix(PRODUCTS_COLLECTION, "primaryName", &term)
        .await?
        .into_iter()
        .map(parse_product)
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(ProductListEnvelope {
        success: true,
        products,
        message: "Product search results have been retrieved".to_string(),
    }))
}

/// One product by id.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductEnvelope>> {
    let doc = state.store().get(PRODUCTS_COLLECTION, id.as_str()).await?;
    let product = parse_product(doc)?;

    Ok(Json(ProductEnvelope {
        success: true,
        product,
        message: "Product data has been retrieved".to_string(),
    }))
}

/// Products for an explicit list of ids, e.g. a cart page.
pub async fn by_ids(
    State(state): State<AppState>,
    Json(body): Json<ProductListRequest>,
) -> Result<Json<ProductListEnvelope>> {
    let products = fetch_products(&state, &body.product_list).await?;

    Ok(Json(ProductListEnvelope {
        success: true,
        products,
        message: "Product list has been retrieved".to_string(),
    }))
}

/// Accumulates the text fields of the `save-product` multipart form.
#[derive(Default)]
struct ProductForm {
    primary_name: Option<String>,
    secondary_name: Option<String>,
    variant: Option<String>,
    msrp: Option<String>,
    release_date: Option<String>,
    colorway: Option<String>,
    description: Option<String>,
}

impl ProductForm {
    fn set(&mut self, name: &str, value: String) -> Result<()> {
        match name {
            "primaryName" => self.primary_name = Some(value),
            "secondaryName" => self.secondary_name = Some(value),
            "variant" => self.variant = Some(value),
            "msrp" => self.msrp = Some(value),
            "releaseDate" => self.release_date = Some(value),
            "colorway" => self.colorway = Some(value),
            "description" => self.description = Some(value),
            other => {
                return Err(AppError::BadRequest(format!(
                    "Unexpected form field: {other}"
                )));
            }
        }
        Ok(())
    }

    fn into_product(self, id: ProductId) -> Result<Product> {
        let primary_name = self
            .primary_name
            .ok_or_else(|| AppError::BadRequest("Missing form field: primaryName".to_string()))?;
        let msrp = self
            .msrp
            .ok_or_else(|| AppError::BadRequest("Missing form field: msrp".to_string()))?;
        let msrp = msrp
            .parse::<Decimal>()
            .map(Price::new)
            .map_err(|err| AppError::BadRequest(format!("Invalid msrp: {err}")))?;

        Ok(Product {
            id,
            primary_name,
            secondary_name: self.secondary_name.unwrap_or_default(),
            variant: self.variant.unwrap_or_default(),
            msrp,
            release_date: self.release_date.unwrap_or_default(),
            colorway: self.colorway.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            images: Vec::new(),
        })
    }
}

/// Create a product from a multipart form with up to [`MAX_IMAGES`] images.
///
/// The whole form is read and validated before any byte reaches the bucket,
/// and all image uploads are awaited before the document is written, so the
/// stored image URLs always point at objects that exist.
pub async fn save(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AdminEnvelope>)> {
    let mut form = ProductForm::default();
    let mut uploads: Vec<ImageUpload> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Malformed multipart body: {err}")))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if name == "images" {
            if uploads.len() >= MAX_IMAGES {
                return Err(AppError::BadRequest(format!(
                    "At most {MAX_IMAGES} images per product"
                )));
            }
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::BadRequest(format!("Failed to read image: {err}")))?;
            if bytes.len() > MAX_IMAGE_BYTES {
                return Err(AppError::BadRequest(format!(
                    "Image exceeds the {MAX_IMAGE_BYTES} byte limit"
                )));
            }
            uploads.push(ImageUpload {
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|err| AppError::BadRequest(format!("Failed to read field: {err}")))?;
            form.set(&name, value)?;
        }
    }

    let mut product = form.into_product(ProductId::generate())?;
    product.images =
        images::store_product_images(state.storage(), state.url_policy(), &product.id, uploads)
            .await?;

    let fields = product
        .to_fields()
        .map_err(|err| AppError::Internal(err.to_string()))?;
    state
        .store()
        .set(PRODUCTS_COLLECTION, product.id.as_str(), fields)
        .await?;

    tracing::info!(product_id = %product.id, "Product created");

    Ok((
        StatusCode::CREATED,
        Json(AdminEnvelope {
            success: true,
            authorized: true,
            message: "Product data was sent to the database".to_string(),
        }),
    ))
}

/// Merge-update the text fields of an existing product.
///
/// Image replacement is out of scope here; products keep their uploaded
/// images until deleted.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<AdminEnvelope>> {
    let id = patch.id.clone();
    let fields = patch.into_fields();

    if fields.is_empty() {
        return Err(AppError::BadRequest(
            "No product fields to update".to_string(),
        ));
    }

    state
        .store()
        .update(PRODUCTS_COLLECTION, id.as_str(), fields)
        .await?;

    Ok(Json(AdminEnvelope {
        success: true,
        authorized: true,
        message: "Product data has been updated".to_string(),
    }))
}

/// Delete a product and its stored images.
///
/// The document is read first to learn how many image objects to remove;
/// image deletions that fail are logged and skipped so a half-cleaned bucket
/// never leaves the document behind.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
    Json(body): Json<ProductIdRequest>,
) -> Result<Json<Envelope>> {
    let doc = state
        .store()
        .get(PRODUCTS_COLLECTION, body.id.as_str())
        .await?;
    let product = parse_product(doc)?;

    images::delete_product_images(state.storage(), &body.id, product.images.len()).await;

    state
        .store()
        .delete(PRODUCTS_COLLECTION, body.id.as_str())
        .await?;

    tracing::info!(product_id = %body.id, "Product deleted");

    Ok(Json(Envelope {
        success: true,
        message: "Product data and images have been deleted".to_string(),
    }))
}

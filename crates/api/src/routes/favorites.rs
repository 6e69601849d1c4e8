//! Favorites route handlers.
//!
//! All three routes operate on the caller's own favorites document, keyed
//! by the subject id from the verified bearer token. The document must
//! already exist (created via `POST /add-user`); a missing document is a
//! 404, not an implicit create.

use axum::{Json, extract::State, http::StatusCode};
use kicks_core::ProductId;
use serde::{Deserialize, Serialize};

use super::{Envelope, products};
use crate::error::{AppError, Result};
use crate::middleware::Identity;
use crate::models::{FavoritesDoc, Product, USERS_COLLECTION};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FavoriteRequest {
    pub id: ProductId,
}

#[derive(Serialize)]
pub struct FavoritesEnvelope {
    pub success: bool,
    pub products: Vec<Product>,
    pub message: String,
}

async fn load_favorites(state: &AppState, subject: &str) -> Result<FavoritesDoc> {
    let doc = state.store().get(USERS_COLLECTION, subject).await?;
    serde_json::from_value(doc)
        .map_err(|err| AppError::Internal(format!("Corrupt favorites document: {err}")))
}

/// Add a product id to the caller's favorites.
///
/// Idempotent: adding an id already on the list writes nothing and
/// responds 200 instead of 201.
pub async fn add_product(
    State(state): State<AppState>,
    Identity(claims): Identity,
    Json(body): Json<FavoriteRequest>,
) -> Result<(StatusCode, Json<Envelope>)> {
    let subject = claims.subject_id();
    let mut favorites = load_favorites(&state, subject.as_str()).await?;

    if !favorites.add(body.id) {
        return Ok((
            StatusCode::OK,
            Json(Envelope {
                success: true,
                message: "Product is already on the favorites list".to_string(),
            }),
        ));
    }

    state
        .store()
        .update(USERS_COLLECTION, subject.as_str(), favorites.to_fields())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: "Product was added to the favorites list".to_string(),
        }),
    ))
}

/// Remove a product id from the caller's favorites.
///
/// Removing an id that is not on the list is a no-op 200.
pub async fn remove_product(
    State(state): State<AppState>,
    Identity(claims): Identity,
    Json(body): Json<FavoriteRequest>,
) -> Result<(StatusCode, Json<Envelope>)> {
    let subject = claims.subject_id();
    let mut favorites = load_favorites(&state, subject.as_str()).await?;

    if !favorites.remove(&body.id) {
        return Ok((
            StatusCode::OK,
            Json(Envelope {
                success: true,
                message: "Product was not on the favorites list".to_string(),
            }),
        ));
    }

    state
        .store()
        .update(USERS_COLLECTION, subject.as_str(), favorites.to_fields())
        .await?;

    Ok((
        StatusCode::OK,
        Json(Envelope {
            success: true,
            message: "Product was removed from the favorites list".to_string(),
        }),
    ))
}

/// The caller's favorited products, resolved to full documents.
///
/// Product fetches run concurrently; if any favorited id no longer exists
/// in the catalog the whole request fails with 404.
pub async fn list(
    State(state): State<AppState>,
    Identity(claims): Identity,
) -> Result<Json<FavoritesEnvelope>> {
    let subject = claims.subject_id();
    let favorites = load_favorites(&state, subject.as_str()).await?;

    let products = products::fetch_products(&state, &favorites.products).await?;

    Ok(Json(FavoritesEnvelope {
        success: true,
        products,
        message: "Favorites list has been retrieved".to_string(),
    }))
}

//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - API banner
//!
//! # Users & favorites (bearer token required)
//! POST   /add-user                  - Create the caller's favorites document
//! GET    /favorites                 - The caller's favorited products
//! POST   /favorites/add-product     - Add a product id (idempotent)
//! DELETE /favorites/remove-product  - Remove a product id (no-op if absent)
//!
//! # Catalog (public)
//! GET    /products                  - All products
//! GET    /products/search/{value}   - Prefix search on primaryName
//! GET    /products/{id}             - One product
//! POST   /products/list             - Products for a list of ids
//!
//! # Administration (bearer token + access:admin)
//! GET    /authorization             - Permission probe for the frontend
//! POST   /save-product              - Create product (multipart with images)
//! PUT    /update-product            - Merge-update product fields
//! DELETE /delete-product            - Delete product and its images
//! ```
//!
//! Every response body is a JSON envelope of shape `{success, message, ...}`.

pub mod authorization;
pub mod favorites;
pub mod products;
pub mod users;

use axum::{
    Json, Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Standard response envelope.
#[derive(Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
}

/// Envelope for admin routes, which also confirm authorization to the
/// frontend so it can mount role-gated views.
#[derive(Serialize)]
pub struct AdminEnvelope {
    pub success: bool,
    pub authorized: bool,
    pub message: String,
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        // Users & favorites
        .route("/add-user", post(users::add_user))
        .route("/favorites", get(favorites::list))
        .route("/favorites/add-product", post(favorites::add_product))
        .route(
            "/favorites/remove-product",
            delete(favorites::remove_product),
        )
        // Catalog
        .route("/products", get(products::index))
        .route("/products/search/{value}", get(products::search))
        .route("/products/{id}", get(products::show))
        .route("/products/list", post(products::by_ids))
        // Administration
        .route("/authorization", get(authorization::check))
        .route("/save-product", post(products::save))
        .route("/update-product", put(products::update))
        .route("/delete-product", delete(products::destroy))
}

/// API banner.
async fn index() -> Json<Envelope> {
    Json(Envelope {
        success: true,
        message: "Kicks API".to_string(),
    })
}

//! User route handlers.

use axum::{Json, extract::State, http::StatusCode};

use super::Envelope;
use crate::error::Result;
use crate::middleware::Identity;
use crate::models::{FavoritesDoc, USERS_COLLECTION};
use crate::state::AppState;

/// Create the caller's favorites document, keyed by their subject id.
///
/// A whole-document write: calling this again resets the favorites list,
/// matching first-login behavior on the frontend.
pub async fn add_user(
    State(state): State<AppState>,
    Identity(claims): Identity,
) -> Result<(StatusCode, Json<Envelope>)> {
    let subject = claims.subject_id();

    state
        .store()
        .set(
            USERS_COLLECTION,
            subject.as_str(),
            FavoritesDoc::default().to_fields(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: "User was added to the database".to_string(),
        }),
    ))
}

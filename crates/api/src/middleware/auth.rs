//! Authentication and authorization extractors.
//!
//! [`Identity`] verifies the bearer token; [`RequireAdmin`] additionally
//! checks the `access:admin` permission. Both reject before the handler
//! body runs, so an unauthenticated request never reaches the data layer.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::auth::{AuthError, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Permission required for catalog administration routes.
pub const ADMIN_PERMISSION: &str = "access:admin";

/// Extractor that requires a verified bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     Identity(claims): Identity,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", claims.subject_id())
/// }
/// ```
pub struct Identity(pub Claims);

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?;
        let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MalformedHeader)?;

        let claims = state.verifier().verify(token).await?;
        Ok(Self(claims))
    }
}

/// Extractor that requires a verified token carrying the admin permission.
///
/// Authentication failures reject with 401; a valid token without the
/// permission rejects with 403.
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Identity(claims) = Identity::from_request_parts(parts, state).await?;

        if !claims.has_permission(ADMIN_PERMISSION) {
            return Err(AppError::Forbidden(format!(
                "missing required permission {ADMIN_PERMISSION}"
            )));
        }

        Ok(Self(claims))
    }
}

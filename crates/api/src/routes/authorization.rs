//! Permission probe for the admin frontend.

use axum::Json;

use super::AdminEnvelope;
use crate::error::Result;
use crate::middleware::RequireAdmin;

/// Confirm the caller holds the admin permission.
///
/// Reaching the handler at all means the extractor accepted the token, so
/// the body only ever reports success; rejections surface as 401/403
/// envelopes from the extractor.
pub async fn check(RequireAdmin(_claims): RequireAdmin) -> Result<Json<AdminEnvelope>> {
    Ok(Json(AdminEnvelope {
        success: true,
        authorized: true,
        message: "User is authorized for administrative actions".to_string(),
    }))
}

//! Product image pipeline.
//!
//! Images live in the bucket under deterministic names
//! (`{product_id}_image-{index}`). Uploads for one product run concurrently
//! and are joined before any URL is produced, so a stored document never
//! references an object that failed to upload.

use std::time::Duration;

use bytes::Bytes;
use futures::future::try_join_all;
use kicks_core::ProductId;

use crate::error::{AppError, Result};
use crate::storage::ObjectStorage;

/// One uploaded image file from a multipart request.
pub struct ImageUpload {
    pub content_type: String,
    pub bytes: Bytes,
}

/// How image URLs are produced for stored documents.
#[derive(Debug, Clone, Copy)]
pub struct UrlPolicy {
    /// Generate time-limited signed URLs instead of public download URLs.
    pub signed: bool,
    /// Signed URL lifetime.
    pub ttl: Duration,
}

/// Deterministic object name for a product image.
#[must_use]
pub fn object_name(product_id: &ProductId, index: usize) -> String {
    format!("{product_id}_image-{index}")
}

/// Upload a product's images and return one URL per image, in order.
///
/// All uploads are awaited before URL generation starts.
///
/// # Errors
///
/// Returns the storage error if any upload or signing call fails; no URLs
/// are returned in that case.
pub async fn store_product_images(
    storage: &dyn ObjectStorage,
    policy: UrlPolicy,
    product_id: &ProductId,
    images: Vec<ImageUpload>,
) -> Result<Vec<String>> {
    let count = images.len();

    let uploads = images.into_iter().enumerate().map(|(index, image)| {
        let name = object_name(product_id, index);
        async move {
            storage
                .upload(&name, &image.content_type, image.bytes)
                .await
        }
    });
    try_join_all(uploads).await.map_err(AppError::from)?;

    let mut urls = Vec::with_capacity(count);
    for index in 0..count {
        let name = object_name(product_id, index);
        let url = if policy.signed {
            storage.signed_url(&name, policy.ttl).await?
        } else {
            storage.public_url(&name)
        };
        urls.push(url);
    }

    Ok(urls)
}

/// Delete a product's stored image objects.
///
/// Individual delete failures are logged and skipped so a missing object
/// never blocks product deletion.
pub async fn delete_product_images(
    storage: &dyn ObjectStorage,
    product_id: &ProductId,
    count: usize,
) {
    for index in 0..count {
        let name = object_name(product_id, index);
        if let Err(error) = storage.delete(&name).await {
            tracing::warn!(%error, object = %name, "Failed to delete product image");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_format() {
        let id = ProductId::from("a1b2c3d4");
        assert_eq!(object_name(&id, 0), "a1b2c3d4_image-0");
        assert_eq!(object_name(&id, 4), "a1b2c3d4_image-4");
    }
}

//! Object storage for product images.
//!
//! The [`ObjectStorage`] trait is the seam between the image pipeline and
//! the remote bucket. Production uses [`GcsClient`] over the Cloud Storage
//! JSON API; tests use an in-memory fake. Upload and URL generation are
//! independent operations; callers are responsible for awaiting uploads
//! before handing out URLs.

mod gcs;

pub use gcs::GcsClient;

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::google::TokenError;

/// Errors from object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transport-level failure talking to the bucket.
    #[error("Object storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage service rejected the request.
    #[error("Object storage returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Obtaining an access token failed.
    #[error("Google auth error: {0}")]
    Token(#[from] TokenError),

    /// Signing a URL failed.
    #[error("URL signing failed: {0}")]
    Sign(String),
}

/// Access to a managed object-storage bucket.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write an object's bytes under the given name.
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), StorageError>;

    /// Delete an object.
    async fn delete(&self, name: &str) -> Result<(), StorageError>;

    /// Public download URL for an object (no authorization required).
    fn public_url(&self, name: &str) -> String;

    /// Time-limited signed GET URL for an otherwise private object.
    async fn signed_url(&self, name: &str, ttl: Duration) -> Result<String, StorageError>;
}

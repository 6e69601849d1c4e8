//! Document store access for the `products` and `users` collections.
//!
//! The [`DocumentStore`] trait is the seam between the route layer and the
//! remote document database. Production uses [`FirestoreClient`] over the
//! Firestore REST v1 API; tests use an in-memory fake. Operations are direct
//! pass-throughs: no retries, no transactions, no optimistic concurrency.

mod firestore;
mod value;

pub use firestore::FirestoreClient;
pub use value::{fields_from_document, fields_to_document};

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::google::TokenError;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested document does not exist.
    #[error("No such document: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Transport-level failure talking to the store.
    #[error("Document store request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the request.
    #[error("Document store returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A document could not be decoded.
    #[error("Failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),

    /// Obtaining an access token failed.
    #[error("Google auth error: {0}")]
    Token(#[from] TokenError),
}

/// Access to named documents in a remote document store.
///
/// Documents are plain JSON objects; collection and document ids are opaque
/// strings chosen by the caller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Overwrite a document, creating it if absent.
    async fn set(&self, collection: &str, id: &str, fields: Map<String, Value>)
    -> Result<(), StoreError>;

    /// Merge top-level fields into an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting an absent document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Fetch a document, or [`StoreError::NotFound`] if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Value, StoreError>;

    /// Fetch every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// Fetch documents whose string `field` starts with `prefix`.
    ///
    /// Implemented as the range query `field >= prefix AND field <= prefix + "z"`.
    async fn query_prefix(
        &self,
        collection: &str,
        field: &str,
        prefix: &str,
    ) -> Result<Vec<Value>, StoreError>;
}

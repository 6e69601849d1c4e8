//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::config::ApiConfig;
use crate::services::images::UrlPolicy;
use crate::storage::ObjectStorage;
use crate::store::DocumentStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the document store, object storage, and the
/// bearer-token verifier. The store and storage sit behind trait objects
/// so tests can swap in in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    store: Arc<dyn DocumentStore>,
    storage: Arc<dyn ObjectStorage>,
    verifier: TokenVerifier,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: ApiConfig,
        store: Arc<dyn DocumentStore>,
        storage: Arc<dyn ObjectStorage>,
        verifier: TokenVerifier,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                storage,
                verifier,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the object storage backend.
    #[must_use]
    pub fn storage(&self) -> &dyn ObjectStorage {
        self.inner.storage.as_ref()
    }

    /// Get a reference to the bearer-token verifier.
    #[must_use]
    pub fn verifier(&self) -> &TokenVerifier {
        &self.inner.verifier
    }

    /// Image URL policy derived from configuration.
    #[must_use]
    pub fn url_policy(&self) -> UrlPolicy {
        UrlPolicy {
            signed: self.inner.config.signed_urls,
            ttl: self.inner.config.signed_url_ttl,
        }
    }
}

//! Cached JWKS fetching with rate-limited refresh.
//!
//! The provider rotates signing keys, so the key set is cached with a TTL
//! and refetched when a token references an unknown `kid`. Refetches are
//! capped at five per minute so a flood of garbage tokens cannot hammer
//! the JWKS endpoint.

use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use moka::future::Cache;
use tokio::sync::Mutex;

use super::AuthError;

/// How long a fetched key set stays valid.
const KEY_SET_TTL: Duration = Duration::from_secs(10 * 60 * 60);

/// Minimum spacing between JWKS fetches (five per minute).
const MIN_FETCH_INTERVAL: Duration = Duration::from_secs(12);

/// Single cache slot holding the current key set.
const JWKS_SLOT: &str = "jwks";

/// Caches the provider's published key set.
pub struct JwksCache {
    client: reqwest::Client,
    uri: String,
    cache: Cache<&'static str, JwkSet>,
    last_fetch: Mutex<Option<Instant>>,
}

impl JwksCache {
    /// Create a cache for the given JWKS endpoint.
    #[must_use]
    pub fn new(uri: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            uri: uri.to_string(),
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(KEY_SET_TTL)
                .build(),
            last_fetch: Mutex::new(None),
        }
    }

    /// Resolve a signing key by `kid`, refetching the set if the key is
    /// unknown and the rate limit allows.
    pub async fn get(&self, kid: Option<&str>) -> Result<Option<Jwk>, AuthError> {
        if let Some(set) = self.cache.get(JWKS_SLOT).await
            && let Some(jwk) = find_key(&set, kid)
        {
            return Ok(Some(jwk));
        }

        let Some(set) = self.refresh().await? else {
            return Ok(None);
        };
        Ok(find_key(&set, kid))
    }

    /// Fetch the key set unless a fetch happened too recently; in that case
    /// fall back to whatever is cached.
    async fn refresh(&self) -> Result<Option<JwkSet>, AuthError> {
        let mut last = self.last_fetch.lock().await;
        if let Some(at) = *last
            && at.elapsed() < MIN_FETCH_INTERVAL
        {
            return Ok(self.cache.get(JWKS_SLOT).await);
        }
        *last = Some(Instant::now());

        let set: JwkSet = self
            .client
            .get(&self.uri)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!(keys = set.keys.len(), "Fetched JWKS key set");
        self.cache.insert(JWKS_SLOT, set.clone()).await;
        Ok(Some(set))
    }
}

/// Find a key by `kid`; without a `kid`, fall back to the first published key.
pub(super) fn find_key(set: &JwkSet, kid: Option<&str>) -> Option<Jwk> {
    match kid {
        Some(kid) => set.find(kid).cloned(),
        None => set.keys.first().cloned(),
    }
}

//! OAuth access tokens for the service account.
//!
//! Mints an RS256 assertion from the service-account key and exchanges it at
//! the token endpoint (`grant_type=jwt-bearer`). The resulting access token
//! is cached and reused until shortly before expiry.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use super::ServiceAccountKey;

/// OAuth scopes covering Firestore, Cloud Storage, and IAM blob signing.
const OAUTH_SCOPES: &str = "https://www.googleapis.com/auth/datastore \
    https://www.googleapis.com/auth/devstorage.read_write \
    https://www.googleapis.com/auth/iam";

/// Assertion lifetime in seconds (Google caps this at one hour).
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Errors obtaining an access token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid service-account key: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),
    #[error("Token request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token exchange rejected: {0}")]
    Exchange(String),
}

/// Claims of the service-account assertion JWT.
#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Response from the token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds.
    expires_in: i64,
}

/// A cached access token with its expiry timestamp.
struct CachedToken {
    token: SecretString,
    expires_at: i64,
}

impl CachedToken {
    /// Consider expired if less than 60 seconds remaining.
    fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - 60
    }
}

/// Provides cached OAuth access tokens for the service account.
pub struct TokenProvider {
    client: reqwest::Client,
    key: ServiceAccountKey,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    /// Create a provider for the given service-account key.
    #[must_use]
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            client: reqwest::Client::new(),
            key,
            cached: RwLock::new(None),
        }
    }

    /// The service-account email, needed for signed-URL credentials.
    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Get a valid access token, fetching a fresh one if the cache is stale.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the assertion cannot be signed or the exchange
    /// fails.
    pub async fn token(&self) -> Result<String, TokenError> {
        if let Some(cached) = self.cached.read().await.as_ref()
            && !cached.is_expired()
        {
            return Ok(cached.token.expose_secret().to_string());
        }

        let mut guard = self.cached.write().await;
        // Another task may have refreshed while we waited for the write lock
        if let Some(cached) = guard.as_ref()
            && !cached.is_expired()
        {
            return Ok(cached.token.expose_secret().to_string());
        }

        let (token, expires_at) = self.fetch().await?;
        let access = token.clone();
        *guard = Some(CachedToken {
            token: SecretString::from(token),
            expires_at,
        });
        Ok(access)
    }

    /// Sign an assertion and exchange it for an access token.
    async fn fetch(&self) -> Result<(String, i64), TokenError> {
        let now = chrono::Utc::now().timestamp();

        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: OAUTH_SCOPES,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let encoding_key =
            EncodingKey::from_rsa_pem(self.key.private_key.expose_secret().as_bytes())?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Exchange(format!("HTTP {status}: {body}")));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = token.expires_in, "Obtained Google access token");
        Ok((token.access_token, now + token.expires_in))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_token_expiry_buffer() {
        let now = chrono::Utc::now().timestamp();

        let fresh = CachedToken {
            token: SecretString::from("t"),
            expires_at: now + 3600,
        };
        assert!(!fresh.is_expired());

        // 30 seconds left falls inside the 60 second buffer
        let almost = CachedToken {
            token: SecretString::from("t"),
            expires_at: now + 30,
        };
        assert!(almost.is_expired());

        let stale = CachedToken {
            token: SecretString::from("t"),
            expires_at: now - 3600,
        };
        assert!(stale.is_expired());
    }
}

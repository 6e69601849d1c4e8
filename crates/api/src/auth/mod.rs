//! Bearer-token verification against the identity provider.
//!
//! Tokens are RS256 JWTs issued by the provider; signatures are checked
//! against the provider's published JWKS (cached, rate-limited refresh),
//! then audience, issuer, and expiry are validated. The permission scope
//! used for admin routes lives in the `permissions` claim.

mod jwks;

pub use jwks::JwksCache;

use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use kicks_core::SubjectId;
use serde::Deserialize;
use thiserror::Error;

use crate::config::AuthConfig;

/// Errors from bearer-token verification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header on the request.
    #[error("Missing bearer token")]
    MissingToken,

    /// The authorization header is not a well-formed bearer credential.
    #[error("Malformed authorization header")]
    MalformedHeader,

    /// Signature, audience, issuer, or expiry validation failed.
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The token names a signing key the provider does not publish.
    #[error("No signing key matches the token")]
    UnknownKey,

    /// The token is signed with an algorithm other than the configured one.
    #[error("Unexpected signing algorithm")]
    AlgorithmMismatch,

    /// The JWKS endpoint could not be fetched.
    #[error("Failed to fetch signing keys: {0}")]
    JwksFetch(#[from] reqwest::Error),
}

/// Verified claims of an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Provider subject, e.g. `auth0|5e9f...`.
    pub sub: String,
    /// Granted permissions (the provider's role/permission claim).
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Claims {
    /// Document id for this user, derived from the subject claim.
    #[must_use]
    pub fn subject_id(&self) -> SubjectId {
        SubjectId::from_subject(&self.sub)
    }

    /// Whether the token grants the given permission.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Where signing keys come from.
enum KeySource {
    /// Fetched from the provider's JWKS endpoint, cached.
    Remote(JwksCache),
    /// Fixed key set, for tests.
    Static(JwkSet),
}

/// Verifies bearer tokens against the configured issuer.
pub struct TokenVerifier {
    keys: KeySource,
    algorithm: Algorithm,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier that fetches keys from the configured JWKS endpoint.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            keys: KeySource::Remote(JwksCache::new(&config.jwks_uri)),
            algorithm: config.algorithm,
            validation: build_validation(config),
        }
    }

    /// Create a verifier with a fixed key set (no network). Used by tests.
    #[must_use]
    pub fn with_static_keys(config: &AuthConfig, keys: JwkSet) -> Self {
        Self {
            keys: KeySource::Static(keys),
            algorithm: config.algorithm,
            validation: build_validation(config),
        }
    }

    /// Verify a bearer token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the header, signature, algorithm, audience,
    /// issuer, or expiry check fails, or if the signing keys are unavailable.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = jsonwebtoken::decode_header(token)?;
        if header.alg != self.algorithm {
            return Err(AuthError::AlgorithmMismatch);
        }

        let jwk = self
            .resolve_key(header.kid.as_deref())
            .await?
            .ok_or(AuthError::UnknownKey)?;
        let key = DecodingKey::from_jwk(&jwk)?;

        let data = jsonwebtoken::decode::<Claims>(token, &key, &self.validation)?;
        Ok(data.claims)
    }

    async fn resolve_key(&self, kid: Option<&str>) -> Result<Option<Jwk>, AuthError> {
        match &self.keys {
            KeySource::Remote(cache) => cache.get(kid).await,
            KeySource::Static(set) => Ok(jwks::find_key(set, kid)),
        }
    }
}

fn build_validation(config: &AuthConfig) -> Validation {
    let mut validation = Validation::new(config.algorithm);
    validation.set_audience(&[&config.audience]);
    validation.set_issuer(&[&config.issuer]);
    validation
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn claims(permissions: &[&str]) -> Claims {
        Claims {
            sub: "auth0|5e9f8a7b".to_string(),
            permissions: permissions.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_subject_id_strips_provider_prefix() {
        assert_eq!(claims(&[]).subject_id().as_str(), "5e9f8a7b");
    }

    #[test]
    fn test_has_permission() {
        let c = claims(&["access:admin", "read:products"]);
        assert!(c.has_permission("access:admin"));
        assert!(!c.has_permission("write:orders"));
    }

    #[test]
    fn test_permissions_claim_defaults_to_empty() {
        let c: Claims = serde_json::from_str(r#"{"sub": "auth0|abc"}"#).unwrap();
        assert!(c.permissions.is_empty());
    }
}

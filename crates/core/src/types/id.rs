//! Newtype IDs for type-safe entity references.
//!
//! Product ids are opaque random base-36 strings; user ids come from the
//! identity provider's subject claim.

use serde::{Deserialize, Serialize};

/// Number of base-36 characters in a generated product id.
const PRODUCT_ID_LEN: usize = 8;

/// Opaque identifier for a product document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an existing id string.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh random id (lowercase base-36).
    #[must_use]
    pub fn generate() -> Self {
        use rand::Rng;

        let mut rng = rand::rng();
        let id = (0..PRODUCT_ID_LEN)
            .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
            .collect();
        Self(id)
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier for a user document, derived from the identity provider's
/// subject claim.
///
/// Provider subjects look like `auth0|5e9f...` or `google-oauth2|1023...`;
/// only the last `|`-separated segment is used as the document key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Derive the document id from a raw `sub` claim.
    #[must_use]
    pub fn from_subject(sub: &str) -> Self {
        let id = sub.rsplit('|').next().unwrap_or(sub);
        Self(id.to_string())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

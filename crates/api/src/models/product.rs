//! Product document model.

use kicks_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product document in the `products` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub primary_name: String,
    #[serde(default)]
    pub secondary_name: String,
    #[serde(default)]
    pub variant: String,
    pub msrp: Price,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub colorway: String,
    #[serde(default)]
    pub description: String,
    /// Image URLs in upload order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// Document fields for a whole-document write.
    ///
    /// # Errors
    ///
    /// Returns the serialization error if the product cannot be represented
    /// as a JSON object (it always can).
    pub fn to_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

/// Partial product update: `id` plus any subset of the text fields.
///
/// Only the fields present in the request are merged into the document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub id: ProductId,
    pub primary_name: Option<String>,
    pub secondary_name: Option<String>,
    pub variant: Option<String>,
    pub msrp: Option<Price>,
    pub release_date: Option<String>,
    pub colorway: Option<String>,
    pub description: Option<String>,
}

impl ProductPatch {
    /// The top-level fields to merge, camelCase-keyed like the document.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();

        let mut put_str = |key: &str, value: Option<String>| {
            if let Some(v) = value {
                fields.insert(key.to_string(), Value::String(v));
            }
        };
        put_str("primaryName", self.primary_name);
        put_str("secondaryName", self.secondary_name);
        put_str("variant", self.variant);
        put_str("releaseDate", self.release_date);
        put_str("colorway", self.colorway);
        put_str("description", self.description);

        if let Some(msrp) = self.msrp
            && let Ok(v) = serde_json::to_value(msrp)
        {
            fields.insert("msrp".to_string(), v);
        }

        fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_uses_camel_case_keys() {
        let product = Product {
            id: ProductId::from("a1b2c3d4"),
            primary_name: "Air Jordan 1".to_string(),
            secondary_name: "Retro High".to_string(),
            variant: "OG".to_string(),
            msrp: serde_json::from_value(json!("170.00")).unwrap(),
            release_date: "1985-04-01".to_string(),
            colorway: "Bred".to_string(),
            description: "The original".to_string(),
            images: vec!["https://example.com/a1b2c3d4_image-0".to_string()],
        };

        let fields = product.to_fields().unwrap();
        assert!(fields.contains_key("primaryName"));
        assert!(fields.contains_key("releaseDate"));
        assert!(!fields.contains_key("primary_name"));
    }

    #[test]
    fn test_patch_keeps_only_present_fields() {
        let patch: ProductPatch = serde_json::from_value(json!({
            "id": "a1b2c3d4",
            "primaryName": "Dunk Low",
            "msrp": "110.00",
        }))
        .unwrap();

        let fields = patch.into_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("primaryName"), Some(&json!("Dunk Low")));
        assert_eq!(fields.get("msrp"), Some(&json!("110.00")));
        assert!(!fields.contains_key("variant"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let product: Product = serde_json::from_value(json!({
            "id": "a1b2c3d4",
            "primaryName": "Dunk Low",
            "msrp": "110.00",
        }))
        .unwrap();

        assert!(product.images.is_empty());
        assert_eq!(product.colorway, "");
    }
}

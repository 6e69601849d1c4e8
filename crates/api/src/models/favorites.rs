//! Per-user favorites document model.

use kicks_core::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user's favorites list in the `users` collection, keyed by subject id.
///
/// The list holds product ids, each at most once. There is no check that a
/// favorited product still exists in `products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FavoritesDoc {
    #[serde(default)]
    pub products: Vec<ProductId>,
}

impl FavoritesDoc {
    /// Add a product id unless already present. Returns whether it was added.
    pub fn add(&mut self, id: ProductId) -> bool {
        if self.products.contains(&id) {
            return false;
        }
        self.products.push(id);
        true
    }

    /// Remove a product id if present. Returns whether it was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p != id);
        self.products.len() != before
    }

    /// Document fields for a merge update of the list.
    #[must_use]
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            "products".to_string(),
            Value::Array(
                self.products
                    .iter()
                    .map(|id| Value::String(id.as_str().to_string()))
                    .collect(),
            ),
        );
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut favorites = FavoritesDoc::default();
        assert!(favorites.add(ProductId::from("abc")));
        assert!(!favorites.add(ProductId::from("abc")));
        assert_eq!(favorites.products.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut favorites = FavoritesDoc {
            products: vec![ProductId::from("abc")],
        };
        assert!(!favorites.remove(&ProductId::from("xyz")));
        assert_eq!(favorites.products.len(), 1);

        assert!(favorites.remove(&ProductId::from("abc")));
        assert!(favorites.products.is_empty());
    }
}

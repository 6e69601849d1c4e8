//! Domain models stored as documents.
//!
//! Documents keep the camelCase field names the frontend and the stored
//! data already use (`primaryName`, `releaseDate`, ...).

pub mod favorites;
pub mod product;

pub use favorites::FavoritesDoc;
pub use product::{Product, ProductPatch};

/// Collection holding one document per product, keyed by product id.
pub const PRODUCTS_COLLECTION: &str = "products";

/// Collection holding one favorites document per user, keyed by subject id.
pub const USERS_COLLECTION: &str = "users";

//! Core types for the Kicks API.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::{ProductId, SubjectId};
pub use price::Price;

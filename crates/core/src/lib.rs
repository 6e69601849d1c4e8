//! Kicks Core - Shared types library.
//!
//! This crate provides common types used across the Kicks API components:
//! - `api` - The JSON REST API server
//! - `integration-tests` - Contract tests against the route layer
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product ids, user subjects, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

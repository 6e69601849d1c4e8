//! Application services shared by route handlers.

pub mod images;

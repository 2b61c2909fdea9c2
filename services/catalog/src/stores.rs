//! Stores carrying the favorite and account operations
//!
//! Stores resolve identities, call the repositories and translate their
//! failures into [`crate::error::StoreError`].

pub mod accounts;
pub mod favorites;

pub use accounts::AccountStore;
pub use favorites::FavoriteStore;

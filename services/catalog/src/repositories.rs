//! Repositories for database operations
//!
//! Each repository is a trait with a PostgreSQL implementation. Every call
//! acquires its own connection from [`common::Database`] and releases it on
//! return.

pub mod favorite;
pub mod film;
pub mod user;

#[cfg(test)]
pub mod memory;

pub use favorite::{FavoriteRepository, PgFavoriteRepository};
pub use film::{FilmRepository, PgFilmRepository};
pub use user::{PgUserRepository, UserRepository};

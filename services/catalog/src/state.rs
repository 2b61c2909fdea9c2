//! Application state shared across handlers

use std::sync::Arc;

use common::Database;

use crate::{
    middleware::JwtVerifier,
    repositories::{PgFavoriteRepository, PgFilmRepository, PgUserRepository},
    stores::{AccountStore, FavoriteStore},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub jwt: JwtVerifier,
    pub favorites: FavoriteStore,
    pub accounts: AccountStore,
}

impl AppState {
    /// Wire the stores to the PostgreSQL repositories
    pub fn new(database: Database, jwt: JwtVerifier) -> Self {
        let favorites = FavoriteStore::new(
            Arc::new(PgFavoriteRepository::new(database.clone())),
            Arc::new(PgFilmRepository::new(database.clone())),
        );
        let accounts = AccountStore::new(Arc::new(PgUserRepository::new(database.clone())));

        Self {
            database,
            jwt,
            favorites,
            accounts,
        }
    }
}

//! Favorite Store
//!
//! Owns the favorite relationship between users and films. Uniqueness of a
//! (user, film) pair is enforced by the repository's unique index; a toggle
//! that loses a race against an identical insert is reported as `added`.
//!
//! Pairs are keyed by the film identifier as given. A film favorited once by
//! its legacy id and once by its native id holds two rows; toggling one of
//! them leaves the other in place.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use common::{DatabaseError, Identifier};
use tracing::{debug, info};

use crate::{
    error::StoreResult,
    middleware::AuthUser,
    models::{
        favorite::{Favorite, FavoritePage, ToggleOutcome},
        film::Film,
    },
    repositories::{FavoriteRepository, FilmRepository},
};

/// Films per page of the favorites listing
pub const FAVORITES_PER_PAGE: usize = 12;

#[derive(Clone)]
pub struct FavoriteStore {
    favorites: Arc<dyn FavoriteRepository>,
    films: Arc<dyn FilmRepository>,
}

impl FavoriteStore {
    pub fn new(favorites: Arc<dyn FavoriteRepository>, films: Arc<dyn FilmRepository>) -> Self {
        Self { favorites, films }
    }

    /// Whether the user has favorited the film.
    ///
    /// Anonymous users and identifiers that do not resolve get `false`.
    pub async fn is_favorite(&self, user: Option<&AuthUser>, film_id: &str) -> StoreResult<bool> {
        let Some(user) = user else {
            return Ok(false);
        };
        let (Ok(user_key), Ok(film_key)) =
            (Identifier::resolve(&user.id), Identifier::resolve(film_id))
        else {
            return Ok(false);
        };

        let exists = self
            .favorites
            .exists(&user_key.to_string(), &film_key.to_string())
            .await?;
        Ok(exists)
    }

    /// Remove the pair if it is stored, add it otherwise
    pub async fn toggle_favorite(&self, user: &AuthUser, film_id: &str) -> StoreResult<ToggleOutcome> {
        let user_key = Identifier::resolve(&user.id)?.to_string();
        let film_key = Identifier::resolve(film_id)?.to_string();

        if self.favorites.delete(&user_key, &film_key).await? {
            info!("User {} removed film {} from favorites", user_key, film_key);
            return Ok(ToggleOutcome::Removed);
        }

        let favorite = Favorite {
            user_id: user_key,
            film_id: film_key,
            added_at: Utc::now(),
        };

        match self.favorites.insert(&favorite).await {
            Ok(()) => {
                info!(
                    "User {} added film {} to favorites",
                    favorite.user_id, favorite.film_id
                );
                Ok(ToggleOutcome::Added)
            }
            Err(DatabaseError::UniqueViolation(constraint)) => {
                debug!(
                    "Film {} already favorited by {} ({}), keeping the existing row",
                    favorite.film_id, favorite.user_id, constraint
                );
                Ok(ToggleOutcome::Added)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The user's favorite films, newest first.
    ///
    /// Favorites whose film no longer exists are left out.
    pub async fn list_favorite_films(&self, user: &AuthUser) -> StoreResult<Vec<Film>> {
        let user_key = Identifier::resolve(&user.id)?.to_string();

        let film_ids = self.favorites.film_ids_for_user(&user_key).await?;
        let identifiers: Vec<Identifier> = film_ids
            .iter()
            .filter_map(|id| Identifier::resolve(id).ok())
            .collect();

        if identifiers.is_empty() {
            return Ok(Vec::new());
        }

        let found = self.films.find_by_identifiers(&identifiers).await?;
        let by_identifier: HashMap<Identifier, &Film> = found
            .iter()
            .flat_map(|film| film.identifiers().map(move |id| (id, film)))
            .collect();

        let mut seen = HashSet::new();
        let films: Vec<Film> = identifiers
            .iter()
            .filter_map(|id| by_identifier.get(id).copied())
            .filter(|film| seen.insert(film.id))
            .cloned()
            .collect();

        let orphaned = identifiers.len() - films.len();
        if orphaned > 0 {
            debug!("Skipped {} favorite(s) of {} without a film", orphaned, user_key);
        }

        Ok(films)
    }

    /// One page of the user's favorite films, pages start at 1
    pub async fn favorite_page(&self, user: &AuthUser, page: u32) -> StoreResult<FavoritePage> {
        let films = self.list_favorite_films(user).await?;

        let total = films.len();
        let total_pages = total.div_ceil(FAVORITES_PER_PAGE);
        let current_page = (page as usize).max(1);

        let films = films
            .into_iter()
            .skip((current_page - 1) * FAVORITES_PER_PAGE)
            .take(FAVORITES_PER_PAGE)
            .collect();

        Ok(FavoritePage {
            films,
            total,
            total_pages,
            current_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::repositories::memory::{MemoryFavoriteRepository, MemoryFilmRepository};
    use uuid::Uuid;

    struct Fixture {
        store: FavoriteStore,
        favorites: Arc<MemoryFavoriteRepository>,
        films: Arc<MemoryFilmRepository>,
    }

    fn fixture() -> Fixture {
        let favorites = Arc::new(MemoryFavoriteRepository::default());
        let films = Arc::new(MemoryFilmRepository::default());
        Fixture {
            store: FavoriteStore::new(favorites.clone(), films.clone()),
            favorites,
            films,
        }
    }

    fn user(id: &str) -> AuthUser {
        AuthUser {
            id: id.to_string(),
            username: None,
        }
    }

    fn film(legacy_id: i64, title: &str) -> Film {
        Film {
            id: Uuid::new_v4(),
            legacy_id: Some(legacy_id),
            title: title.to_string(),
            description: None,
            poster_url: None,
            release_year: Some(2001),
        }
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let f = fixture();
        let u = user("7");

        assert!(!f.store.is_favorite(Some(&u), "15").await.unwrap());

        let first = f.store.toggle_favorite(&u, "15").await.unwrap();
        assert_eq!(first, ToggleOutcome::Added);
        assert!(f.store.is_favorite(Some(&u), "15").await.unwrap());

        let second = f.store.toggle_favorite(&u, "15").await.unwrap();
        assert_eq!(second, ToggleOutcome::Removed);
        assert!(!f.store.is_favorite(Some(&u), "15").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_insert_is_swallowed() {
        let f = fixture();
        let u = user("7");
        f.favorites.race_next_insert();

        let outcome = f.store.toggle_favorite(&u, "15").await.unwrap();

        assert_eq!(outcome, ToggleOutcome::Added);
        assert_eq!(f.favorites.count("7", "15"), 1);
        assert!(f.store.is_favorite(Some(&u), "15").await.unwrap());
    }

    #[tokio::test]
    async fn test_identifiers_are_canonicalised() {
        let f = fixture();
        let film_id = Uuid::new_v4();
        let u = user("7");

        f.store
            .toggle_favorite(&u, &film_id.simple().to_string().to_uppercase())
            .await
            .unwrap();

        assert!(f.store.is_favorite(Some(&u), &film_id.to_string()).await.unwrap());
        assert_eq!(f.favorites.count("7", &film_id.to_string()), 1);
    }

    #[tokio::test]
    async fn test_anonymous_and_unresolvable_checks_are_false() {
        let f = fixture();
        assert!(!f.store.is_favorite(None, "15").await.unwrap());
        assert!(!f.store.is_favorite(Some(&user("nobody")), "15").await.unwrap());
        assert!(!f.store.is_favorite(Some(&user("7")), "not-a-film").await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_rejects_unresolvable_identity_before_storage() {
        let f = fixture();
        f.favorites.go_down();

        let err = f.store.toggle_favorite(&user("7"), "not-a-film").await.unwrap_err();
        assert!(matches!(err, StoreError::UnresolvableIdentity(_)));

        let err = f.store.toggle_favorite(&user(""), "15").await.unwrap_err();
        assert!(matches!(err, StoreError::UnresolvableIdentity(_)));
    }

    #[tokio::test]
    async fn test_unavailable_database_is_not_reported_as_missing() {
        let f = fixture();
        f.favorites.go_down();

        let err = f.store.toggle_favorite(&user("7"), "15").await.unwrap_err();
        assert!(matches!(err, StoreError::DatabaseUnavailable(_)));

        let err = f.store.is_favorite(Some(&user("7")), "15").await.unwrap_err();
        assert!(matches!(err, StoreError::DatabaseUnavailable(_)));
    }

    #[tokio::test]
    async fn test_listing_skips_orphaned_favorites() {
        let f = fixture();
        let u = user("7");
        let kept = film(1, "Spirited Away");
        let deleted = film(2, "Lost Film");
        f.films.add(kept.clone());
        f.films.add(deleted.clone());

        f.store.toggle_favorite(&u, "1").await.unwrap();
        f.store.toggle_favorite(&u, &deleted.id.to_string()).await.unwrap();
        f.store.toggle_favorite(&u, "999").await.unwrap();
        f.films.remove(deleted.id);

        let films = f.store.list_favorite_films(&u).await.unwrap();
        assert_eq!(films, vec![kept]);
    }

    #[tokio::test]
    async fn test_film_favorited_under_both_ids_is_listed_once() {
        let f = fixture();
        let u = user("7");
        let one = film(1, "Paprika");
        f.films.add(one.clone());

        f.store.toggle_favorite(&u, "1").await.unwrap();
        f.store.toggle_favorite(&u, &one.id.to_string()).await.unwrap();

        let films = f.store.list_favorite_films(&u).await.unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(films[0].id, one.id);
    }

    #[tokio::test]
    async fn test_pagination() {
        let f = fixture();
        let u = user("7");
        for i in 1..=14 {
            f.films.add(film(i, &format!("Film {i}")));
            f.store.toggle_favorite(&u, &i.to_string()).await.unwrap();
        }

        let first = f.store.favorite_page(&u, 1).await.unwrap();
        assert_eq!(first.total, 14);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.films.len(), FAVORITES_PER_PAGE);

        let second = f.store.favorite_page(&u, 2).await.unwrap();
        assert_eq!(second.current_page, 2);
        assert_eq!(second.films.len(), 2);

        let clamped = f.store.favorite_page(&u, 0).await.unwrap();
        assert_eq!(clamped.current_page, 1);

        let beyond = f.store.favorite_page(&u, 9).await.unwrap();
        assert!(beyond.films.is_empty());
    }
}

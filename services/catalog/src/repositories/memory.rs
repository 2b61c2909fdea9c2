//! In-memory repositories used by the tests
//!
//! They keep the same contracts as the PostgreSQL ones, uniqueness of the
//! favorite pair included, and can simulate a concurrent writer or an
//! unreachable database.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{DatabaseError, DatabaseResult, Identifier};
use uuid::Uuid;

use super::{FavoriteRepository, FilmRepository, UserRepository};
use crate::models::{favorite::Favorite, film::Film, user::User};

fn unavailable() -> DatabaseError {
    DatabaseError::Unavailable {
        attempts: 3,
        source: sqlx::Error::PoolTimedOut,
    }
}

#[derive(Default)]
pub struct MemoryFavoriteRepository {
    rows: Mutex<Vec<Favorite>>,
    race_next_insert: AtomicBool,
    down: AtomicBool,
}

impl MemoryFavoriteRepository {
    /// The next insert loses a race against an identical insert from another request
    pub fn race_next_insert(&self) {
        self.race_next_insert.store(true, Ordering::SeqCst);
    }

    /// Every following call fails as if no connection could be acquired
    pub fn go_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }

    pub fn count(&self, user_id: &str, film_id: &str) -> usize {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .filter(|f| f.user_id == user_id && f.film_id == film_id)
            .count()
    }

    fn check_up(&self) -> DatabaseResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

#[async_trait]
impl FavoriteRepository for MemoryFavoriteRepository {
    async fn exists(&self, user_id: &str, film_id: &str) -> DatabaseResult<bool> {
        self.check_up()?;
        Ok(self.count(user_id, film_id) > 0)
    }

    async fn insert(&self, favorite: &Favorite) -> DatabaseResult<()> {
        self.check_up()?;
        let mut rows = self.rows.lock().unwrap();

        if self.race_next_insert.swap(false, Ordering::SeqCst) {
            rows.push(Favorite {
                added_at: Utc::now(),
                ..favorite.clone()
            });
        }

        if rows
            .iter()
            .any(|f| f.user_id == favorite.user_id && f.film_id == favorite.film_id)
        {
            return Err(DatabaseError::UniqueViolation(
                "favorites_user_film_key".to_string(),
            ));
        }

        rows.push(favorite.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str, film_id: &str) -> DatabaseResult<bool> {
        self.check_up()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|f| !(f.user_id == user_id && f.film_id == film_id));
        Ok(rows.len() < before)
    }

    async fn film_ids_for_user(&self, user_id: &str) -> DatabaseResult<Vec<String>> {
        self.check_up()?;
        let rows = self.rows.lock().unwrap();
        let mut mine: Vec<&Favorite> = rows.iter().filter(|f| f.user_id == user_id).collect();
        mine.sort_by(|a, b| b.added_at.cmp(&a.added_at).then(a.film_id.cmp(&b.film_id)));
        Ok(mine.into_iter().map(|f| f.film_id.clone()).collect())
    }
}

#[derive(Default)]
pub struct MemoryFilmRepository {
    films: Mutex<Vec<Film>>,
}

impl MemoryFilmRepository {
    pub fn add(&self, film: Film) {
        self.films.lock().unwrap().push(film);
    }

    pub fn remove(&self, id: Uuid) {
        self.films.lock().unwrap().retain(|film| film.id != id);
    }
}

#[async_trait]
impl FilmRepository for MemoryFilmRepository {
    async fn find_by_identifiers(&self, identifiers: &[Identifier]) -> DatabaseResult<Vec<Film>> {
        let films = self.films.lock().unwrap();
        Ok(films
            .iter()
            .filter(|film| film.identifiers().any(|id| identifiers.contains(&id)))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
    down: AtomicBool,
}

impl MemoryUserRepository {
    pub fn add(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn go_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }

    fn check_up(&self) -> DatabaseResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }
}

fn matches(user: &User, id: &Identifier) -> bool {
    match id {
        Identifier::Native(id) => user.id == *id,
        Identifier::Legacy(id) => user.legacy_id == Some(*id),
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find(&self, id: &Identifier) -> DatabaseResult<Option<User>> {
        self.check_up()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| matches(u, id)).cloned())
    }

    async fn update_profile(
        &self,
        id: &Identifier,
        full_name: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<bool> {
        self.check_up()?;
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| matches(u, id)) else {
            return Ok(false);
        };
        if let Some(name) = full_name {
            user.full_name = Some(name.to_string());
        }
        user.updated_at = Some(updated_at);
        Ok(true)
    }

    async fn update_password(
        &self,
        id: Uuid,
        password: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<bool> {
        self.check_up()?;
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.password = password.to_string();
        user.updated_at = Some(updated_at);
        Ok(true)
    }
}

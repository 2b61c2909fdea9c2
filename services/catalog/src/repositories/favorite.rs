//! Favorite repository for database operations

use async_trait::async_trait;
use common::{Database, DatabaseError, DatabaseResult};

use crate::models::favorite::Favorite;

/// Storage of the user/film favorite relationship
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Whether the pair is stored
    async fn exists(&self, user_id: &str, film_id: &str) -> DatabaseResult<bool>;

    /// Insert a new pair.
    ///
    /// A pair that is already stored fails with [`DatabaseError::UniqueViolation`].
    async fn insert(&self, favorite: &Favorite) -> DatabaseResult<()>;

    /// Delete the pair, returning whether a row was removed
    async fn delete(&self, user_id: &str, film_id: &str) -> DatabaseResult<bool>;

    /// Film ids favorited by the user, newest first
    async fn film_ids_for_user(&self, user_id: &str) -> DatabaseResult<Vec<String>>;
}

/// PostgreSQL-backed favorite repository
#[derive(Clone)]
pub struct PgFavoriteRepository {
    database: Database,
}

impl PgFavoriteRepository {
    /// Create a new favorite repository
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    async fn exists(&self, user_id: &str, film_id: &str) -> DatabaseResult<bool> {
        let mut conn = self.database.acquire().await?;

        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM favorites WHERE user_id = $1 AND film_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(film_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(exists)
    }

    async fn insert(&self, favorite: &Favorite) -> DatabaseResult<()> {
        let mut conn = self.database.acquire().await?;

        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, film_id, added_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&favorite.user_id)
        .bind(&favorite.film_id)
        .bind(favorite.added_at)
        .execute(&mut *conn)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(())
    }

    async fn delete(&self, user_id: &str, film_id: &str) -> DatabaseResult<bool> {
        let mut conn = self.database.acquire().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM favorites
            WHERE user_id = $1 AND film_id = $2
            "#,
        )
        .bind(user_id)
        .bind(film_id)
        .execute(&mut *conn)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn film_ids_for_user(&self, user_id: &str) -> DatabaseResult<Vec<String>> {
        let mut conn = self.database.acquire().await?;

        let film_ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT film_id
            FROM favorites
            WHERE user_id = $1
            ORDER BY added_at DESC, film_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(film_ids)
    }
}

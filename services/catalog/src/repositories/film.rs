//! Film repository for database operations

use async_trait::async_trait;
use common::{Database, DatabaseError, DatabaseResult, Identifier};
use uuid::Uuid;

use crate::models::film::Film;

/// Read access to films
#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// Films matching any of the identifiers. Unknown identifiers are skipped.
    async fn find_by_identifiers(&self, identifiers: &[Identifier]) -> DatabaseResult<Vec<Film>>;
}

/// PostgreSQL-backed film repository
#[derive(Clone)]
pub struct PgFilmRepository {
    database: Database,
}

impl PgFilmRepository {
    /// Create a new film repository
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl FilmRepository for PgFilmRepository {
    async fn find_by_identifiers(&self, identifiers: &[Identifier]) -> DatabaseResult<Vec<Film>> {
        if identifiers.is_empty() {
            return Ok(Vec::new());
        }

        let native: Vec<Uuid> = identifiers.iter().filter_map(Identifier::as_native).collect();
        let legacy: Vec<i64> = identifiers.iter().filter_map(Identifier::as_legacy).collect();

        let mut conn = self.database.acquire().await?;

        let films = sqlx::query_as::<_, Film>(
            r#"
            SELECT id, legacy_id, title, description, poster_url, release_year
            FROM films
            WHERE id = ANY($1) OR legacy_id = ANY($2)
            "#,
        )
        .bind(native)
        .bind(legacy)
        .fetch_all(&mut *conn)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(films)
    }
}

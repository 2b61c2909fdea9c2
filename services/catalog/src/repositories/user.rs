//! User repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Database, DatabaseError, DatabaseResult, Identifier};
use sqlx::{Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::models::user::User;

const USER_COLUMNS: &str = "SELECT id, legacy_id, username, password, full_name, role, \
     register_date, register_date_raw, updated_at FROM users WHERE ";

/// Storage of user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by native or legacy id
    async fn find(&self, id: &Identifier) -> DatabaseResult<Option<User>>;

    /// Stamp `updated_at` and, when given, replace the full name.
    ///
    /// Returns whether a user matched.
    async fn update_profile(
        &self,
        id: &Identifier,
        full_name: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<bool>;

    /// Replace the stored password. Returns whether a user matched.
    async fn update_password(
        &self,
        id: Uuid,
        password: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<bool>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    database: Database,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find(&self, id: &Identifier) -> DatabaseResult<Option<User>> {
        info!("Finding user by {}: {}", id.column(), id);

        let mut builder = QueryBuilder::<Postgres>::new(USER_COLUMNS);
        id.push_filter(&mut builder);

        let mut conn = self.database.acquire().await?;
        let user = builder
            .build_query_as::<User>()
            .fetch_optional(&mut *conn)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        id: &Identifier,
        full_name: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<bool> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = ");
        builder
            .push_bind(updated_at)
            .push(", full_name = COALESCE(")
            .push_bind(full_name.map(str::to_string))
            .push(", full_name) WHERE ");
        id.push_filter(&mut builder);

        let mut conn = self.database.acquire().await?;
        let result = builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_password(
        &self,
        id: Uuid,
        password: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<bool> {
        let mut conn = self.database.acquire().await?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET password = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(password)
        .bind(updated_at)
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}

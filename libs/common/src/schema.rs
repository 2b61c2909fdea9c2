//! Schema initialisation and the legacy-id backfill
//!
//! Both run once at service startup. Every statement is idempotent so a
//! restart against an initialised database is a no-op.

use tracing::info;

use crate::database::Database;
use crate::error::{DatabaseError, DatabaseResult};

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        legacy_id BIGINT,
        username TEXT NOT NULL,
        password TEXT NOT NULL,
        full_name TEXT,
        role TEXT,
        register_date TIMESTAMPTZ,
        register_date_raw TEXT,
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS films (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        legacy_id BIGINT,
        title TEXT NOT NULL,
        description TEXT,
        poster_url TEXT,
        release_year INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS favorites (
        user_id TEXT NOT NULL,
        film_id TEXT NOT NULL,
        added_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

const INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS users_username_key ON users (username)",
    "CREATE UNIQUE INDEX IF NOT EXISTS users_legacy_id_key ON users (legacy_id)",
    "CREATE UNIQUE INDEX IF NOT EXISTS films_legacy_id_key ON films (legacy_id)",
    "CREATE INDEX IF NOT EXISTS films_title_idx ON films (title)",
    "CREATE UNIQUE INDEX IF NOT EXISTS favorites_user_film_key ON favorites (user_id, film_id)",
    "CREATE INDEX IF NOT EXISTS favorites_user_added_idx ON favorites (user_id, added_at DESC)",
    "CREATE INDEX IF NOT EXISTS favorites_film_idx ON favorites (film_id)",
];

/// Numbers users without a legacy id, continuing after the current maximum.
/// Older registrations get the lower numbers.
const BACKFILL_LEGACY_IDS: &str = r#"
    WITH base AS (
        SELECT COALESCE(MAX(legacy_id), 0) AS max_id FROM users
    ),
    numbered AS (
        SELECT id, ROW_NUMBER() OVER (ORDER BY register_date NULLS LAST, username) AS rn
        FROM users
        WHERE legacy_id IS NULL
    )
    UPDATE users
    SET legacy_id = base.max_id + numbered.rn
    FROM numbered, base
    WHERE users.id = numbered.id
"#;

/// Create tables, then assign legacy ids, then create indexes
pub async fn initialize(database: &Database) -> DatabaseResult<()> {
    ensure_tables(database).await?;
    let assigned = backfill_legacy_ids(database).await?;
    if assigned == 0 {
        info!("No users without a legacy id");
    } else {
        info!("Assigned sequential legacy ids to {} user(s)", assigned);
    }
    ensure_indexes(database).await?;
    Ok(())
}

/// Create the tables if they are missing
pub async fn ensure_tables(database: &Database) -> DatabaseResult<()> {
    run_all(database, TABLES).await?;
    info!("Database tables ready");
    Ok(())
}

/// Create the indexes if they are missing, the uniqueness ones included
pub async fn ensure_indexes(database: &Database) -> DatabaseResult<()> {
    run_all(database, INDEXES).await?;
    info!("Database indexes ready");
    Ok(())
}

/// Assign sequential legacy ids to users lacking one.
///
/// Returns the number of users updated.
pub async fn backfill_legacy_ids(database: &Database) -> DatabaseResult<u64> {
    let mut conn = database.acquire().await?;
    let result = sqlx::query(BACKFILL_LEGACY_IDS)
        .execute(&mut *conn)
        .await
        .map_err(|e| DatabaseError::Migration(format!("legacy id backfill failed: {}", e)))?;
    Ok(result.rows_affected())
}

async fn run_all(database: &Database, statements: &[&str]) -> DatabaseResult<()> {
    let mut conn = database.acquire().await?;
    for statement in statements {
        sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    }
    Ok(())
}

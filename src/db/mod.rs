//! PostgreSQL access: pool construction, schema bootstrap, and the
//! loader/report submodules.
//!
//! The pool is constructed once at startup and passed explicitly to
//! everything that needs it; there is no process-global connection
//! state.

pub mod loader;
pub mod report;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// DDL for the one table this tool writes.
const CREATE_USERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        age INTEGER NOT NULL CHECK (age >= 0),
        address JSONB,
        additional_info JSONB
    )
";

/// Build a connection pool for the given database URL.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Verify connectivity with a trivial round trip.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Create the `users` table if it does not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS_TABLE).execute(pool).await?;
    Ok(())
}

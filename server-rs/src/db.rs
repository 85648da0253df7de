use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DbConfig;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS organization (
        id BLOB PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        email TEXT NULL,
        license TEXT NULL,
        active BOOLEAN NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )"#,
    "CREATE UNIQUE INDEX IF NOT EXISTS organization_name_unique ON organization (name)",
    "CREATE INDEX IF NOT EXISTS organization_active_idx ON organization (active)",
];

pub async fn create_pool(config: &DbConfig) -> Result<SqlitePool, sqlx::Error> {
    ensure_parent_dir(&config.url)?;

    let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
    tracing::info!(max_connections = config.pool_max, "Connecting to SQLite");

    SqlitePoolOptions::new()
        .max_connections(config.pool_max)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
}

/// Creates the organization table and its indexes if they are missing.
/// Existing data is left alone.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!("Database schema up to date");
    Ok(())
}

pub async fn ping(pool: &SqlitePool) -> bool {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .is_ok()
}

fn database_file(url: &str) -> Option<&str> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        None
    } else {
        Some(path)
    }
}

// SQLite creates the file but not its directory.
fn ensure_parent_dir(url: &str) -> Result<(), sqlx::Error> {
    let Some(parent) = database_file(url).and_then(|file| Path::new(file).parent()) else {
        return Ok(());
    };
    if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // One connection that never expires: every new in-memory connection is a fresh database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    ensure_schema(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_file_strips_scheme_and_query() {
        assert_eq!(
            database_file("sqlite://data/database.sqlite?mode=rwc"),
            Some("data/database.sqlite")
        );
        assert_eq!(database_file("sqlite:orgs.db"), Some("orgs.db"));
        assert_eq!(database_file("sqlite::memory:"), None);
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let pool = memory_pool().await;
        ensure_schema(&pool).await.unwrap();
        assert!(ping(&pool).await);
    }

    #[tokio::test]
    async fn ping_fails_on_closed_pool() {
        let pool = memory_pool().await;
        pool.close().await;
        assert!(!ping(&pool).await);
    }
}

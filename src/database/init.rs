//! Connection pool bootstrap for the embedded SQLite store.
//! Every pool handed out from here has the schema migrations fully applied.

use super::StoreError;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

/// A type alias for the database connection pool (`Pool<Sqlite>`).
/// Used throughout the application as the single handle to durable storage.
pub type DbPool = Pool<Sqlite>;

/// Storage location used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://homework.db";

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Reads `DATABASE_URL`, falling back to a `homework.db` file in the working directory.
pub fn database_url_from_env() -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Opens (creating if missing) the SQLite database at `url` and runs migrations.
pub async fn connect(url: &str) -> Result<DbPool, StoreError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = match SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            error!(target = "db", url = %url, error = %e, "failed to open database");
            return Err(e.into());
        }
    };
    migrate(&pool).await?;
    info!(target = "db", url = %url, "database ready");
    Ok(pool)
}

/// Opens a private in-memory database. The pool is pinned to a single connection
/// that never expires, otherwise each new connection would see an empty database.
pub async fn connect_in_memory() -> Result<DbPool, StoreError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &DbPool) -> Result<(), StoreError> {
    if let Err(e) = MIGRATOR.run(pool).await {
        error!(target = "db", error = %e, "schema migration failed");
        return Err(e.into());
    }
    Ok(())
}

mod migrations;
mod models;
mod queries;

pub use models::*;
pub use queries::*;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

const MAX_CONNECTIONS: u32 = 5;

/// Handle to the forum's SQLite store.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) the database at `path` and bring its
    /// schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails, a migration fails, or the
    /// file is not writable.
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Writes are serialized even under WAL; without a busy timeout a
            // second writer gets an immediate SQLITE_BUSY.
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;

        let db = Self { pool };
        migrations::run(&db.pool).await?;
        info!("Database migrations complete");
        db.verify_writable(path).await?;

        Ok(db)
    }

    /// Starting a transaction requires write capability on SQLite, so an
    /// empty one surfaces read-only mounts at startup instead of during the
    /// first insert.
    async fn verify_writable(&self, path: &Path) -> Result<()> {
        let tx = self.pool.begin().await.with_context(|| {
            format!(
                "SQLite database is not writable (path: {})",
                path.display()
            )
        })?;

        tx.commit()
            .await
            .context("Failed to commit SQLite writability check")?;
        Ok(())
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

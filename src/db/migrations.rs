use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::debug;

/// Run all pending migrations.
pub async fn run(pool: &SqlitePool) -> Result<()> {
    create_version_table(pool).await?;
    let current_version = schema_version(pool).await?;

    if current_version < 1 {
        debug!("Running migration v1");
        migrate_v1_forum_schema(pool).await?;
        set_schema_version(pool, 1).await?;
    }

    if current_version < 2 {
        debug!("Running migration v2");
        migrate_v2_articles_shared_at(pool).await?;
        set_schema_version(pool, 2).await?;
    }

    Ok(())
}

async fn create_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS _schema_version (
            version INTEGER PRIMARY KEY
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create schema version table")?;

    Ok(())
}

async fn schema_version(pool: &SqlitePool) -> Result<i32> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT version FROM _schema_version LIMIT 1")
        .fetch_optional(pool)
        .await
        .context("Failed to get schema version")?;

    Ok(row.map_or(0, |(v,)| v))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("DELETE FROM _schema_version")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO _schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

async fn migrate_v1_forum_schema(pool: &SqlitePool) -> Result<()> {
    debug!("Running migration v1: creating forum schema");

    // Threads table. solution_reply_id stays nullable and unconstrained:
    // replies attach polymorphically, so there is no single table a foreign
    // key could point at the other way around.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS threads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject TEXT NOT NULL,
            body TEXT NOT NULL,
            ip TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL,
            solution_reply_id INTEGER,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create threads table")?;

    // Replies table, keyed to an owner by (replyable_type, replyable_id).
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS replies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            body TEXT NOT NULL,
            replyable_type TEXT NOT NULL,
            replyable_id INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create replies table")?;

    // Tags and the polymorphic join table.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create tags table")?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS taggables (
            tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            taggable_type TEXT NOT NULL,
            taggable_id INTEGER NOT NULL,
            UNIQUE (tag_id, taggable_type, taggable_id)
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create taggables table")?;

    // Articles table. Carried for the share/approval timestamps; the forum
    // core never joins against it.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            approved_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create articles table")?;

    // Indexes for the polymorphic lookups the forum queries lean on.
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_replies_replyable ON replies(replyable_type, replyable_id)")
        .execute(pool)
        .await
        .context("Failed to create replies index")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_taggables_taggable ON taggables(taggable_type, taggable_id)")
        .execute(pool)
        .await
        .context("Failed to create taggables index")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_taggables_tag_id ON taggables(tag_id)")
        .execute(pool)
        .await
        .context("Failed to create taggables tag index")?;

    Ok(())
}

async fn migrate_v2_articles_shared_at(pool: &SqlitePool) -> Result<()> {
    debug!("Running migration v2: adding articles.shared_at");

    // SQLite appends new columns; the original schema placed shared_at after
    // approved_at, which carries no semantic weight.
    sqlx::query("ALTER TABLE articles ADD COLUMN shared_at TEXT")
        .execute(pool)
        .await
        .context("Failed to add shared_at column to articles")?;

    Ok(())
}

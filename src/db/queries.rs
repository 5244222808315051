use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::models::{Article, NewReply, NewThread, Reply, Repliable, Tag, Taggable, Thread};

// ========== Threads ==========

/// Insert a new thread, returning its ID.
pub async fn insert_thread(pool: &SqlitePool, thread: &NewThread) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO threads (subject, body, ip, slug)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(&thread.subject)
    .bind(&thread.body)
    .bind(&thread.ip)
    .bind(&thread.slug)
    .execute(pool)
    .await
    .context("Failed to insert thread")?;

    Ok(result.last_insert_rowid())
}

/// Get a thread by its ID.
pub async fn get_thread(pool: &SqlitePool, id: i64) -> Result<Option<Thread>> {
    sqlx::query_as("SELECT * FROM threads WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch thread")
}

/// Get a thread by its URL slug.
pub async fn get_thread_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Thread>> {
    sqlx::query_as("SELECT * FROM threads WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch thread by slug")
}

/// Update a thread's subject and body, touching `updated_at`.
pub async fn update_thread(pool: &SqlitePool, id: i64, subject: &str, body: &str) -> Result<()> {
    sqlx::query(
        r"
        UPDATE threads
        SET subject = ?, body = ?, updated_at = datetime('now')
        WHERE id = ?
        ",
    )
    .bind(subject)
    .bind(body)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update thread")?;

    Ok(())
}

// ========== Replies ==========

/// Insert a new reply, returning its ID.
pub async fn insert_reply(pool: &SqlitePool, reply: &NewReply) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO replies (body, replyable_type, replyable_id)
        VALUES (?, ?, ?)
        ",
    )
    .bind(&reply.body)
    .bind(reply.replyable.type_str())
    .bind(reply.replyable.id())
    .execute(pool)
    .await
    .context("Failed to insert reply")?;

    Ok(result.last_insert_rowid())
}

/// Get a reply by its ID.
pub async fn get_reply(pool: &SqlitePool, id: i64) -> Result<Option<Reply>> {
    sqlx::query_as("SELECT * FROM replies WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch reply")
}

/// All replies owned by a thread, oldest first.
pub async fn replies_for_thread(pool: &SqlitePool, thread_id: i64) -> Result<Vec<Reply>> {
    let owner = Repliable::Thread(thread_id);
    sqlx::query_as(
        r"
        SELECT * FROM replies
        WHERE replyable_type = ? AND replyable_id = ?
        ORDER BY created_at ASC, id ASC
        ",
    )
    .bind(owner.type_str())
    .bind(owner.id())
    .fetch_all(pool)
    .await
    .context("Failed to fetch replies for thread")
}

// ========== Tags ==========

/// Get or create a tag by name, returning its ID.
pub async fn insert_tag(pool: &SqlitePool, name: &str) -> Result<i64> {
    sqlx::query("INSERT INTO tags (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await
        .context("Failed to insert tag")?;

    let (id,): (i64,) = sqlx::query_as("SELECT id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_one(pool)
        .await
        .context("Failed to fetch tag id")?;

    Ok(id)
}

/// Get a tag by name.
pub async fn get_tag_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Tag>> {
    sqlx::query_as("SELECT * FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch tag by name")
}

/// Attach a tag to an owner. Attaching an already-attached tag is a no-op.
pub async fn attach_tag(pool: &SqlitePool, tag_id: i64, owner: Taggable) -> Result<()> {
    sqlx::query(
        r"
        INSERT INTO taggables (tag_id, taggable_type, taggable_id)
        VALUES (?, ?, ?)
        ON CONFLICT DO NOTHING
        ",
    )
    .bind(tag_id)
    .bind(owner.type_str())
    .bind(owner.id())
    .execute(pool)
    .await
    .context("Failed to attach tag")?;

    Ok(())
}

/// Detach a tag from an owner. Detaching a tag that was never attached is a
/// no-op.
pub async fn detach_tag(pool: &SqlitePool, tag_id: i64, owner: Taggable) -> Result<()> {
    sqlx::query(
        r"
        DELETE FROM taggables
        WHERE tag_id = ? AND taggable_type = ? AND taggable_id = ?
        ",
    )
    .bind(tag_id)
    .bind(owner.type_str())
    .bind(owner.id())
    .execute(pool)
    .await
    .context("Failed to detach tag")?;

    Ok(())
}

/// All tags attached to a thread, by name.
pub async fn tags_for_thread(pool: &SqlitePool, thread_id: i64) -> Result<Vec<Tag>> {
    let owner = Taggable::Thread(thread_id);
    sqlx::query_as(
        r"
        SELECT tags.* FROM tags
        JOIN taggables ON taggables.tag_id = tags.id
        WHERE taggables.taggable_type = ? AND taggables.taggable_id = ?
        ORDER BY tags.name ASC
        ",
    )
    .bind(owner.type_str())
    .bind(owner.id())
    .fetch_all(pool)
    .await
    .context("Failed to fetch tags for thread")
}

// ========== Articles ==========

/// Insert a new article, returning its ID.
pub async fn insert_article(pool: &SqlitePool, title: &str, body: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO articles (title, body) VALUES (?, ?)")
        .bind(title)
        .bind(body)
        .execute(pool)
        .await
        .context("Failed to insert article")?;

    Ok(result.last_insert_rowid())
}

/// Get an article by its ID.
pub async fn get_article(pool: &SqlitePool, id: i64) -> Result<Option<Article>> {
    sqlx::query_as("SELECT * FROM articles WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch article")
}

/// Record that an article has been shared, stamping `shared_at`.
pub async fn mark_article_shared(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query(
        r"
        UPDATE articles
        SET shared_at = datetime('now'), updated_at = datetime('now')
        WHERE id = ?
        ",
    )
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to mark article shared")?;

    Ok(())
}

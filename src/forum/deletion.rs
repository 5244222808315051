use sqlx::SqlitePool;
use tracing::debug;

use crate::db::{Repliable, Taggable};
use crate::error::Result;

/// Delete a thread together with its replies and tag links.
///
/// Dependents go first (tag links, then replies, then the thread row), and
/// the whole sequence runs in one transaction: a failure partway leaves the
/// thread fully intact instead of half-detached. Deleting an id with no
/// thread row is a no-op.
///
/// # Errors
///
/// Returns an error if any delete or the commit fails.
pub async fn delete_thread(pool: &SqlitePool, thread_id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let tag_owner = Taggable::Thread(thread_id);
    sqlx::query("DELETE FROM taggables WHERE taggable_type = ? AND taggable_id = ?")
        .bind(tag_owner.type_str())
        .bind(tag_owner.id())
        .execute(&mut *tx)
        .await?;

    let reply_owner = Repliable::Thread(thread_id);
    sqlx::query("DELETE FROM replies WHERE replyable_type = ? AND replyable_id = ?")
        .bind(reply_owner.type_str())
        .bind(reply_owner.id())
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM threads WHERE id = ?")
        .bind(thread_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    debug!(thread_id, "Deleted thread with its replies and tag links");
    Ok(())
}

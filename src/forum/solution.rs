use sqlx::SqlitePool;
use tracing::debug;

use crate::db::{Repliable, Reply, Thread};
use crate::error::{ForumError, Result, SolutionRejection};

/// Mark `reply` as the accepted solution of `thread` and persist the thread
/// row. Marking a new reply on an already-solved thread overwrites the
/// previous solution.
///
/// # Errors
///
/// Returns [`ForumError::CouldNotMarkReplyAsSolution`] when the reply is not
/// owned by this thread; the stored solution reference is left untouched.
pub async fn mark_solution(pool: &SqlitePool, thread: &mut Thread, reply: &Reply) -> Result<()> {
    match reply.replyable() {
        Some(Repliable::Thread(owner_id)) if owner_id == thread.id => {}
        Some(Repliable::Thread(_)) => {
            return Err(ForumError::CouldNotMarkReplyAsSolution {
                reply_id: reply.id,
                reason: SolutionRejection::ReplyBelongsToAnotherThread,
            });
        }
        _ => {
            return Err(ForumError::CouldNotMarkReplyAsSolution {
                reply_id: reply.id,
                reason: SolutionRejection::ReplyableIsNotAThread,
            });
        }
    }

    sqlx::query(
        r"
        UPDATE threads
        SET solution_reply_id = ?, updated_at = datetime('now')
        WHERE id = ?
        ",
    )
    .bind(reply.id)
    .bind(thread.id)
    .execute(pool)
    .await?;

    thread.solution_reply_id = Some(reply.id);
    debug!(thread_id = thread.id, reply_id = reply.id, "Marked solution reply");
    Ok(())
}

/// Clear the thread's solution reference and persist. Calling this on an
/// unsolved thread is a no-op.
///
/// # Errors
///
/// Returns an error if the update fails.
pub async fn unmark_solution(pool: &SqlitePool, thread: &mut Thread) -> Result<()> {
    if thread.solution_reply_id.is_none() {
        return Ok(());
    }

    sqlx::query(
        r"
        UPDATE threads
        SET solution_reply_id = NULL, updated_at = datetime('now')
        WHERE id = ?
        ",
    )
    .bind(thread.id)
    .execute(pool)
    .await?;

    thread.solution_reply_id = None;
    debug!(thread_id = thread.id, "Unmarked solution reply");
    Ok(())
}

/// Whether `reply` is the thread's current solution. False whenever no
/// solution is set.
#[must_use]
pub fn is_solution_reply(thread: &Thread, reply: &Reply) -> bool {
    thread.solution_reply_id == Some(reply.id)
}

/// Fetch the reply currently marked as the thread's solution, if any.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub async fn solution_reply(pool: &SqlitePool, thread: &Thread) -> Result<Option<Reply>> {
    let Some(reply_id) = thread.solution_reply_id else {
        return Ok(None);
    };

    let reply = sqlx::query_as("SELECT * FROM replies WHERE id = ?")
        .bind(reply_id)
        .fetch_optional(pool)
        .await?;

    Ok(reply)
}

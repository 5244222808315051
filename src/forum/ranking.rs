use sqlx::SqlitePool;

use crate::db::{Repliable, ThreadWithActivity};
use crate::error::{ForumError, Result};

/// Default number of threads per forum page.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    fn limit(self) -> i64 {
        i64::from(self.per_page.max(1))
    }

    fn offset(self) -> i64 {
        i64::from(self.page.max(1) - 1) * self.limit()
    }
}

/// One page of results plus the total row count across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    fn new(items: Vec<T>, total: i64, req: PageRequest) -> Self {
        Self {
            items,
            total,
            page: req.page.max(1),
            per_page: req.per_page.max(1),
        }
    }
}

// Latest activity is the later of the thread's own creation time and its
// newest reply. The outer join keeps reply-less threads in the result, ranked
// by their creation time; ties break on thread id, newest first. Timestamps
// are ISO-8601 text, so string comparison is chronological.
const FORUM_PAGE_SQL: &str = r"
    SELECT
        threads.*,
        CASE
            WHEN COALESCE(MAX(replies.created_at), threads.created_at) > threads.created_at
            THEN MAX(replies.created_at)
            ELSE threads.created_at
        END AS latest_activity
    FROM threads
    LEFT JOIN replies
        ON replies.replyable_type = ? AND replies.replyable_id = threads.id
    GROUP BY threads.id
    ORDER BY latest_activity DESC, threads.id DESC
    LIMIT ? OFFSET ?
";

const FORUM_PAGE_BY_TAG_SQL: &str = r"
    SELECT
        threads.*,
        CASE
            WHEN COALESCE(MAX(replies.created_at), threads.created_at) > threads.created_at
            THEN MAX(replies.created_at)
            ELSE threads.created_at
        END AS latest_activity
    FROM threads
    JOIN taggables
        ON taggables.taggable_type = ? AND taggables.taggable_id = threads.id
        AND taggables.tag_id = ?
    LEFT JOIN replies
        ON replies.replyable_type = ? AND replies.replyable_id = threads.id
    GROUP BY threads.id
    ORDER BY latest_activity DESC, threads.id DESC
    LIMIT ? OFFSET ?
";

/// One page of all threads, ordered by descending latest activity.
///
/// # Errors
///
/// Returns an error if the underlying queries fail.
pub async fn find_for_forum(
    pool: &SqlitePool,
    req: PageRequest,
) -> Result<Page<ThreadWithActivity>> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM threads")
        .fetch_one(pool)
        .await?;

    let items: Vec<ThreadWithActivity> = sqlx::query_as(FORUM_PAGE_SQL)
        .bind(Repliable::THREADS)
        .bind(req.limit())
        .bind(req.offset())
        .fetch_all(pool)
        .await?;

    Ok(Page::new(items, total, req))
}

/// One page of the threads carrying the named tag, ordered by descending
/// latest activity.
///
/// The tag is resolved before the page query runs; an unknown tag name fails
/// with [`ForumError::TagNotFound`] rather than returning an empty page.
///
/// # Errors
///
/// Returns [`ForumError::TagNotFound`] for an unknown tag, or a database
/// error if the underlying queries fail.
pub async fn find_for_forum_by_tag(
    pool: &SqlitePool,
    tag_name: &str,
    req: PageRequest,
) -> Result<Page<ThreadWithActivity>> {
    let tag: Option<(i64,)> = sqlx::query_as("SELECT id FROM tags WHERE name = ?")
        .bind(tag_name)
        .fetch_optional(pool)
        .await?;

    let Some((tag_id,)) = tag else {
        return Err(ForumError::TagNotFound(tag_name.to_string()));
    };

    let (total,): (i64,) = sqlx::query_as(
        r"
        SELECT COUNT(*) FROM threads
        JOIN taggables
            ON taggables.taggable_type = ? AND taggables.taggable_id = threads.id
            AND taggables.tag_id = ?
        ",
    )
    .bind(Repliable::THREADS)
    .bind(tag_id)
    .fetch_one(pool)
    .await?;

    let items: Vec<ThreadWithActivity> = sqlx::query_as(FORUM_PAGE_BY_TAG_SQL)
        .bind(Repliable::THREADS)
        .bind(tag_id)
        .bind(Repliable::THREADS)
        .bind(req.limit())
        .bind(req.offset())
        .fetch_all(pool)
        .await?;

    Ok(Page::new(items, total, req))
}

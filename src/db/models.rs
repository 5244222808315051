use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A forum thread.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Thread {
    pub id: i64,
    pub subject: String,
    /// Markdown source.
    pub body: String,
    /// Originating IP of the author, stored as text (IPv4 or IPv6).
    pub ip: String,
    pub slug: String,
    /// Id of the reply accepted as this thread's solution, if any.
    pub solution_reply_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// A reply attached to one repliable owner for its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reply {
    pub id: i64,
    pub body: String,
    pub replyable_type: String,
    pub replyable_id: i64,
    pub created_at: String,
}

/// A tag; attached to taggable owners through the `taggables` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// An article row. This crate only touches the approval/share timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub approved_at: Option<String>,
    pub shared_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Typed reference to an entity that can own replies.
///
/// The database records the owner as a `(replyable_type, replyable_id)` pair;
/// business logic only ever sees this enum, never the raw discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repliable {
    Thread(i64),
    Article(i64),
}

impl Repliable {
    pub(crate) const THREADS: &'static str = "threads";
    pub(crate) const ARTICLES: &'static str = "articles";

    /// Storage discriminant for the owner kind.
    #[must_use]
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::Thread(_) => Self::THREADS,
            Self::Article(_) => Self::ARTICLES,
        }
    }

    /// Owner row id.
    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Thread(id) | Self::Article(id) => *id,
        }
    }

    /// Rebuild a typed reference from the stored pair. `None` for a
    /// discriminant this crate does not know about.
    #[must_use]
    pub fn from_parts(kind: &str, id: i64) -> Option<Self> {
        match kind {
            Self::THREADS => Some(Self::Thread(id)),
            Self::ARTICLES => Some(Self::Article(id)),
            _ => None,
        }
    }
}

/// Typed reference to an entity that can carry tags. Same storage scheme as
/// [`Repliable`], via the `(taggable_type, taggable_id)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Taggable {
    Thread(i64),
    Article(i64),
}

impl Taggable {
    #[must_use]
    pub fn type_str(&self) -> &'static str {
        match self {
            Self::Thread(_) => Repliable::THREADS,
            Self::Article(_) => Repliable::ARTICLES,
        }
    }

    #[must_use]
    pub fn id(&self) -> i64 {
        match self {
            Self::Thread(id) | Self::Article(id) => *id,
        }
    }
}

impl Reply {
    /// The entity this reply belongs to, as a typed reference.
    #[must_use]
    pub fn replyable(&self) -> Option<Repliable> {
        Repliable::from_parts(&self.replyable_type, self.replyable_id)
    }

    #[must_use]
    pub fn created_at_parsed(&self) -> Option<NaiveDateTime> {
        parse_datetime(&self.created_at)
    }
}

impl Thread {
    #[must_use]
    pub fn created_at_parsed(&self) -> Option<NaiveDateTime> {
        parse_datetime(&self.created_at)
    }
}

/// Data for inserting a new thread. The slug is derived separately, see
/// [`crate::forum::unique_slug`].
#[derive(Debug, Clone)]
pub struct NewThread {
    pub subject: String,
    pub body: String,
    pub ip: String,
    pub slug: String,
}

/// Data for inserting a new reply.
#[derive(Debug, Clone)]
pub struct NewReply {
    pub body: String,
    pub replyable: Repliable,
}

/// Thread row plus the derived ranking column produced by the forum query.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ThreadWithActivity {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub thread: Thread,
    /// `max(thread.created_at, latest reply created_at)`.
    pub latest_activity: String,
}

impl ThreadWithActivity {
    #[must_use]
    pub fn latest_activity_parsed(&self) -> Option<NaiveDateTime> {
        parse_datetime(&self.latest_activity)
    }
}

/// Parse a SQLite `datetime('now')`-formatted timestamp.
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
}

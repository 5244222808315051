use std::fmt;

use thiserror::Error;

/// Why a reply was rejected as a thread's solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionRejection {
    /// The reply's owner is not a thread at all.
    ReplyableIsNotAThread,
    /// The reply is owned by a different thread.
    ReplyBelongsToAnotherThread,
}

impl fmt::Display for SolutionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReplyableIsNotAThread => write!(f, "reply's replyable is not a thread"),
            Self::ReplyBelongsToAnotherThread => write!(f, "reply belongs to another thread"),
        }
    }
}

/// Errors from the forum core operations.
///
/// Store-layer failures pass through unchanged as [`ForumError::Database`];
/// no retries happen at this layer.
#[derive(Debug, Error)]
pub enum ForumError {
    #[error("could not mark reply {reply_id} as solution: {reason}")]
    CouldNotMarkReplyAsSolution {
        reply_id: i64,
        reason: SolutionRejection,
    },

    #[error("no tag named '{0}'")]
    TagNotFound(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, ForumError>;

//! Error taxonomy for operations that can abort
//!
//! DOM absence ("not ready yet") and missing optional adapter capabilities are
//! not errors; they surface as `None`/`false` and are retried by the callers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplaisError {
    #[error("no site adapter matches {0}")]
    NoAdapter(String),

    #[error("no conversation is open")]
    IdentityMissing,

    #[error("conversation context is not available yet")]
    ContextUnavailable,

    #[error("settings store failed: {0}")]
    Settings(String),

    #[error("reply backend failed: {0}")]
    Backend(String),

    #[error("reply backend did not answer within {0} ms")]
    Timeout(u32),

    #[error("reply backend returned an empty reply")]
    EmptyReply,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReplaisError>;

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that abort a migration run.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("note '{identifier}' needs a date but none could be resolved from date, title or id")]
    UnresolvableDate { identifier: String },
    #[error("note '{identifier}' has a malformed metadata header: {reason}")]
    MalformedMetadata { identifier: String, reason: String },
    #[error("two source notes share the identifier '{identifier}'")]
    DuplicateIdentifier { identifier: String },
    #[error("notes '{first}' and '{second}' both resolve to '{path}'")]
    DuplicateDestination {
        path: String,
        first: String,
        second: String,
    },
    #[error("failed to write {}: {reason}", path.display())]
    Emit { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, MigrateError>;

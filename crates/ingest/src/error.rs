//! Error types produced by the ingest crate.
//!
//! Loading a batch is the only place in the pipeline where a failure is fatal
//! for the whole run. Unreadable individual files are not errors: they are
//! decoded lossily or skipped with a warning so one bad submission never takes
//! the batch down.
//!
//! | Error | Category | Description |
//! |-------|----------|-------------|
//! | [`NotADirectory`](IngestError::NotADirectory) | Input | Batch root is missing or not a directory |
//! | [`Io`](IngestError::Io) | Input | The batch root could not be listed |
//! | [`EmptyBatch`](IngestError::EmptyBatch) | Structure | No files to compare |
//! | [`UnknownTarget`](IngestError::UnknownTarget) | Input | Designated file is not in the batch |
//! | [`InvalidConfig`](IngestError::InvalidConfig) | Config | Ingest configuration rejected |
use thiserror::Error;

/// Errors that can occur while assembling a submission batch.
///
/// # Examples
///
/// ```rust
/// use ingest::IngestError;
///
/// let err = IngestError::EmptyBatch { root: "subs/week1".into() };
/// assert_eq!(err.to_string(), "no submissions found in subs/week1");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// The batch root does not exist or is not a directory.
    #[error("batch root is not a directory: {0}")]
    NotADirectory(String),

    /// Listing the batch root failed.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The batch contains zero files. Fatal: the comparator cannot run and this
    /// must stay distinguishable from "every file scored 0%".
    #[error("no submissions found in {root}")]
    EmptyBatch { root: String },

    /// Single-file mode named a file that is not part of the batch.
    #[error("submission {name} is not part of the batch")]
    UnknownTarget { name: String },

    #[error("invalid ingest config: {0}")]
    InvalidConfig(String),
}

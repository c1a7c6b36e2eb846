//! Submission ingest layer.
//!
//! This is where submissions enter the pipeline. We list a directory, keep the
//! regular files that pass the [`IngestConfig`] filter, decode them, and hand
//! back an ordered [`SubmissionBatch`] that downstream stages can fingerprint.
//!
//! ## What we do here
//!
//! - **Stable order** - Files are sorted by name so tie-breaking downstream is
//!   reproducible regardless of how the filesystem enumerates entries.
//! - **Graceful decoding** - Invalid UTF-8 is replaced rather than rejected; an
//!   unreadable file is skipped with a warning. One bad submission never aborts
//!   the batch.
//! - **Fail fast on structure** - A batch with zero files is reported as
//!   [`IngestError::EmptyBatch`] before any computation starts.
//!
//! ## Example
//!
//! ```no_run
//! use ingest::{load_directory, IngestConfig};
//!
//! let batch = load_directory("submissions/week1", &IngestConfig::default()).unwrap();
//! for name in batch.names() {
//!     println!("{name}");
//! }
//! ```
use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

mod config;
mod error;
mod types;

pub use crate::config::IngestConfig;
pub use crate::error::IngestError;
pub use crate::types::{Submission, SubmissionBatch};

/// Load every accepted regular file directly under `root` into a batch.
pub fn load_directory(
    root: impl AsRef<Path>,
    cfg: &IngestConfig,
) -> Result<SubmissionBatch, IngestError> {
    let start = Instant::now();
    let root = root.as_ref();
    cfg.validate()?;

    if !root.is_dir() {
        return Err(IngestError::NotADirectory(root.display().to_string()));
    }

    let entries = fs::read_dir(root).map_err(|err| IngestError::Io {
        path: root.display().to_string(),
        message: err.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(root = %root.display(), error = %err, "ingest_entry_unreadable");
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !cfg.accepts_name(&name) {
            debug!(name = %name, "ingest_skip_filtered");
            continue;
        }
        files.push((name, path));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut batch = SubmissionBatch::default().with_root(root);
    for (name, path) in files {
        match fs::read(&path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                debug!(name = %name, bytes = bytes.len(), "ingest_file");
                batch.push(Submission::new(name, text));
            }
            Err(err) => {
                warn!(name = %name, error = %err, "ingest_file_unreadable");
            }
        }
    }

    batch.ensure_not_empty()?;

    info!(
        root = %root.display(),
        files = batch.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "ingest_success"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_files_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.py"), "y = 2\n").unwrap();
        fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let batch = load_directory(dir.path(), &IngestConfig::default()).unwrap();
        assert_eq!(batch.names(), vec!["a.py", "b.py"]);
        assert_eq!(batch.get("a.py").unwrap().text, "x = 1\n");
        assert_eq!(batch.root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.py"), [b'x', b'=', 0xff, b'1']).unwrap();

        let batch = load_directory(dir.path(), &IngestConfig::default()).unwrap();
        assert_eq!(batch.get("bad.py").unwrap().text, "x=\u{FFFD}1");
    }

    #[test]
    fn empty_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_directory(dir.path(), &IngestConfig::default());
        assert!(matches!(result, Err(IngestError::EmptyBatch { .. })));
    }

    #[test]
    fn filtered_to_nothing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let cfg = IngestConfig::new().with_extensions(["py"]);
        let result = load_directory(dir.path(), &cfg);
        assert!(matches!(result, Err(IngestError::EmptyBatch { .. })));
    }

    #[test]
    fn missing_root_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let result = load_directory(&missing, &IngestConfig::default());
        assert!(matches!(result, Err(IngestError::NotADirectory(_))));
    }

    #[test]
    fn hidden_files_skipped_by_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".swp"), "junk").unwrap();
        fs::write(dir.path().join("a.py"), "x = 1").unwrap();
        let batch = load_directory(dir.path(), &IngestConfig::default()).unwrap();
        assert_eq!(batch.names(), vec!["a.py"]);
    }
}

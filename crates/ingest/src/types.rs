use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// One submitted file: its name (unique within the batch) and raw text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub text: String,
}

impl Submission {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// An ordered batch of submissions.
///
/// Order is significant downstream only for tie-breaking, so callers must hand
/// over a stable order. [`crate::load_directory`] sorts by file name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionBatch {
    /// Directory the batch was read from, if any.
    pub root: Option<PathBuf>,
    submissions: Vec<Submission>,
}

impl SubmissionBatch {
    /// Build an in-memory batch, keeping the given order.
    ///
    /// Later duplicates of a name are dropped so names stay unique.
    ///
    /// ```rust
    /// use ingest::SubmissionBatch;
    ///
    /// let batch = SubmissionBatch::from_pairs([("a.py", "x = 1"), ("b.py", "y = 2")]);
    /// assert_eq!(batch.names(), vec!["a.py", "b.py"]);
    /// ```
    pub fn from_pairs<I, N, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let mut batch = Self::default();
        for (name, text) in pairs {
            batch.push(Submission::new(name, text));
        }
        batch
    }

    /// Append a submission unless its name is already present.
    pub fn push(&mut self, submission: Submission) -> bool {
        if self.contains(&submission.name) {
            return false;
        }
        self.submissions.push(submission);
        true
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn names(&self) -> Vec<&str> {
        self.submissions.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.name == name)
    }

    /// Fails with [`IngestError::EmptyBatch`] when there is nothing to compare.
    pub fn ensure_not_empty(&self) -> Result<(), IngestError> {
        if self.is_empty() {
            let root = self
                .root
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".to_string());
            return Err(IngestError::EmptyBatch { root });
        }
        Ok(())
    }

    /// Fails with [`IngestError::UnknownTarget`] when `name` is not in the batch.
    pub fn ensure_contains(&self, name: &str) -> Result<(), IngestError> {
        if !self.contains(name) {
            return Err(IngestError::UnknownTarget {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

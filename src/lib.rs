//! Workspace umbrella crate for source-code fingerprinting.
//!
//! This crate stitches the stage crates together so callers can go from a
//! directory of submissions to a similarity report with a single call:
//!
//! ```text
//! ingest -> canonical -> perceptual -> matcher
//! (files)   (normalize)  (k-gram, hash, winnow)  (score, report, cluster)
//! ```
//!
//! All configuration is explicit: the batch root, the optional target file,
//! `k` and the window override travel in a [`BatchRequest`].
//!
//! ```
//! use sourceprint::{detect_clusters, run_batch, PipelineConfig, SubmissionBatch};
//!
//! let batch = SubmissionBatch::from_pairs([
//!     ("a.py", "def add(x, y):\n    total = x + y\n    return total\n"),
//!     ("b.py", "def plus(x, y):\n    s = x + y\n    return s\n"),
//! ]);
//! let cfg = PipelineConfig::default();
//! let outcome = run_batch(&batch, &cfg).unwrap();
//! assert_eq!(outcome.report.rows[0].score, 100.0);
//!
//! let groups = detect_clusters(&outcome.report, &cfg.matcher).unwrap();
//! assert_eq!(groups.insights.total_groups, 1);
//! ```

pub mod config;
#[cfg(feature = "cli")]
pub mod export;

pub use canonical::{
    CanonicalError, CanonicalSource, CanonicalizeConfig, collapse_whitespace,
    extract_identifiers, normalize, strip_comments,
};
pub use ingest::{IngestConfig, IngestError, Submission, SubmissionBatch, load_directory};
pub use matcher::{
    BatchReport, ClusterStrategy, FileReport, GroupInsights, GroupLog, GroupRow, GroupSummary,
    Insights, MatchConfig, MatchError, NO_COMPARISON, PlagiarismEdge, ReportRow, SourceScore,
    compare_batch, compare_file, group_report, jaccard_score, resolve_clusters,
};
pub use perceptual::{
    BatchFingerprints, KgramHash, PerceptualConfig, PerceptualError, SourceFingerprint,
    derive_window_size, fingerprint_batch, fingerprint_source, kgrams, winnow,
};

pub use crate::config::{ConfigLoadError, LoggingConfig, SourceprintConfig};

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

/// Errors that can occur while running a batch through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Ingest(IngestError),
    Canonical(CanonicalError),
    Perceptual(PerceptualError),
    Match(MatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Ingest(err) => write!(f, "ingest failure: {err}"),
            PipelineError::Canonical(err) => write!(f, "normalization failure: {err}"),
            PipelineError::Perceptual(err) => write!(f, "fingerprinting failed: {err}"),
            PipelineError::Match(err) => write!(f, "comparison failed: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Ingest(err) => Some(err),
            PipelineError::Canonical(err) => Some(err),
            PipelineError::Perceptual(err) => Some(err),
            PipelineError::Match(err) => Some(err),
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(value: IngestError) -> Self {
        PipelineError::Ingest(value)
    }
}

impl From<CanonicalError> for PipelineError {
    fn from(value: CanonicalError) -> Self {
        PipelineError::Canonical(value)
    }
}

impl From<PerceptualError> for PipelineError {
    fn from(value: PerceptualError) -> Self {
        PipelineError::Perceptual(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

/// Stage configs for one run, minus ingest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub canonical: CanonicalizeConfig,
    pub perceptual: PerceptualConfig,
    pub matcher: MatchConfig,
}

/// Everything needed to run the engine over a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub root: PathBuf,
    /// Run single-file mode for this submission instead of all pairs.
    pub target: Option<String>,
    pub ingest: IngestConfig,
    pub pipeline: PipelineConfig,
}

impl BatchRequest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            target: None,
            ingest: IngestConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }

    /// Build a request from a loaded YAML config.
    pub fn from_config(root: impl Into<PathBuf>, config: &SourceprintConfig) -> Self {
        Self {
            root: root.into(),
            target: None,
            ingest: config.ingest.clone(),
            pipeline: config.pipeline(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.pipeline.perceptual.k = k;
        self
    }

    pub fn with_window(mut self, w: usize) -> Self {
        self.pipeline.perceptual.window_override = Some(w);
        self
    }

    pub fn with_ingest(mut self, ingest: IngestConfig) -> Self {
        self.ingest = ingest;
        self
    }
}

/// Result of an all-pairs run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    /// Window width every file was winnowed with.
    pub window: usize,
    /// Files that did not parse and were compared without identifier masking.
    pub parse_failures: Vec<String>,
    pub report: BatchReport,
}

/// Result of a single-file run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    pub window: usize,
    pub parse_failures: Vec<String>,
    pub report: FileReport,
}

/// Result of [`run_directory`], depending on whether a target was given.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RunOutcome {
    Batch(BatchOutcome),
    File(FileOutcome),
}

/// Normalize every submission, in batch order.
///
/// Runs on the rayon pool when `cfg.perceptual.use_parallel` is set.
pub fn normalize_batch(
    batch: &SubmissionBatch,
    cfg: &PipelineConfig,
) -> Result<Vec<CanonicalSource>, PipelineError> {
    let run = |sub: &Submission| normalize(sub.name.as_str(), &sub.text, &cfg.canonical);
    let docs = if cfg.perceptual.use_parallel {
        batch
            .submissions()
            .par_iter()
            .map(run)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        batch
            .submissions()
            .iter()
            .map(run)
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(docs)
}

fn fingerprint_submissions(
    batch: &SubmissionBatch,
    cfg: &PipelineConfig,
) -> Result<(BatchFingerprints, Vec<String>), PipelineError> {
    batch.ensure_not_empty()?;
    let docs = normalize_batch(batch, cfg)?;
    let parse_failures = docs
        .iter()
        .filter(|doc| doc.parse_failed)
        .map(|doc| doc.name.clone())
        .collect();
    let fingerprints = fingerprint_batch(&docs, &cfg.perceptual)?;
    Ok((fingerprints, parse_failures))
}

/// All-pairs mode over an in-memory batch.
pub fn run_batch(
    batch: &SubmissionBatch,
    cfg: &PipelineConfig,
) -> Result<BatchOutcome, PipelineError> {
    let span = info_span!("sourceprint.batch", files = batch.len());
    let _guard = span.enter();
    let start = Instant::now();

    cfg.matcher.validate()?;
    let (fingerprints, parse_failures) = fingerprint_submissions(batch, cfg)?;
    let report = compare_batch(&fingerprints.fingerprints, &cfg.matcher)?;

    info!(
        files = batch.len(),
        window = fingerprints.window,
        parse_failures = parse_failures.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "pipeline_batch_complete"
    );

    Ok(BatchOutcome {
        window: fingerprints.window,
        parse_failures,
        report,
    })
}

/// Single-file mode: compare `target` against every other submission.
pub fn run_file(
    batch: &SubmissionBatch,
    target: &str,
    cfg: &PipelineConfig,
) -> Result<FileOutcome, PipelineError> {
    let span = info_span!("sourceprint.file", files = batch.len(), file = %target);
    let _guard = span.enter();
    let start = Instant::now();

    cfg.matcher.validate()?;
    batch.ensure_not_empty()?;
    batch.ensure_contains(target)?;
    let (fingerprints, parse_failures) = fingerprint_submissions(batch, cfg)?;
    let report = compare_file(target, &fingerprints.fingerprints, &cfg.matcher)?;

    info!(
        files = batch.len(),
        window = fingerprints.window,
        elapsed_micros = start.elapsed().as_micros(),
        "pipeline_file_complete"
    );

    Ok(FileOutcome {
        window: fingerprints.window,
        parse_failures,
        report,
    })
}

/// Group the report rows of an all-pairs run.
pub fn detect_clusters(report: &BatchReport, cfg: &MatchConfig) -> Result<GroupLog, PipelineError> {
    Ok(resolve_clusters(&report.rows, cfg)?)
}

/// Load the request's directory, then run single-file mode when a target is
/// set and all-pairs mode otherwise.
pub fn run_directory(request: &BatchRequest) -> Result<RunOutcome, PipelineError> {
    let batch = load_directory(&request.root, &request.ingest)?;
    match request.target.as_deref() {
        Some(target) => Ok(RunOutcome::File(run_file(&batch, target, &request.pipeline)?)),
        None => Ok(RunOutcome::Batch(run_batch(&batch, &request.pipeline)?)),
    }
}

//! # Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the fingerprinting stage (`perceptual`). Given the
//! winnowed fingerprints of a batch it scores every pair, picks each file's
//! best match, derives originality and summary statistics, and groups files
//! that are linked by high similarity.
//!
//! ## Core Types
//!
//! - [`MatchConfig`]: group threshold, [`ClusterStrategy`] and parallelism.
//! - [`BatchReport`]: all-pairs log, best match per file and [`Insights`].
//! - [`FileReport`]: one-vs-all scores for a single target file.
//! - [`GroupLog`] / [`GroupSummary`]: resolved groups and per-group stats.
//!
//! Scores are percentages rounded to two decimals. A comparison with an
//! empty fingerprint set scores [`NO_COMPARISON`] and never counts towards
//! any average.
//!
//! ## Example Usage
//!
//! ```
//! use canonical::{normalize, CanonicalizeConfig};
//! use matcher::{compare_batch, resolve_clusters, MatchConfig};
//! use perceptual::{fingerprint_batch, PerceptualConfig};
//!
//! let canon = CanonicalizeConfig::default();
//! let docs = vec![
//!     normalize("a.py", "for i in range(10):\n    print(i * i)\n", &canon).unwrap(),
//!     normalize("b.py", "for n in range(10):\n    print(n * n)\n", &canon).unwrap(),
//!     normalize("c.py", "import sys\nsys.exit(3)\n", &canon).unwrap(),
//! ];
//! let batch = fingerprint_batch(&docs, &PerceptualConfig::new().with_k(5)).unwrap();
//!
//! let cfg = MatchConfig::default();
//! let report = compare_batch(&batch.fingerprints, &cfg).unwrap();
//! assert_eq!(report.rows[0].score, 100.0);
//!
//! let groups = resolve_clusters(&report.rows, &cfg).unwrap();
//! assert_eq!(groups.insights.max_group_size, 2);
//! ```

mod cluster;
mod engine;
mod insights;
mod similarity;
pub mod types;

pub use crate::cluster::{group_insights, group_report, resolve_clusters, UnionFind};
pub use crate::engine::{compare_batch, compare_file};
pub use crate::insights::originality_score;
pub use crate::similarity::{is_comparable, jaccard_score, round2};
pub use crate::types::{
    BatchReport, ClusterStrategy, FileReport, GroupInsights, GroupLog, GroupRow, GroupSummary,
    Insights, MatchConfig, MatchError, PlagiarismEdge, ReportRow, SourceScore,
    DEFAULT_GROUP_THRESHOLD, NO_COMPARISON,
};

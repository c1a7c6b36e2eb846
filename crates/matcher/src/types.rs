use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Score recorded when either side of a comparison has no fingerprints.
///
/// Kept distinct from `0.0` so "no data" and "no overlap" never mix.
pub const NO_COMPARISON: f64 = -1.0;

/// Default similarity (in percent) at which two submissions share a group.
pub const DEFAULT_GROUP_THRESHOLD: f64 = 80.0;

/// How report rows are merged into groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStrategy {
    /// Union every row at or above the threshold with its source, in any
    /// order. Groups are the connected components.
    #[default]
    UnionFind,
    /// Scan rows by descending score, copying the source row's current label
    /// and stopping at the first row below the threshold. Labels are copied,
    /// not merged, so a label that changes later is not followed.
    SortedScan,
}

/// Configuration for comparison and clustering.
///
/// Cheap to clone and serde-friendly so it can be embedded in higher-level
/// configs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Configuration schema version. Must be >= 1.
    pub version: u32,
    /// Minimum score (percent, inclusive) that links two submissions.
    pub group_threshold: f64,
    pub cluster_strategy: ClusterStrategy,
    /// Score pairs on the rayon pool. Log order is unaffected.
    pub use_parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            group_threshold: DEFAULT_GROUP_THRESHOLD,
            cluster_strategy: ClusterStrategy::default(),
            use_parallel: false,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.group_threshold = threshold;
        self
    }

    pub fn with_strategy(mut self, strategy: ClusterStrategy) -> Self {
        self.cluster_strategy = strategy;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version == 0 {
            return Err(MatchError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if !self.group_threshold.is_finite()
            || !(0.0..=100.0).contains(&self.group_threshold)
        {
            return Err(MatchError::InvalidThreshold {
                threshold: self.group_threshold,
            });
        }
        Ok(())
    }
}

/// One directed comparison: `submitted` checked against `source`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlagiarismEdge {
    pub submitted: String,
    pub source: String,
    /// Percentage in `[0, 100]`, or [`NO_COMPARISON`].
    pub score: f64,
}

/// Best match of one submitted file in all-pairs mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportRow {
    pub submitted: String,
    /// `None` when the file has no comparable edge.
    pub originality_score: Option<f64>,
    pub source: String,
    pub score: f64,
}

/// One row of a single-file report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceScore {
    pub source: String,
    pub score: f64,
}

/// Summary statistics over similarity scores, sentinel excluded.
///
/// Every field is `None` when no comparable score exists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Insights {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    /// Sample standard deviation; needs at least two scores.
    pub std_dev: Option<f64>,
}

/// Output of all-pairs mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchReport {
    /// Every directed edge in enumeration order.
    pub log: Vec<PlagiarismEdge>,
    /// Best edge per submitted file, highest score first.
    pub rows: Vec<ReportRow>,
    /// Computed over `rows`.
    pub insights: Insights,
}

/// Output of single-file mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileReport {
    pub target: String,
    /// Edges from the target to every other file, in batch order.
    pub log: Vec<PlagiarismEdge>,
    /// Same edges, highest score first.
    pub rows: Vec<SourceScore>,
    /// Computed over `log`.
    pub insights: Insights,
    pub originality_score: Option<f64>,
}

/// A report row with its resolved group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupRow {
    /// Position in presentation order, starting at 1.
    pub serial: usize,
    /// Dense group id in `1..=G`.
    pub group: usize,
    pub submitted: String,
    pub originality_score: Option<f64>,
    pub source: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct GroupInsights {
    pub total_groups: usize,
    /// Rows per group, rounded to 2 decimals. `0.0` with no rows.
    pub average_size: f64,
    pub groups_ge_2: usize,
    pub groups_ge_5: usize,
    pub groups_ge_10: usize,
    pub max_group_size: usize,
}

/// Grouped report rows in presentation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupLog {
    pub rows: Vec<GroupRow>,
    pub insights: GroupInsights,
}

/// Per-group score summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupSummary {
    pub group: usize,
    pub submission_count: usize,
    pub max_score: Option<f64>,
    pub min_score: Option<f64>,
    pub mean_score: Option<f64>,
}

/// Errors produced by the matching layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// No submissions to compare.
    #[error("batch contains no submissions")]
    EmptyBatch,
    #[error("submission {name} is not part of the batch")]
    UnknownTarget { name: String },
    #[error("submission {name} appears more than once in the batch")]
    DuplicateName { name: String },
    #[error("invalid group threshold {threshold}; expected a value in [0, 100]")]
    InvalidThreshold { threshold: f64 },
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = MatchConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.group_threshold, 80.0);
        assert_eq!(cfg.cluster_strategy, ClusterStrategy::UnionFind);
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        for threshold in [-0.5, 100.5, f64::NAN, f64::INFINITY] {
            let cfg = MatchConfig::new().with_threshold(threshold);
            assert!(matches!(
                cfg.validate(),
                Err(MatchError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn boundary_thresholds_accepted() {
        assert!(MatchConfig::new().with_threshold(0.0).validate().is_ok());
        assert!(MatchConfig::new().with_threshold(100.0).validate().is_ok());
    }

    #[test]
    fn version_zero_rejected() {
        let cfg = MatchConfig {
            version: 0,
            ..MatchConfig::default()
        };
        let err = cfg.validate().expect_err("config should be invalid");
        match err {
            MatchError::InvalidConfig(msg) => assert!(msg.contains("version")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strategy_serializes_snake_case() {
        let json = serde_json::to_string(&ClusterStrategy::SortedScan).unwrap();
        assert_eq!(json, "\"sorted_scan\"");
        let cfg: MatchConfig =
            serde_json::from_str(r#"{"cluster_strategy": "sorted_scan"}"#).unwrap();
        assert_eq!(cfg.cluster_strategy, ClusterStrategy::SortedScan);
        assert_eq!(cfg.group_threshold, 80.0);
    }
}

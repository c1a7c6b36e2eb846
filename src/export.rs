//! Timestamped CSV exports of reports and logs.
//!
//! Every export lands in its own file named `<kind>_<YYYYmmdd_HHMMSS>.csv`
//! inside the chosen directory. Rows are written through serde, so the CSV
//! header is the field list of the exported type.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use matcher::{BatchReport, FileReport, GroupLog, GroupSummary};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Errors raised while writing export files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to prepare export directory {path}: {source}")]
    Directory {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// What an export file contains. Also its file-name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    BatchReport,
    ExhaustiveLogs,
    FileReport,
    GroupLogs,
    GroupReport,
}

impl ExportKind {
    pub fn prefix(self) -> &'static str {
        match self {
            ExportKind::BatchReport => "batch_report",
            ExportKind::ExhaustiveLogs => "exhaustive_logs",
            ExportKind::FileReport => "file_report",
            ExportKind::GroupLogs => "group_logs",
            ExportKind::GroupReport => "group_report",
        }
    }
}

/// Writes export files into one directory with one shared timestamp.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
    stamp: String,
}

impl Exporter {
    /// Exporter stamped with the current local time.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stamp: Local::now().format(STAMP_FORMAT).to_string(),
        }
    }

    /// Use a fixed stamp instead of the clock.
    pub fn with_stamp(mut self, stamp: impl Into<String>) -> Self {
        self.stamp = stamp.into();
        self
    }

    pub fn path_for(&self, kind: ExportKind) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", kind.prefix(), self.stamp))
    }

    /// Write any serializable rows as `kind`.
    pub fn write_rows<T: Serialize>(
        &self,
        kind: ExportKind,
        rows: &[T],
    ) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ExportError::Directory {
            path: self.dir.display().to_string(),
            source,
        })?;

        let path = self.path_for(kind);
        let write_err = |source: csv::Error| ExportError::Write {
            path: path.display().to_string(),
            source,
        };
        let mut wtr = csv::Writer::from_path(&path).map_err(write_err)?;
        for row in rows {
            wtr.serialize(row).map_err(write_err)?;
        }
        wtr.flush().map_err(|err| write_err(csv::Error::from(err)))?;

        info!(path = %path.display(), rows = rows.len(), "export_written");
        Ok(path)
    }

    /// Best match per file.
    pub fn batch_report(&self, report: &BatchReport) -> Result<PathBuf, ExportError> {
        self.write_rows(ExportKind::BatchReport, &report.rows)
    }

    /// Every directed comparison of a batch run.
    pub fn exhaustive_logs(&self, report: &BatchReport) -> Result<PathBuf, ExportError> {
        self.write_rows(ExportKind::ExhaustiveLogs, &report.log)
    }

    pub fn file_report(&self, report: &FileReport) -> Result<PathBuf, ExportError> {
        self.write_rows(ExportKind::FileReport, &report.rows)
    }

    pub fn group_logs(&self, groups: &GroupLog) -> Result<PathBuf, ExportError> {
        self.write_rows(ExportKind::GroupLogs, &groups.rows)
    }

    pub fn group_report(&self, summaries: &[GroupSummary]) -> Result<PathBuf, ExportError> {
        self.write_rows(ExportKind::GroupReport, summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matcher::{Insights, PlagiarismEdge, ReportRow};

    fn report() -> BatchReport {
        BatchReport {
            log: vec![
                PlagiarismEdge {
                    submitted: "a.py".into(),
                    source: "b.py".into(),
                    score: 100.0,
                },
                PlagiarismEdge {
                    submitted: "b.py".into(),
                    source: "a.py".into(),
                    score: 100.0,
                },
            ],
            rows: vec![ReportRow {
                submitted: "a.py".into(),
                originality_score: None,
                source: "b.py".into(),
                score: 100.0,
            }],
            insights: Insights::default(),
        }
    }

    #[test]
    fn file_names_follow_kind_and_stamp() {
        let exporter = Exporter::new("/tmp/out").with_stamp("20240102_030405");
        assert_eq!(
            exporter.path_for(ExportKind::GroupReport),
            PathBuf::from("/tmp/out/group_report_20240102_030405.csv")
        );
    }

    #[test]
    fn default_stamp_has_expected_shape() {
        let exporter = Exporter::new("out");
        let name = exporter.path_for(ExportKind::BatchReport);
        let name = name.file_name().unwrap().to_string_lossy().into_owned();
        // batch_report_ + 8 digits + _ + 6 digits + .csv
        assert_eq!(name.len(), "batch_report_".len() + 15 + 4);
        assert!(name.starts_with("batch_report_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path()).with_stamp("s");

        let path = exporter.exhaustive_logs(&report()).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text, "submitted,source,score\na.py,b.py,100.0\nb.py,a.py,100.0\n");

        let path = exporter.batch_report(&report()).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(
            text,
            "submitted,originality_score,source,score\na.py,,b.py,100.0\n"
        );
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("results").join("week1");
        let exporter = Exporter::new(&nested).with_stamp("s");
        exporter.exhaustive_logs(&report()).unwrap();
        assert!(nested.is_dir());
    }
}

//! Grouping of report rows into families of similar submissions.
//!
//! Both strategies assign a provisional label to every row and then share the
//! same presentation pipeline:
//!
//! 1. group size = number of rows carrying the label
//! 2. stable sort by (size desc, score desc)
//! 3. relabel to dense ids `1..=G` in order of first appearance
//! 4. stable sort by (group asc, score desc) and number rows from 1

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, info};

use crate::similarity::{is_comparable, round2};
use crate::types::{
    ClusterStrategy, GroupInsights, GroupLog, GroupRow, GroupSummary, MatchConfig, MatchError,
    ReportRow,
};

/// Disjoint-set forest with path halving and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            Ordering::Less => self.parent[ra] = rb,
            Ordering::Greater => self.parent[rb] = ra,
            Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
    }
}

/// Resolve report rows into groups linked at or above the configured threshold.
pub fn resolve_clusters(rows: &[ReportRow], cfg: &MatchConfig) -> Result<GroupLog, MatchError> {
    cfg.validate()?;

    let mut sorted: Vec<&ReportRow> = rows.iter().collect();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

    let labels = match cfg.cluster_strategy {
        ClusterStrategy::UnionFind => union_labels(&sorted, cfg.group_threshold),
        ClusterStrategy::SortedScan => scan_labels(&sorted, cfg.group_threshold),
    };

    let group_rows = assign_groups(&sorted, &labels);
    let insights = group_insights(&group_rows);

    info!(
        rows = group_rows.len(),
        groups = insights.total_groups,
        max_group_size = insights.max_group_size,
        strategy = ?cfg.cluster_strategy,
        "match_clusters_resolved"
    );

    Ok(GroupLog {
        rows: group_rows,
        insights,
    })
}

fn row_index<'a>(rows: &[&'a ReportRow]) -> HashMap<&'a str, usize> {
    let mut index = HashMap::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        index.entry(row.submitted.as_str()).or_insert(idx);
    }
    index
}

/// Connected components over every qualifying row, independent of order.
fn union_labels(rows: &[&ReportRow], threshold: f64) -> Vec<usize> {
    let index = row_index(rows);
    let mut sets = UnionFind::new(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        if !is_comparable(row.score) || row.score < threshold {
            continue;
        }
        match index.get(row.source.as_str()) {
            Some(&source) => sets.union(idx, source),
            None => debug!(submitted = %row.submitted, source = %row.source, "match_source_not_in_report"),
        }
    }
    (0..rows.len()).map(|idx| sets.find(idx)).collect()
}

/// Each row copies the current label of its source row, scanning by
/// descending score and stopping at the first row below the threshold.
fn scan_labels(rows: &[&ReportRow], threshold: f64) -> Vec<usize> {
    let index = row_index(rows);
    let mut labels: Vec<usize> = (0..rows.len()).collect();
    for (idx, row) in rows.iter().enumerate() {
        if !is_comparable(row.score) || row.score < threshold {
            break;
        }
        if let Some(&source) = index.get(row.source.as_str()) {
            labels[idx] = labels[source];
        }
    }
    labels
}

fn assign_groups(rows: &[&ReportRow], labels: &[usize]) -> Vec<GroupRow> {
    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for &label in labels {
        *sizes.entry(label).or_insert(0) += 1;
    }

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| {
        sizes[&labels[b]]
            .cmp(&sizes[&labels[a]])
            .then_with(|| rows[b].score.total_cmp(&rows[a].score))
    });

    let mut dense: HashMap<usize, usize> = HashMap::new();
    let mut grouped: Vec<(usize, &ReportRow)> = order
        .into_iter()
        .map(|idx| {
            let next = dense.len() + 1;
            let group = *dense.entry(labels[idx]).or_insert(next);
            (group, rows[idx])
        })
        .collect();

    grouped.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.score.total_cmp(&a.1.score)));

    grouped
        .into_iter()
        .enumerate()
        .map(|(pos, (group, row))| GroupRow {
            serial: pos + 1,
            group,
            submitted: row.submitted.clone(),
            originality_score: row.originality_score,
            source: row.source.clone(),
            score: row.score,
        })
        .collect()
}

fn group_sizes(rows: &[GroupRow]) -> Vec<usize> {
    let groups = rows.iter().map(|row| row.group).max().unwrap_or(0);
    let mut sizes = vec![0usize; groups];
    for row in rows {
        sizes[row.group - 1] += 1;
    }
    sizes
}

/// Summary counts over the resolved groups.
pub fn group_insights(rows: &[GroupRow]) -> GroupInsights {
    let sizes = group_sizes(rows);
    if sizes.is_empty() {
        return GroupInsights::default();
    }
    let count_at_least = |min: usize| sizes.iter().filter(|&&size| size >= min).count();
    GroupInsights {
        total_groups: sizes.len(),
        average_size: round2(rows.len() as f64 / sizes.len() as f64),
        groups_ge_2: count_at_least(2),
        groups_ge_5: count_at_least(5),
        groups_ge_10: count_at_least(10),
        max_group_size: sizes.iter().copied().max().unwrap_or(0),
    }
}

/// Per-group score summary in group id order. The sentinel is ignored in the
/// score fields.
pub fn group_report(log: &GroupLog) -> Vec<GroupSummary> {
    let sizes = group_sizes(&log.rows);
    sizes
        .iter()
        .enumerate()
        .map(|(pos, &count)| {
            let group = pos + 1;
            let scores: Vec<f64> = log
                .rows
                .iter()
                .filter(|row| row.group == group && is_comparable(row.score))
                .map(|row| row.score)
                .collect();
            let mean = (!scores.is_empty())
                .then(|| round2(scores.iter().sum::<f64>() / scores.len() as f64));
            GroupSummary {
                group,
                submission_count: count,
                max_score: scores.iter().copied().reduce(f64::max),
                min_score: scores.iter().copied().reduce(f64::min),
                mean_score: mean,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NO_COMPARISON;

    fn row(submitted: &str, source: &str, score: f64) -> ReportRow {
        ReportRow {
            submitted: submitted.to_string(),
            originality_score: None,
            source: source.to_string(),
            score,
        }
    }

    fn groups_of(log: &GroupLog) -> Vec<(usize, &str)> {
        log.rows
            .iter()
            .map(|r| (r.group, r.submitted.as_str()))
            .collect()
    }

    fn both() -> [MatchConfig; 2] {
        [
            MatchConfig::new().with_strategy(ClusterStrategy::UnionFind),
            MatchConfig::new().with_strategy(ClusterStrategy::SortedScan),
        ]
    }

    #[test]
    fn union_find_merges_components() {
        let mut sets = UnionFind::new(5);
        sets.union(0, 1);
        sets.union(3, 4);
        sets.union(1, 4);
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(0), sets.find(2));
    }

    #[test]
    fn identical_pair_and_singleton() {
        let rows = vec![
            row("a.py", "b.py", 100.0),
            row("b.py", "a.py", 100.0),
            row("c.py", "a.py", 12.5),
        ];
        for cfg in both() {
            let log = resolve_clusters(&rows, &cfg).unwrap();
            assert_eq!(
                groups_of(&log),
                vec![(1, "a.py"), (1, "b.py"), (2, "c.py")]
            );
            let serials: Vec<usize> = log.rows.iter().map(|r| r.serial).collect();
            assert_eq!(serials, vec![1, 2, 3]);
            assert_eq!(log.insights.total_groups, 2);
            assert_eq!(log.insights.max_group_size, 2);
            assert_eq!(log.insights.groups_ge_2, 1);
            assert_eq!(log.insights.average_size, 1.5);
        }
    }

    #[test]
    fn larger_groups_come_first() {
        let rows = vec![
            row("x.py", "y.py", 99.0),
            row("y.py", "x.py", 99.0),
            row("a.py", "b.py", 90.0),
            row("b.py", "c.py", 95.0),
            row("c.py", "b.py", 95.0),
        ];
        for cfg in both() {
            let log = resolve_clusters(&rows, &cfg).unwrap();
            assert_eq!(
                groups_of(&log),
                vec![
                    (1, "b.py"),
                    (1, "c.py"),
                    (1, "a.py"),
                    (2, "x.py"),
                    (2, "y.py"),
                ]
            );
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let rows = vec![row("a.py", "b.py", 80.0), row("b.py", "a.py", 80.0)];
        for cfg in both() {
            let log = resolve_clusters(&rows, &cfg).unwrap();
            assert_eq!(log.insights.total_groups, 1);
        }
        let below = vec![row("a.py", "b.py", 79.99), row("b.py", "a.py", 79.99)];
        for cfg in both() {
            let log = resolve_clusters(&below, &cfg).unwrap();
            assert_eq!(log.insights.total_groups, 2);
        }
    }

    #[test]
    fn sentinel_rows_are_singletons() {
        let rows = vec![
            row("a.py", "b.py", 100.0),
            row("b.py", "a.py", 100.0),
            row("d.py", "a.py", NO_COMPARISON),
        ];
        let log = resolve_clusters(&rows, &MatchConfig::new().with_threshold(0.0)).unwrap();
        assert_eq!(groups_of(&log), vec![(1, "a.py"), (1, "b.py"), (2, "d.py")]);
    }

    #[test]
    fn strategies_diverge_on_relabelled_chain() {
        // p copies q's label before q adopts r's label
        let rows = vec![
            row("p.py", "q.py", 95.0),
            row("q.py", "r.py", 90.0),
            row("r.py", "q.py", 90.0),
        ];

        let union = resolve_clusters(&rows, &MatchConfig::default()).unwrap();
        assert_eq!(union.insights.total_groups, 1);
        assert_eq!(union.insights.max_group_size, 3);

        let scan = resolve_clusters(
            &rows,
            &MatchConfig::new().with_strategy(ClusterStrategy::SortedScan),
        )
        .unwrap();
        assert_eq!(
            groups_of(&scan),
            vec![(1, "q.py"), (1, "r.py"), (2, "p.py")]
        );
    }

    #[test]
    fn group_sizes_sum_to_row_count() {
        let rows: Vec<ReportRow> = (0..20)
            .map(|i| {
                let partner = if i % 2 == 0 { i + 1 } else { i - 1 };
                let score = if i < 12 { 85.0 } else { 40.0 };
                row(&format!("f{i:02}"), &format!("f{partner:02}"), score)
            })
            .collect();
        for cfg in both() {
            let log = resolve_clusters(&rows, &cfg).unwrap();
            let report = group_report(&log);
            let total: usize = report.iter().map(|g| g.submission_count).sum();
            assert_eq!(total, rows.len());
            let ids: Vec<usize> = report.iter().map(|g| g.group).collect();
            assert_eq!(ids, (1..=log.insights.total_groups).collect::<Vec<_>>());
            // 6 linked pairs plus 8 singletons
            assert_eq!(log.insights.total_groups, 14);
            assert_eq!(log.insights.groups_ge_2, 6);
        }
    }

    #[test]
    fn group_report_summarizes_scores() {
        let rows = vec![
            row("a.py", "b.py", 100.0),
            row("b.py", "c.py", 90.0),
            row("c.py", "b.py", 90.0),
            row("d.py", "a.py", NO_COMPARISON),
        ];
        let log = resolve_clusters(&rows, &MatchConfig::default()).unwrap();
        let report = group_report(&log);
        assert_eq!(report.len(), 2);

        assert_eq!(report[0].group, 1);
        assert_eq!(report[0].submission_count, 3);
        assert_eq!(report[0].max_score, Some(100.0));
        assert_eq!(report[0].min_score, Some(90.0));
        assert_eq!(report[0].mean_score, Some(93.33));

        assert_eq!(report[1].submission_count, 1);
        assert_eq!(report[1].max_score, None);
        assert_eq!(report[1].mean_score, None);
    }

    #[test]
    fn group_insights_buckets() {
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push(row(&format!("big{i}"), &format!("big{}", (i + 1) % 10), 95.0));
        }
        for i in 0..5 {
            rows.push(row(&format!("mid{i}"), &format!("mid{}", (i + 1) % 5), 90.0));
        }
        rows.push(row("solo", "big0", 10.0));

        let log = resolve_clusters(&rows, &MatchConfig::default()).unwrap();
        let insights = log.insights;
        assert_eq!(insights.total_groups, 3);
        assert_eq!(insights.groups_ge_2, 2);
        assert_eq!(insights.groups_ge_5, 2);
        assert_eq!(insights.groups_ge_10, 1);
        assert_eq!(insights.max_group_size, 10);
        assert_eq!(insights.average_size, 5.33);
    }

    #[test]
    fn empty_rows_give_empty_log() {
        let log = resolve_clusters(&[], &MatchConfig::default()).unwrap();
        assert!(log.rows.is_empty());
        assert_eq!(log.insights, GroupInsights::default());
        assert!(group_report(&log).is_empty());
    }

    #[test]
    fn invalid_threshold_rejected() {
        let res = resolve_clusters(&[], &MatchConfig::new().with_threshold(-1.0));
        assert!(matches!(res, Err(MatchError::InvalidThreshold { .. })));
    }
}

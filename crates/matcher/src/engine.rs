use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Instant;

use perceptual::{KgramHash, SourceFingerprint};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::insights::originality_score;
use crate::similarity::jaccard_score;
use crate::types::{
    BatchReport, FileReport, Insights, MatchConfig, MatchError, PlagiarismEdge, ReportRow,
    SourceScore,
};


/// Name and distinct fingerprint hashes of one file.
struct Prepared<'a> {
    name: &'a str,
    set: BTreeSet<KgramHash>,
}

fn prepare<'a>(files: &'a [SourceFingerprint]) -> Result<Vec<Prepared<'a>>, MatchError> {
    if files.is_empty() {
        return Err(MatchError::EmptyBatch);
    }
    let mut seen = HashSet::with_capacity(files.len());
    files
        .iter()
        .map(|file| {
            if !seen.insert(file.name.as_str()) {
                return Err(MatchError::DuplicateName {
                    name: file.name.clone(),
                });
            }
            Ok(Prepared {
                name: &file.name,
                set: file.fingerprint_set(),
            })
        })
        .collect()
}

/// All-pairs comparison.
///
/// Pairs are enumerated as `(i, j)` with `i < j` in input order and each
/// score is logged twice, `i -> j` then `j -> i`. The report keeps, per
/// submitted file, the first edge in log order with the highest score.
pub fn compare_batch(
    files: &[SourceFingerprint],
    cfg: &MatchConfig,
) -> Result<BatchReport, MatchError> {
    let start = Instant::now();
    cfg.validate()?;
    let prepared = prepare(files)?;

    let n = prepared.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
        .collect();

    let scores: Vec<f64> = if cfg.use_parallel {
        pairs
            .par_iter()
            .map(|&(i, j)| jaccard_score(&prepared[i].set, &prepared[j].set))
            .collect()
    } else {
        pairs
            .iter()
            .map(|&(i, j)| jaccard_score(&prepared[i].set, &prepared[j].set))
            .collect()
    };

    let mut log = Vec::with_capacity(pairs.len() * 2);
    for (&(i, j), &score) in pairs.iter().zip(&scores) {
        log.push(edge(prepared[i].name, prepared[j].name, score));
        log.push(edge(prepared[j].name, prepared[i].name, score));
    }

    let rows = best_matches(&log);
    let insights = Insights::from_scores(rows.iter().map(|row| row.score));

    info!(
        files = n,
        edges = log.len(),
        rows = rows.len(),
        parallel = cfg.use_parallel,
        elapsed_micros = start.elapsed().as_micros(),
        "match_batch_complete"
    );

    Ok(BatchReport {
        log,
        rows,
        insights,
    })
}

/// One-vs-all comparison of `target` against every other file.
pub fn compare_file(
    target: &str,
    files: &[SourceFingerprint],
    cfg: &MatchConfig,
) -> Result<FileReport, MatchError> {
    let start = Instant::now();
    cfg.validate()?;
    let prepared = prepare(files)?;

    let target_idx = prepared
        .iter()
        .position(|file| file.name == target)
        .ok_or_else(|| MatchError::UnknownTarget {
            name: target.to_string(),
        })?;
    let target_set = &prepared[target_idx].set;

    let others: Vec<&Prepared<'_>> = prepared
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != target_idx)
        .map(|(_, file)| file)
        .collect();

    let scores: Vec<f64> = if cfg.use_parallel {
        others
            .par_iter()
            .map(|file| jaccard_score(target_set, &file.set))
            .collect()
    } else {
        others
            .iter()
            .map(|file| jaccard_score(target_set, &file.set))
            .collect()
    };

    let log: Vec<PlagiarismEdge> = others
        .iter()
        .zip(&scores)
        .map(|(file, &score)| edge(target, file.name, score))
        .collect();

    let mut rows: Vec<SourceScore> = log
        .iter()
        .map(|e| SourceScore {
            source: e.source.clone(),
            score: e.score,
        })
        .collect();
    rows.sort_by(|a, b| b.score.total_cmp(&a.score));

    let insights = Insights::from_scores(scores.iter().copied());
    let originality = originality_score(scores.iter().copied());

    info!(
        file = %target,
        compared = log.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "match_file_complete"
    );

    Ok(FileReport {
        target: target.to_string(),
        log,
        rows,
        insights,
        originality_score: originality,
    })
}

fn edge(submitted: &str, source: &str, score: f64) -> PlagiarismEdge {
    PlagiarismEdge {
        submitted: submitted.to_string(),
        source: source.to_string(),
        score,
    }
}

/// Best edge and originality per submitted file, ordered by name and then
/// stably by descending score.
fn best_matches(log: &[PlagiarismEdge]) -> Vec<ReportRow> {
    let mut best: BTreeMap<&str, (&PlagiarismEdge, Vec<f64>)> = BTreeMap::new();
    for e in log {
        let (top, scores) = best
            .entry(e.submitted.as_str())
            .or_insert_with(|| (e, Vec::new()));
        // strict: the first maximum in log order wins
        if e.score > top.score {
            *top = e;
        }
        scores.push(e.score);
    }

    let mut rows: Vec<ReportRow> = best
        .into_iter()
        .map(|(name, (top, scores))| {
            debug!(submitted = name, source = %top.source, score = top.score, "match_best");
            ReportRow {
                submitted: name.to_string(),
                originality_score: originality_score(scores),
                source: top.source.clone(),
                score: top.score,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.score.total_cmp(&a.score));
    rows
}

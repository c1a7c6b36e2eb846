//! `sourceprint` command-line interface.
//!
//! Runs the fingerprinting pipeline over a directory of submissions and prints
//! the resulting report as an aligned table or JSON, optionally exporting CSV
//! files next to it.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sourceprint::export::Exporter;
use sourceprint::{
    BatchOutcome, BatchRequest, ClusterStrategy, FileOutcome, GroupInsights, GroupLog,
    GroupSummary, Insights, RunOutcome, SourceprintConfig, detect_clusters, group_report,
    run_directory,
};

#[derive(Debug, Parser)]
#[command(name = "sourceprint")]
#[command(about = "Fingerprint a directory of source files and report likely plagiarism", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `perceptual=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare every file in a directory against every other file
    Batch(BatchArgs),
    /// Compare one file against the rest of its directory
    File(FileArgs),
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Directory holding the submissions
    dir: PathBuf,

    /// Resolve and print groups of similar submissions
    #[arg(long)]
    groups: bool,

    /// Print per-group statistics (implies --groups)
    #[arg(long)]
    group_report: bool,

    /// Minimum score that links two submissions into a group
    #[arg(long)]
    threshold: Option<f64>,

    /// Group resolution strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct FileArgs {
    /// Directory holding the submissions
    dir: PathBuf,

    /// File name (within the directory) to check
    name: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// K-gram length in characters
    #[arg(long)]
    k: Option<usize>,

    /// Fixed winnowing window instead of the derived one
    #[arg(long)]
    window: Option<usize>,

    /// Fingerprint and compare on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Write timestamped CSV files into this directory
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    UnionFind,
    SortedScan,
}

impl From<StrategyArg> for ClusterStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::UnionFind => ClusterStrategy::UnionFind,
            StrategyArg::SortedScan => ClusterStrategy::SortedScan,
        }
    }
}

#[derive(Serialize)]
struct BatchJson<'a> {
    #[serde(flatten)]
    outcome: &'a BatchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<&'a GroupLog>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_report: Option<&'a [GroupSummary]>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SourceprintConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SourceprintConfig::default(),
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level, cli.log_json || config.logging.json);
    debug!(?config, "config_loaded");

    match cli.command {
        Commands::Batch(args) => run_batch_command(&config, args),
        Commands::File(args) => run_file_command(&config, args),
    }
}

fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_request(config: &SourceprintConfig, dir: PathBuf, common: &CommonArgs) -> BatchRequest {
    let mut request = BatchRequest::from_config(dir, config);
    if let Some(k) = common.k {
        request = request.with_k(k);
    }
    if let Some(w) = common.window {
        request = request.with_window(w);
    }
    if common.parallel {
        request.pipeline.perceptual.use_parallel = true;
        request.pipeline.matcher.use_parallel = true;
    }
    request
}

fn run_batch_command(config: &SourceprintConfig, args: BatchArgs) -> anyhow::Result<()> {
    let mut request = build_request(config, args.dir, &args.common);
    if let Some(threshold) = args.threshold {
        request.pipeline.matcher.group_threshold = threshold;
    }
    if let Some(strategy) = args.strategy {
        request.pipeline.matcher.cluster_strategy = strategy.into();
    }

    let outcome = match run_directory(&request)? {
        RunOutcome::Batch(outcome) => outcome,
        RunOutcome::File(_) => anyhow::bail!("batch run produced a single-file report"),
    };

    let want_groups = args.groups || args.group_report;
    let groups = if want_groups {
        Some(detect_clusters(&outcome.report, &request.pipeline.matcher)?)
    } else {
        None
    };
    let summaries = match (&groups, args.group_report) {
        (Some(groups), true) => Some(group_report(groups)),
        _ => None,
    };

    match args.common.format {
        OutputFormat::Json => {
            let body = BatchJson {
                outcome: &outcome,
                groups: groups.as_ref(),
                group_report: summaries.as_deref(),
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table => {
            print_batch(&outcome);
            if let Some(groups) = &groups {
                print_groups(groups);
            }
            if let Some(summaries) = &summaries {
                print_group_report(summaries);
            }
        }
    }

    if let Some(dir) = &args.common.export {
        let exporter = Exporter::new(dir);
        let mut written = vec![
            exporter.batch_report(&outcome.report)?,
            exporter.exhaustive_logs(&outcome.report)?,
        ];
        if let Some(groups) = &groups {
            written.push(exporter.group_logs(groups)?);
        }
        if let Some(summaries) = &summaries {
            written.push(exporter.group_report(summaries)?);
        }
        for path in written {
            eprintln!("exported {}", path.display());
        }
    }

    Ok(())
}

fn run_file_command(config: &SourceprintConfig, args: FileArgs) -> anyhow::Result<()> {
    let request = build_request(config, args.dir, &args.common).with_target(args.name);

    let outcome = match run_directory(&request)? {
        RunOutcome::File(outcome) => outcome,
        RunOutcome::Batch(_) => anyhow::bail!("single-file run produced a batch report"),
    };

    match args.common.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Table => print_file(&outcome),
    }

    if let Some(dir) = &args.common.export {
        let path = Exporter::new(dir).file_report(&outcome.report)?;
        eprintln!("exported {}", path.display());
    }

    Ok(())
}

fn print_batch(outcome: &BatchOutcome) {
    warn_parse_failures(&outcome.parse_failures);
    let rows = outcome
        .report
        .rows
        .iter()
        .map(|r| {
            vec![
                r.submitted.clone(),
                opt(r.originality_score),
                r.source.clone(),
                score(r.score),
            ]
        })
        .collect();
    print_table(&["submitted", "originality", "source", "score"], rows);
    println!();
    print_insights(&outcome.report.insights, None);
}

fn print_file(outcome: &FileOutcome) {
    warn_parse_failures(&outcome.parse_failures);
    println!("Report for {}", outcome.report.target);
    let rows = outcome
        .report
        .rows
        .iter()
        .map(|r| vec![r.source.clone(), score(r.score)])
        .collect();
    print_table(&["source", "score"], rows);
    println!();
    print_insights(&outcome.report.insights, Some(outcome.report.originality_score));
}

fn print_groups(groups: &GroupLog) {
    println!();
    let rows = groups
        .rows
        .iter()
        .map(|r| {
            vec![
                r.serial.to_string(),
                r.group.to_string(),
                r.submitted.clone(),
                opt(r.originality_score),
                r.source.clone(),
                score(r.score),
            ]
        })
        .collect();
    print_table(
        &["serial", "group", "submitted", "originality", "source", "score"],
        rows,
    );
    print_group_insights(&groups.insights);
}

fn print_group_report(summaries: &[GroupSummary]) {
    println!();
    let rows = summaries
        .iter()
        .map(|s| {
            vec![
                s.group.to_string(),
                s.submission_count.to_string(),
                opt(s.max_score),
                opt(s.min_score),
                opt(s.mean_score),
            ]
        })
        .collect();
    print_table(&["group", "submissions", "max", "min", "mean"], rows);
}

fn print_insights(insights: &Insights, originality: Option<Option<f64>>) {
    println!("Maximum similarity: {}", percent(insights.max));
    println!("Minimum similarity: {}", percent(insights.min));
    println!("Mean: {}", percent(insights.mean));
    println!("Standard deviation: {}", opt(insights.std_dev));
    if let Some(originality) = originality {
        println!("Originality score: {}", opt(originality));
    }
}

fn print_group_insights(insights: &GroupInsights) {
    println!();
    println!("Total groups: {}", insights.total_groups);
    println!("Average submissions per group: {:.2}", insights.average_size);
    println!("Groups with 2 or more submissions: {}", insights.groups_ge_2);
    println!("Groups with 5 or more submissions: {}", insights.groups_ge_5);
    println!("Groups with 10 or more submissions: {}", insights.groups_ge_10);
    println!("Maximum group size: {}", insights.max_group_size);
}

fn warn_parse_failures(names: &[String]) {
    if !names.is_empty() {
        eprintln!(
            "note: compared without identifier masking (syntax errors): {}",
            names.join(", ")
        );
    }
}

fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", line(headers.to_vec()));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    );
    for row in &rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

fn score(value: f64) -> String {
    format!("{value:.2}")
}

fn opt(value: Option<f64>) -> String {
    value.map(score).unwrap_or_else(|| "-".to_string())
}

fn percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}%"))
        .unwrap_or_else(|| "-".to_string())
}

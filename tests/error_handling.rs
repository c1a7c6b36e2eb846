use std::fs;

use sourceprint::{
    BatchRequest, IngestError, MatchError, PerceptualError, PipelineError, PipelineConfig,
    RunOutcome, SubmissionBatch, run_batch, run_directory, run_file,
};

fn two_files() -> SubmissionBatch {
    SubmissionBatch::from_pairs([
        ("a.py", "values = [1, 2, 3]\nprint(sum(values))\n"),
        ("b.py", "numbers = [1, 2, 3]\nprint(sum(numbers))\n"),
    ])
}

#[test]
fn empty_directory_is_rejected_before_work() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_directory(&BatchRequest::new(dir.path())).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Ingest(IngestError::EmptyBatch { .. })
    ));
}

#[test]
fn missing_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_directory(&BatchRequest::new(dir.path().join("nope"))).unwrap_err();
    assert!(matches!(err, PipelineError::Ingest(IngestError::NotADirectory(_))));
}

#[test]
fn unknown_target_is_reported() {
    let err = run_file(&two_files(), "c.py", &PipelineConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Ingest(IngestError::UnknownTarget { ref name }) if name == "c.py"
    ));
    assert!(err.to_string().contains("c.py"));
}

#[test]
fn zero_k_is_a_config_error() {
    let mut cfg = PipelineConfig::default();
    cfg.perceptual.k = 0;
    let err = run_batch(&two_files(), &cfg).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Perceptual(PerceptualError::InvalidConfigK { k: 0 })
    );
}

#[test]
fn zero_window_override_is_a_config_error() {
    let mut cfg = PipelineConfig::default();
    cfg.perceptual.window_override = Some(0);
    let err = run_batch(&two_files(), &cfg).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Perceptual(PerceptualError::InvalidConfigWindow { w: 0 })
    );
}

#[test]
fn negative_threshold_is_rejected() {
    let mut cfg = PipelineConfig::default();
    cfg.matcher.group_threshold = -1.0;
    let err = run_batch(&two_files(), &cfg).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Match(MatchError::InvalidThreshold { .. })
    ));
}

#[test]
fn syntax_error_degrades_instead_of_failing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ok.py"),
        "def area(w, h):\n    result = w * h\n    return result\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("broken.py"),
        "def area(w, h:\n    result = w * h\n    return result\n",
    )
    .unwrap();

    let outcome = match run_directory(&BatchRequest::new(dir.path())).unwrap() {
        RunOutcome::Batch(outcome) => outcome,
        RunOutcome::File(_) => panic!("expected batch outcome"),
    };
    assert_eq!(outcome.parse_failures, vec!["broken.py".to_string()]);
    assert_eq!(outcome.report.log.len(), 2);
    assert!(outcome.report.log.iter().all(|e| e.score >= 0.0));
}

#[test]
fn undecodable_bytes_do_not_abort_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "total = 1 + 2\nprint(total)\n").unwrap();
    fs::write(dir.path().join("b.py"), [b'x', b' ', b'=', b' ', 0xfe, 0xff, b'\n']).unwrap();

    let outcome = match run_directory(&BatchRequest::new(dir.path())).unwrap() {
        RunOutcome::Batch(outcome) => outcome,
        RunOutcome::File(_) => panic!("expected batch outcome"),
    };
    assert_eq!(outcome.report.rows.len(), 2);
}

#[test]
fn errors_chain_to_their_stage() {
    use std::error::Error;

    let err = PipelineError::from(IngestError::UnknownTarget {
        name: "x.py".into(),
    });
    let source = err.source().expect("stage error is the source");
    assert_eq!(source.to_string(), "submission x.py is not part of the batch");
}

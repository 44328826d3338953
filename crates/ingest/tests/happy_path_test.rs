use chrono::{TimeZone, Utc};
use dataset::{Commit, Dataset, FixedClock, Format, Path, Structure};
use ingest::{ComputeFieldsPipeline, SaveSwitches};
use std::io::Cursor;
use tokio_util::sync::CancellationToken;

fn int_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {"a": {"type": "integer"}, "b": {"type": "integer"}},
        "required": ["a", "b"],
    })
}

fn blank_commit() -> Commit {
    Commit {
        path: Path::default(),
        title: "save".into(),
        message: "".into(),
        timestamp: Utc.timestamp_opt(0, 0).unwrap(),
        signature: None,
    }
}

async fn run_pipeline(
    body: &'static str,
    schema: serde_json::Value,
    strict: bool,
) -> Result<Dataset, ingest::IngestError> {
    let structure = Structure::new(Format::Csv, schema, strict);
    let draft = Dataset::new(structure);
    let clock = FixedClock::new(Utc.timestamp_opt(0, 0).unwrap());

    let pipeline = ComputeFieldsPipeline::new(
        draft,
        None,
        true,
        Cursor::new(body.as_bytes()),
        blank_commit(),
        &clock,
        SaveSwitches::default(),
        CancellationToken::new(),
    )?;
    let mut pipeline = pipeline;
    tokio::io::copy(&mut pipeline, &mut tokio::io::sink()).await.unwrap();
    pipeline.finish().await
}

#[tokio::test]
async fn csv_happy_path_produces_expected_structure_and_stats() {
    let body = "a,b\n1,2\n3,4\n";
    let dataset = run_pipeline(body, int_schema(), false).await.unwrap();
    let structure = dataset.structure.unwrap();
    assert_eq!(structure.entries, 2);
    assert_eq!(structure.depth, 2);
    assert_eq!(structure.length, body.len());
    assert_eq!(structure.err_count, 0);

    let stats = dataset.stats.unwrap();
    let a = &stats.per_column[0];
    assert_eq!(a[dataset::STAT_COUNT], 2.0);
    assert_eq!(a[dataset::STAT_MIN], 1.0);
    assert_eq!(a[dataset::STAT_MAX], 3.0);
    assert_eq!(a[dataset::STAT_MEAN], 2.0);
    assert_eq!(a[dataset::STAT_MEDIAN], 2.0);
}

#[tokio::test]
async fn invalid_row_non_strict_finalizes_with_nonzero_err_count() {
    let body = "a,b\n1,2\nx,y\n";
    let dataset = run_pipeline(body, int_schema(), false).await.unwrap();
    let structure = dataset.structure.unwrap();
    assert_eq!(structure.entries, 2);
    assert!(structure.err_count >= 1);
}

#[tokio::test]
async fn invalid_row_strict_fails_without_finalizing() {
    let body = "a,b\n1,2\nx,y\n";
    let err = run_pipeline(body, int_schema(), true).await.unwrap_err();
    assert!(matches!(err, ingest::IngestError::StrictValidation(_)));
}

#[tokio::test]
async fn small_body_is_inlined_and_large_body_is_too_big() {
    let body = "a,b\n1,2\n3,4\n";
    let dataset = run_pipeline(body, int_schema(), false).await.unwrap();
    assert!(matches!(dataset.body, dataset::Body::Inline(_)));

    let schema = serde_json::json!({
        "type": "object",
        "properties": {"a": {"type": "string"}},
        "required": ["a"],
    });
    let mut big = "a\n".to_string();
    let row = "x".repeat(64);
    while big.len() < 2 * ingest::DEFAULT_DIFF_THRESHOLD as usize {
        big.push_str(&row);
        big.push('\n');
    }
    let big: &'static str = Box::leak(big.into_boxed_str());
    let dataset = run_pipeline(big, schema, false).await.unwrap();
    assert!(matches!(dataset.body, dataset::Body::Absent));
}

#[tokio::test]
async fn missing_body_without_previous_is_an_error() {
    let structure = Structure::new(Format::Csv, int_schema(), false);
    let draft = Dataset::new(structure);
    let clock = FixedClock::new(Utc.timestamp_opt(0, 0).unwrap());
    let err = ComputeFieldsPipeline::new(
        draft,
        None,
        false,
        Cursor::new(&b""[..]),
        blank_commit(),
        &clock,
        SaveSwitches::default(),
        CancellationToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, ingest::IngestError::MissingBody));
}

#[tokio::test]
async fn body_absent_but_previous_present_copies_structure_without_recompute() {
    let mut previous = Dataset::new(Structure::new(Format::Csv, int_schema(), false));
    previous.structure.as_mut().unwrap().entries = 7;
    previous.structure.as_mut().unwrap().depth = 3;
    previous.structure.as_mut().unwrap().length = 99;
    previous.body = dataset::Body::Inline(vec![serde_json::json!({"a": 1, "b": 2})]);

    let draft = Dataset::new(Structure::new(Format::Csv, int_schema(), false));
    let clock = FixedClock::new(Utc.timestamp_opt(0, 0).unwrap());
    let pipeline = ComputeFieldsPipeline::new(
        draft,
        Some(previous),
        false,
        Cursor::new(&b"a,b\n1,2\n"[..]),
        blank_commit(),
        &clock,
        SaveSwitches::default(),
        CancellationToken::new(),
    )
    .unwrap();
    let mut pipeline = pipeline;
    tokio::io::copy(&mut pipeline, &mut tokio::io::sink()).await.unwrap();
    let dataset = pipeline.finish().await.unwrap();
    let structure = dataset.structure.unwrap();
    assert_eq!(structure.entries, 7);
    assert_eq!(structure.depth, 3);
    assert_eq!(structure.length, 99);
    assert!(matches!(dataset.body, dataset::Body::Inline(_)));
}

#[tokio::test]
async fn previous_path_is_linked_unless_drop_prev_commit_is_set() {
    let mut previous = Dataset::new(Structure::new(Format::Csv, int_schema(), false));
    previous.path = Path::new("QmPrev");

    let draft = Dataset::new(Structure::new(Format::Csv, int_schema(), false));
    let clock = FixedClock::new(Utc.timestamp_opt(0, 0).unwrap());
    let pipeline = ComputeFieldsPipeline::new(
        draft,
        Some(previous.clone()),
        true,
        Cursor::new(&b"a,b\n1,2\n"[..]),
        blank_commit(),
        &clock,
        SaveSwitches::default(),
        CancellationToken::new(),
    )
    .unwrap();
    let mut pipeline = pipeline;
    tokio::io::copy(&mut pipeline, &mut tokio::io::sink()).await.unwrap();
    let dataset = pipeline.finish().await.unwrap();
    assert_eq!(dataset.previous_path, Some(Path::new("QmPrev")));

    let draft = Dataset::new(Structure::new(Format::Csv, int_schema(), false));
    let pipeline = ComputeFieldsPipeline::new(
        draft,
        Some(previous),
        true,
        Cursor::new(&b"a,b\n1,2\n"[..]),
        blank_commit(),
        &clock,
        SaveSwitches {
            drop_prev_commit: true,
            ..SaveSwitches::default()
        },
        CancellationToken::new(),
    )
    .unwrap();
    let mut pipeline = pipeline;
    tokio::io::copy(&mut pipeline, &mut tokio::io::sink()).await.unwrap();
    let dataset = pipeline.finish().await.unwrap();
    assert_eq!(dataset.previous_path, None);
}

#[tokio::test]
async fn replace_body_rejects_falling_back_to_previous_body() {
    let mut previous = Dataset::new(Structure::new(Format::Csv, int_schema(), false));
    previous.body = dataset::Body::Inline(vec![serde_json::json!({"a": 1, "b": 2})]);

    let draft = Dataset::new(Structure::new(Format::Csv, int_schema(), false));
    let clock = FixedClock::new(Utc.timestamp_opt(0, 0).unwrap());
    let err = ComputeFieldsPipeline::new(
        draft,
        Some(previous),
        false,
        Cursor::new(&b""[..]),
        blank_commit(),
        &clock,
        SaveSwitches {
            replace_body: true,
            ..SaveSwitches::default()
        },
        CancellationToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, ingest::IngestError::MissingBody));
}

#[tokio::test]
async fn cancellation_surfaces_as_cancelled_error() {
    let structure = Structure::new(Format::Csv, int_schema(), false);
    let draft = Dataset::new(structure);
    let clock = FixedClock::new(Utc.timestamp_opt(0, 0).unwrap());
    let token = CancellationToken::new();
    token.cancel();

    let pipeline = ComputeFieldsPipeline::new(
        draft,
        None,
        true,
        Cursor::new(&b"a,b\n1,2\n"[..]),
        blank_commit(),
        &clock,
        SaveSwitches::default(),
        token,
    )
    .unwrap();
    let mut pipeline = pipeline;
    let result = tokio::io::copy(&mut pipeline, &mut tokio::io::sink()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn body_action_reports_too_big_after_threshold_crossed() {
    let schema = serde_json::json!({
        "type": "object",
        "properties": {"a": {"type": "string"}},
        "required": ["a"],
    });
    let mut big = "a\n".to_string();
    let row = "x".repeat(64);
    while big.len() < 2 * ingest::DEFAULT_DIFF_THRESHOLD as usize {
        big.push_str(&row);
        big.push('\n');
    }
    let structure = Structure::new(Format::Csv, schema, false);
    let draft = Dataset::new(structure);
    let clock = FixedClock::new(Utc.timestamp_opt(0, 0).unwrap());
    let pipeline = ComputeFieldsPipeline::new(
        draft,
        None,
        true,
        Cursor::new(big.into_bytes()),
        blank_commit(),
        &clock,
        SaveSwitches::default(),
        CancellationToken::new(),
    )
    .unwrap();
    let mut pipeline = pipeline;
    tokio::io::copy(&mut pipeline, &mut tokio::io::sink()).await.unwrap();
    let dataset = pipeline.finish().await.unwrap();
    assert!(matches!(dataset.body, dataset::Body::Absent));
}

use chrono::{TimeZone, Utc};
use dataset::{Commit, Dataset, FixedClock, Format, Path, Structure};
use ingest::{ComputeFieldsPipeline, SaveSwitches};
use proptest::prelude::*;
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

fn rows_to_csv(rows: &[(i64, i64)]) -> String {
    let mut body = "a,b\n".to_string();
    for (a, b) in rows {
        body.push_str(&format!("{},{}\n", a, b));
    }
    body
}

async fn ingest_and_collect_tee(body: String) -> (Dataset, Vec<u8>) {
    let structure = Structure::new(Format::Csv, int_schema(), false);
    let draft = Dataset::new(structure);
    let clock = FixedClock::new(Utc.timestamp_opt(0, 0).unwrap());
    let body_bytes = body.clone().into_bytes();

    let pipeline = ComputeFieldsPipeline::new(
        draft,
        None,
        true,
        Cursor::new(body_bytes),
        blank_commit(),
        &clock,
        SaveSwitches::default(),
        CancellationToken::new(),
    )
    .unwrap();

    let mut pipeline = pipeline;
    let mut observed = Vec::new();
    tokio::io::copy(&mut pipeline, &mut observed).await.unwrap();
    let dataset = pipeline.finish().await.unwrap();
    (dataset, observed)
}

proptest! {
    /// Tee-faithfulness (spec.md §8): the bytes observed by the caller via
    /// `read()` equal, in order and content, the bytes the underlying
    /// reader produced.
    #[test]
    fn tee_faithfulness(rows in prop::collection::vec((0i64..1000, 0i64..1000), 0..50)) {
        let body = rows_to_csv(&rows);
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (_dataset, observed) = runtime.block_on(ingest_and_collect_tee(body.clone()));
        prop_assert_eq!(observed, body.into_bytes());
    }

    /// Idempotence (spec.md §8): re-running the pipeline on the identical
    /// body yields identical Structure.{entries,depth,length,errCount} and
    /// an identical accumulator snapshot.
    #[test]
    fn idempotence(rows in prop::collection::vec((0i64..1000, 0i64..1000), 1..50)) {
        let body = rows_to_csv(&rows);
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (first, _) = runtime.block_on(ingest_and_collect_tee(body.clone()));
        let (second, _) = runtime.block_on(ingest_and_collect_tee(body));

        let fs = first.structure.unwrap();
        let ss = second.structure.unwrap();
        prop_assert_eq!(fs.entries, ss.entries);
        prop_assert_eq!(fs.depth, ss.depth);
        prop_assert_eq!(fs.length, ss.length);
        prop_assert_eq!(fs.err_count, ss.err_count);

        let first_snapshot = serde_json::to_string(&first.stats.unwrap().per_column).unwrap();
        let second_snapshot = serde_json::to_string(&second.stats.unwrap().per_column).unwrap();
        prop_assert_eq!(first_snapshot, second_snapshot);
    }
}

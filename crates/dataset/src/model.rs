use crate::column::ColumnStats;
use crate::path::Path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The body format this core knows how to decode. `Xlsx` is carried as a
/// named variant so the type stays total, but has no decoder in this core
/// (spec.md §4.1: "XLSX-like" is out of scope here) — attempting to
/// construct a pipeline over it fails with `DecodeError::UnsupportedFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Json,
    Jsonl,
    Xlsx,
}

/// `Commit {path, title, message, timestamp, signature?}` (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Commit {
    pub path: Path,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub signature: Option<String>,
}

/// `Meta {path, arbitrary key-values}` with an `is_empty` predicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Meta {
    pub path: Path,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl Meta {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `Readme {path, scriptBytes}`. Script bytes are opaque text, compared by
/// exact byte equality for change classification (spec.md §4.7).
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Readme {
    pub path: Path,
    pub script_bytes: String,
}

/// `Structure {path, format, schema, entries, depth, errCount, length,
/// strict}` (spec.md §3). `entries`, `depth`, `length`, and `err_count` are
/// always derived from the body by the Compute-Fields Pipeline; nothing in
/// this core writes them outside of `ingest::ComputeFieldsPipeline`'s
/// finalization step.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Structure {
    pub path: Path,
    pub format: Format,
    pub schema: Value,
    pub entries: usize,
    pub depth: usize,
    pub err_count: usize,
    pub length: usize,
    pub strict: bool,
}

impl Structure {
    /// A Structure with a schema/format set but all derived fields at
    /// their zero value, ready to be handed to a Compute-Fields Pipeline.
    pub fn new(format: Format, schema: Value, strict: bool) -> Self {
        Structure {
            path: Path::default(),
            format,
            schema,
            entries: 0,
            depth: 0,
            err_count: 0,
            length: 0,
            strict,
        }
    }
}

/// `Transform {path, scriptBytes, secrets?}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Transform {
    pub path: Path,
    pub script_bytes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<BTreeMap<String, String>>,
}

/// `Stats {path, perColumn: ordered sequence of stat maps}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Stats {
    pub path: Path,
    pub per_column: Vec<ColumnStats>,
}

/// The dataset body: either absent, or the decoded entry sequence inlined
/// because the body was small enough to diff (spec.md §4.5 "Diff buffer").
/// The raw byte stream itself is never stored on `Dataset` — it is borrowed
/// by the ingestion pipeline and owned by the `Filesystem` collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    #[default]
    Absent,
    Inline(Vec<Value>),
}

impl Body {
    pub fn as_entries(&self) -> Option<&[Value]> {
        match self {
            Body::Absent => None,
            Body::Inline(entries) => Some(entries),
        }
    }
}

/// A composite dataset document (spec.md §3). Every sub-component is
/// content-addressed by its own `Path`; the Dataset's own `Path` changes
/// iff the content of any sub-component changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Dataset {
    pub path: Path,
    pub previous_path: Option<Path>,
    pub commit: Option<Commit>,
    pub meta: Option<Meta>,
    pub readme: Option<Readme>,
    pub structure: Option<Structure>,
    pub transform: Option<Transform>,
    pub stats: Option<Stats>,
    pub body: Body,
}

impl Dataset {
    pub fn new(structure: Structure) -> Self {
        Dataset {
            structure: Some(structure),
            ..Default::default()
        }
    }
}

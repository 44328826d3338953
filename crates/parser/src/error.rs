use thiserror::Error;

/// Errors the Entry Codec can produce while decoding a body stream
/// (spec.md §7). A `DecodeError` carries the row index it occurred at so
/// callers can report which row failed.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("row {0}: failed to decode: {1}")]
    Row(usize, String),

    #[error("row {0}: value {1:?} could not be parsed as a column of declared type")]
    InvalidColumnValue(usize, String),

    #[error("row {row} has {found} columns, but the header only defines {expected}")]
    ExtraColumn {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("body format has no decoder in this core: {0:?}")]
    UnsupportedFormat(dataset::Format),

    #[error("io error while reading body: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

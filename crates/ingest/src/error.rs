use thiserror::Error;

/// Error taxonomy for the Compute-Fields Pipeline (spec.md §7). Streaming
/// errors are delivered once on the completion channel and are then sticky
/// — subsequent reads surface the same stored error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IngestError {
    #[error("dataset has no body and no previous version to copy one from")]
    MissingBody,

    #[error("row {0}: failed to decode")]
    Decode(usize),

    #[error("schema failed to compile: {0}")]
    SchemaCompile(String),

    #[error("{0} row(s) failed validation under strict mode")]
    StrictValidation(usize),

    #[error("failed to allocate batch or diff buffer")]
    BufferAlloc,

    #[error("stats accumulator failed to finalize")]
    StatsFinalize,

    #[error("ingestion was cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err.to_string())
    }
}

impl From<parser::DecodeError> for IngestError {
    fn from(err: parser::DecodeError) -> Self {
        match err {
            parser::DecodeError::Row(row, _) | parser::DecodeError::InvalidColumnValue(row, _) => {
                IngestError::Decode(row)
            }
            other => IngestError::Io(other.to_string()),
        }
    }
}

impl From<schema::SchemaError> for IngestError {
    fn from(err: schema::SchemaError) -> Self {
        IngestError::SchemaCompile(err.to_string())
    }
}

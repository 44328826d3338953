use thiserror::Error;

/// Errors that can occur while compiling a schema document into a
/// `CompiledSchema`. These are always returned synchronously, at pipeline
/// construction time, never per-row.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema root must be a JSON object, found: {0}")]
    NotAnObject(&'static str),

    #[error("unsupported schema keyword: {0}")]
    UnsupportedKeyword(String),

    #[error("'type' keyword has unrecognized value: {0}")]
    UnrecognizedType(String),

    #[error("'required' entries must be strings")]
    InvalidRequired,

    #[error("'properties' must be a JSON object")]
    InvalidProperties,
}

use dataset::LoaderError;
use thiserror::Error;

/// Errors the Change Report Service can raise (spec.md §7). A report
/// either succeeds in full or fails outright — no partial report is ever
/// returned.
#[derive(Debug, Error)]
pub enum ChangeReportError {
    #[error("required stat key was missing for column {0}")]
    MissingStats(String),

    #[error("column {0} has incompatible types between left and right")]
    IncompatibleColumnTypes(String),

    #[error(transparent)]
    Loader(#[from] LoaderError),
}

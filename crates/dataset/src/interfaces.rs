use crate::dsref::{DatasetRef, LoadSource};
use crate::model::{Dataset, Stats};
use crate::path::Path;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Errors surfaced by the `Filesystem` collaborator.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("no blob found at path: {0}")]
    NotFound(Path),
    #[error("filesystem io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by `Loader` and `StatsService`. These are passed through
/// verbatim as `IngestError::Loader` / `ChangeReportError::Loader`
/// (spec.md §7: "LoaderError — underlying Loader failure (passed
/// through)").
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("dataset not found: {0}")]
    NotFound(DatasetRef),
    #[error("stats unavailable for dataset at {0}")]
    StatsUnavailable(Path),
    #[error(transparent)]
    Fs(#[from] FsError),
}

/// A content-addressed blob store (spec.md §6). The core only ever `get`s
/// the previous body during pipeline construction, and exposes its own
/// pipeline as a readable blob for the caller to `put`.
#[async_trait::async_trait]
pub trait Filesystem: Send + Sync {
    async fn get(&self, path: &Path) -> Result<Box<dyn AsyncRead + Send + Unpin>, FsError>;
    async fn put(
        &self,
        reader: Box<dyn AsyncRead + Send + Unpin>,
    ) -> Result<Path, FsError>;
}

/// Resolves a dataset reference to a materialized `Dataset` (spec.md §6).
#[async_trait::async_trait]
pub trait Loader: Send + Sync {
    async fn load_dataset(
        &self,
        ref_: &DatasetRef,
        source: LoadSource,
    ) -> Result<Dataset, LoaderError>;
}

/// Computes `Stats` for a dataset on demand (spec.md §6), used by the
/// Change Report Service when a side's `Stats` component is absent.
#[async_trait::async_trait]
pub trait StatsService: Send + Sync {
    async fn stats(&self, ds: &Dataset) -> Result<Stats, LoaderError>;
}

/// A source of the current time, abstracted so commit timestamps are
/// reproducible in tests (spec.md §6: "now() -> timestamp").
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The ambient production `Clock`, backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A `Clock` double for tests: always returns the same instant unless
/// advanced.
#[derive(Debug, Clone)]
pub struct FixedClock(Arc<std::sync::Mutex<DateTime<Utc>>>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        FixedClock(Arc::new(std::sync::Mutex::new(at)))
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut guard = self.0.lock().unwrap();
        *guard = *guard + duration;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

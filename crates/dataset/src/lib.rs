//! The shared data model (spec.md §3) for the dataset ingestion and
//! change-reporting core, plus the external collaborator traits (§6) both
//! subsystems depend on, and the pure Depth Probe (§4.4).

mod column;
mod depth;
mod dsref;
mod interfaces;
mod model;
mod path;

pub use column::{columns_of, Column, ColumnStats};
pub use column::{
    STAT_COUNT, STAT_FALSE_COUNT, STAT_MAX, STAT_MAX_LENGTH, STAT_MEAN, STAT_MEDIAN, STAT_MIN,
    STAT_MIN_LENGTH, STAT_TRUE_COUNT, STAT_UNIQUE,
};
pub use depth::depth_of;
pub use dsref::{DatasetRef, LoadSource, RefParseError};
pub use interfaces::{Clock, FixedClock, Filesystem, FsError, Loader, LoaderError, StatsService, SystemClock};
pub use model::{Body, Commit, Dataset, Format, Meta, Readme, Stats, Structure, Transform};
pub use path::Path;

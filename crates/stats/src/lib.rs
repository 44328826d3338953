//! The Stats Accumulator (spec.md §4.3): an online, single-pass
//! per-column statistics accumulator parameterized by a schema's column
//! list.

mod accumulator;
mod column;
mod error;

pub use accumulator::Accumulator;
pub use error::StatsError;

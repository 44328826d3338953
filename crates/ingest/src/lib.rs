//! The Compute-Fields Pipeline (spec.md §4.5): the central concurrency
//! object that streams a dataset body through the Entry Codec, Schema
//! Validator, Stats Accumulator, and Depth Probe, finalizing the draft
//! Dataset's derived fields on EOF.

mod error;
mod pipeline;
mod state;
mod switches;

pub use error::IngestError;
pub use pipeline::{ComputeFieldsPipeline, DEFAULT_DIFF_THRESHOLD};
pub use state::Phase;
pub use switches::{BodyAction, SaveSwitches};

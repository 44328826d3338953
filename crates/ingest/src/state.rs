use crate::error::IngestError;
use dataset::Dataset;
use std::sync::{Arc, Mutex};

/// The pipeline's lifecycle (spec.md §4.5 "State machine"):
/// `Init → Streaming → Draining → Finalized | Failed`. `Finalized` and
/// `Failed` are terminal; both deliver exactly one message on the
/// completion channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Init,
    Streaming,
    Draining,
    Finalized,
    Failed(IngestError),
}

/// The draft Dataset, behind a single lock (spec.md §5: "A single lock
/// protects the draft Dataset's mutable fields"). Both the caller's reader
/// and the background decoder acquire this same lock, and never hold it
/// across a pipe read or write.
///
/// `bytesRead` is the one field from §5's list that is tracked outside
/// this lock: it's a single monotonically increasing counter with no
/// structural invariant tying it to Structure/Commit/Body, so it's kept as
/// a lock-free `AtomicU64` shared between the tee reader and the
/// finalization step instead of taking this lock on every `poll_read`.
pub(crate) struct DraftState {
    pub dataset: Dataset,
}

/// Shared, cloneable handle to the pipeline's current phase.
#[derive(Clone)]
pub struct PhaseHandle(Arc<Mutex<Phase>>);

impl PhaseHandle {
    pub(crate) fn new() -> Self {
        PhaseHandle(Arc::new(Mutex::new(Phase::Init)))
    }

    pub(crate) fn set(&self, phase: Phase) {
        *self.0.lock().unwrap() = phase;
    }

    pub fn get(&self) -> Phase {
        self.0.lock().unwrap().clone()
    }
}

use thiserror::Error;

/// Errors the Stats Accumulator can raise. Reading a snapshot before
/// `close()` is a caller bug, not a decode-time failure, so it is carried
/// as its own variant rather than folded into the Entry Codec's errors.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("snapshot requested before close()")]
    NotClosed,
}

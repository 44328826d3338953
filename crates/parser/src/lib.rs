//! The Entry Codec (spec.md §4.1): streaming decoders from raw body bytes
//! to a lazy sequence of `Entry` values, a canonical-JSON encoder for the
//! reverse direction, and the `each_entry` walk helper.

mod each_entry;
mod encode;
mod entry;
mod error;
mod format;

pub use each_entry::each_entry;
pub use encode::encode;
pub use entry::Entry;
pub use error::DecodeError;
pub use format::decode;

mod csv;
mod json;

use crate::entry::Entry;
use crate::error::DecodeError;
use dataset::{Column, Format};
use std::io::Read;

/// Dispatches to the Entry Codec for `format` (spec.md §4.1). `columns`
/// drives schema-aware decoding for formats that support it (currently
/// `Csv`); formats without a decoder in this core (`Xlsx`) fail immediately
/// rather than silently falling back to a different shape.
pub fn decode(
    format: Format,
    columns: &[Column],
    reader: impl Read + Send + 'static,
) -> Result<Box<dyn Iterator<Item = Result<Entry, DecodeError>> + Send>, DecodeError> {
    match format {
        Format::Csv => Ok(Box::new(csv::decode(columns, reader)?)),
        Format::Json => Ok(Box::new(json::decode(reader)?)),
        Format::Jsonl => Ok(Box::new(json::decode_lines(reader))),
        Format::Xlsx => Err(DecodeError::UnsupportedFormat(format)),
    }
}

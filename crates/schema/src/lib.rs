//! A compiler and validator for the subset of JSON Schema this core uses to
//! describe and validate tabular dataset rows: `type`, object
//! `properties`/`required`, and array `items`. Full JSON Schema (draft
//! 2019/2020, `$ref`, combinators, formats, ...) is deliberately out of
//! scope — see `SchemaError::UnsupportedKeyword`.

mod compiled;
mod error;
mod number;
pub mod types;
mod validate;

pub use compiled::CompiledSchema;
pub use error::SchemaError;
pub use number::Number;
pub use validate::validate_batch;

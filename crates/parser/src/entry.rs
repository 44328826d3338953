use serde_json::Value;

/// One decoded logical row of a dataset body (spec.md §4.1). `key` is
/// populated when the body's top-level shape is a JSON object of keyed
/// entries rather than an array or a headered table; `index` is the
/// zero-based position in decode order regardless of shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub index: usize,
    pub key: Option<String>,
    pub value: Value,
}

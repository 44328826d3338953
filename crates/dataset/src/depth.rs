use serde_json::Value;

/// The maximum structural nesting depth of a decoded value (spec.md §4.4):
/// scalars are depth 0; arrays/objects are `1 + max(child depth)`; empty
/// arrays/objects are depth 1. The pipeline adds one more to account for
/// the outer enclosure (spec.md §3: "`depth` is the maximum depth of any
/// decoded entry plus one").
pub fn depth_of(value: &Value) -> usize {
    match value {
        Value::Object(map) => 1 + map.values().map(depth_of).max().unwrap_or(0),
        Value::Array(items) => 1 + items.iter().map(depth_of).max().unwrap_or(0),
        _ => 0,
    }
}

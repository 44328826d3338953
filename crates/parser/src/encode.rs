use crate::entry::Entry;
use serde_json::Value;

/// Encodes an entry sequence into a canonical JSON body: a JSON array if no
/// entry carries a key, an object of keyed entries otherwise (spec.md
/// §4.1: "encode an entry sequence into a canonical JSON body used only as
/// a batch intermediate"). Mixed keyed/unkeyed entries fall back to the
/// array form, using each entry's index as its position.
pub fn encode(entries: &[Entry]) -> Value {
    if entries.iter().all(|e| e.key.is_some()) && !entries.is_empty() {
        let map = entries
            .iter()
            .map(|e| (e.key.clone().unwrap(), e.value.clone()))
            .collect();
        Value::Object(map)
    } else {
        Value::Array(entries.iter().map(|e| e.value.clone()).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encodes_unkeyed_entries_as_array() {
        let entries = vec![
            Entry { index: 0, key: None, value: serde_json::json!(1) },
            Entry { index: 1, key: None, value: serde_json::json!(2) },
        ];
        assert_eq!(encode(&entries), serde_json::json!([1, 2]));
    }

    #[test]
    fn encodes_keyed_entries_as_object() {
        let entries = vec![
            Entry { index: 0, key: Some("x".into()), value: serde_json::json!(1) },
            Entry { index: 1, key: Some("y".into()), value: serde_json::json!(2) },
        ];
        assert_eq!(encode(&entries), serde_json::json!({"x": 1, "y": 2}));
    }

    #[test]
    fn empty_sequence_encodes_as_empty_array() {
        assert_eq!(encode(&[]), serde_json::json!([]));
    }
}

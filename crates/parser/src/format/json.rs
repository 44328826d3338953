use crate::entry::Entry;
use crate::error::DecodeError;
use serde_json::Value;
use std::io::Read;

/// Decodes a `Format::Json` body: a single top-level JSON document, either
/// an array of entries or an object of keyed entries. Unlike `jsonl`, this
/// is fully buffered — the whole document must be parsed before the shape
/// (array vs. object) is known.
pub fn decode(
    reader: impl Read,
) -> Result<impl Iterator<Item = Result<Entry, DecodeError>>, DecodeError> {
    let value: Value = serde_json::from_reader(reader)?;
    let entries = match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, value)| Ok(Entry { index, key: None, value }))
            .collect::<Vec<_>>(),
        Value::Object(map) => map
            .into_iter()
            .enumerate()
            .map(|(index, (key, value))| Ok(Entry { index, key: Some(key), value }))
            .collect::<Vec<_>>(),
        other => vec![Err(DecodeError::Row(
            0,
            format!("top-level JSON value must be an array or object, found: {other}"),
        ))],
    };
    Ok(entries.into_iter())
}

/// Decodes a `Format::Jsonl` body: any stream of whitespace-separated JSON
/// values. Accepts any amount of whitespace, including newlines, within and
/// between records (mirrors the teacher parser's json format). This is a
/// true single-pass stream — records are yielded as they're parsed, rather
/// than buffering the whole body like `decode` above does for `Json`.
pub fn decode_lines(
    reader: impl Read,
) -> impl Iterator<Item = Result<Entry, DecodeError>> {
    let stream = serde_json::Deserializer::from_reader(reader).into_iter::<Value>();
    stream.enumerate().map(|(index, result)| {
        let value = result?;
        Ok(Entry { index, key: None, value })
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn decodes_array_of_entries() {
        let body = r#"[{"a":1},{"a":2}]"#;
        let entries: Vec<_> = decode(Cursor::new(body.as_bytes()))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, None);
        assert_eq!(entries[1].value, serde_json::json!({"a": 2}));
    }

    #[test]
    fn decodes_object_of_keyed_entries() {
        let body = r#"{"x": {"a":1}, "y": {"a":2}}"#;
        let entries: Vec<_> = decode(Cursor::new(body.as_bytes()))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key.as_deref(), Some("x"));
        assert_eq!(entries[1].key.as_deref(), Some("y"));
    }

    #[test]
    fn rejects_scalar_top_level_value() {
        let body = "42";
        let entries: Vec<_> = decode(Cursor::new(body.as_bytes())).unwrap().collect();
        assert!(entries[0].is_err());
    }

    #[test]
    fn streams_whitespace_separated_values() {
        let body = "{\"a\":1}\n\n  {\"a\":2}\t{\"a\":3}";
        let entries: Vec<_> = decode_lines(Cursor::new(body.as_bytes()))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].value, serde_json::json!({"a": 3}));
    }

    #[test]
    fn stops_at_first_malformed_value() {
        let body = "{\"a\":1}\n{not json}";
        let entries: Vec<_> = decode_lines(Cursor::new(body.as_bytes())).collect();
        assert!(entries[0].is_ok());
        assert!(entries[1].is_err());
    }
}

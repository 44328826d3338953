use dataset::{Column, Format};
use schema::types;
use std::io::Cursor;

#[test]
fn csv_round_trips_through_decode_and_encode() {
    let columns = vec![
        Column::new("id", types::INTEGER),
        Column::new("name", types::STRING),
    ];
    let body = "id,name\n1,alice\n2,bob\n";
    let decoded = parser::decode(Format::Csv, &columns, Cursor::new(body.as_bytes())).unwrap();
    let entries: Vec<_> = decoded.collect::<Result<_, _>>().unwrap();
    assert_eq!(entries.len(), 2);

    let encoded = parser::encode(&entries);
    assert_eq!(
        encoded,
        serde_json::json!([{"id": 1, "name": "alice"}, {"id": 2, "name": "bob"}])
    );
}

#[test]
fn jsonl_stream_visits_entries_in_order_via_each_entry() {
    let body = "{\"a\":1}\n{\"a\":2}\n{\"a\":3}\n";
    let decoded = parser::decode(Format::Jsonl, &[], Cursor::new(body.as_bytes())).unwrap();

    let mut seen = Vec::new();
    parser::each_entry(decoded, |entry| {
        seen.push(entry.value["a"].as_i64().unwrap());
        Ok(())
    })
    .unwrap();
    assert_eq!(seen, vec![1, 2, 3]);
}

#[test]
fn each_entry_stops_at_first_malformed_jsonl_record() {
    let body = "{\"a\":1}\n{not json}\n{\"a\":3}\n";
    let decoded = parser::decode(Format::Jsonl, &[], Cursor::new(body.as_bytes())).unwrap();

    let mut seen = Vec::new();
    let result = parser::each_entry(decoded, |entry| {
        seen.push(entry.index);
        Ok(())
    });
    assert!(result.is_err());
    assert_eq!(seen, vec![0]);
}

#[test]
fn xlsx_format_is_rejected_without_a_decoder() {
    let err = parser::decode(Format::Xlsx, &[], Cursor::new(&b""[..])).unwrap_err();
    assert!(matches!(err, parser::DecodeError::UnsupportedFormat(f) if f == Format::Xlsx));
}

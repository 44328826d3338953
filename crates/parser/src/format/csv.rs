use crate::entry::Entry;
use crate::error::DecodeError;
use dataset::Column;
use schema::types;
use serde_json::{Map, Value};
use std::io::Read;

const NULL_SENTINELS: &[&str] = &["", "NULL", "null", "nil"];

/// Parses `candidate_type`-ordered attempts so that, e.g., a column that
/// allows both null and string ends up null when the cell matches a null
/// sentinel (mirrors the teacher parser's `PARSE_ORDER`).
fn parse_cell(value: &str, type_set: types::Set) -> Value {
    if type_set.overlaps(types::NULL) && NULL_SENTINELS.contains(&value) {
        return Value::Null;
    }
    if type_set.overlaps(types::INTEGER) {
        if let Ok(n) = value.parse::<i64>() {
            return Value::Number(n.into());
        }
    }
    if type_set.overlaps(types::FRACTIONAL) {
        if let Ok(n) = value.parse::<f64>() {
            if let Some(n) = serde_json::Number::from_f64(n) {
                return Value::Number(n);
            }
        }
    }
    if type_set.overlaps(types::BOOLEAN) {
        if let Ok(b) = value.parse::<bool>() {
            return Value::Bool(b);
        }
    }
    Value::String(value.to_string())
}

/// Decodes a CSV body into a sequence of entries, one object per row keyed
/// by header column name. When `columns` is non-empty, headers and typed
/// coercion come from the schema (spec.md §4.1: "CSV emits rows as arrays
/// or as objects keyed by header columns if the schema supplies them");
/// otherwise headers are read from the CSV's own first row and every cell
/// decodes as a nullable string.
pub fn decode(
    columns: &[Column],
    reader: impl Read + Send + 'static,
) -> Result<impl Iterator<Item = Result<Entry, DecodeError>>, DecodeError> {
    let mut builder = csv::ReaderBuilder::new();
    builder.flexible(true);

    let (headers, has_header_row) = if columns.is_empty() {
        (Vec::new(), true)
    } else {
        (
            columns
                .iter()
                .map(|c| (c.title.clone(), c.type_set | types::NULL))
                .collect::<Vec<_>>(),
            false,
        )
    };
    builder.has_headers(has_header_row);

    let boxed: Box<dyn Read + Send> = Box::new(reader);
    let mut csv_reader = builder.from_reader(boxed);
    let headers = if headers.is_empty() {
        csv_reader
            .headers()?
            .iter()
            .map(|h| (h.to_string(), types::STRING | types::NULL))
            .collect::<Vec<_>>()
    } else {
        headers
    };
    tracing::debug!(n_columns = headers.len(), "resolved CSV headers");

    Ok(CsvEntries {
        reader: csv_reader,
        headers,
        row: csv::StringRecord::new(),
        index: 0,
    })
}

struct CsvEntries {
    reader: csv::Reader<Box<dyn Read + Send>>,
    headers: Vec<(String, types::Set)>,
    row: csv::StringRecord,
    index: usize,
}

impl Iterator for CsvEntries {
    type Item = Result<Entry, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Err(err) => Some(Err(err.into())),
            Ok(true) => {
                if self.row.len() > self.headers.len() {
                    return Some(Err(DecodeError::ExtraColumn {
                        row: self.index,
                        found: self.row.len(),
                        expected: self.headers.len(),
                    }));
                }
                let mut obj = Map::with_capacity(self.headers.len());
                for (cell, (name, type_set)) in self.row.iter().zip(self.headers.iter()) {
                    obj.insert(name.clone(), parse_cell(cell, *type_set));
                }
                let entry = Entry {
                    index: self.index,
                    key: None,
                    value: Value::Object(obj),
                };
                self.index += 1;
                Some(Ok(entry))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use dataset::Column;
    use schema::types;
    use std::io::Cursor;

    fn int_column(name: &str) -> Column {
        Column::new(name, types::INTEGER)
    }

    #[test]
    fn decodes_typed_rows_with_schema_headers() {
        let body = "a,b\n1,2\n3,4\n";
        let columns = vec![int_column("a"), int_column("b")];
        let entries: Vec<_> = decode(&columns, Cursor::new(body.as_bytes()))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, serde_json::json!({"a": 1, "b": 2}));
        assert_eq!(entries[1].value, serde_json::json!({"a": 3, "b": 4}));
    }

    #[test]
    fn falls_back_to_string_columns_without_schema() {
        let body = "a,b\nx,y\n";
        let entries: Vec<_> = decode(&[], Cursor::new(body.as_bytes()))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries[0].value, serde_json::json!({"a": "x", "b": "y"}));
    }

    #[test]
    fn null_sentinels_become_null_when_column_is_nullable() {
        let body = "a\n\nNULL\nnil\n";
        let columns = vec![Column::new("a", types::STRING | types::NULL)];
        let entries: Vec<_> = decode(&columns, Cursor::new(body.as_bytes()))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        for e in entries {
            assert_eq!(e.value, serde_json::json!({"a": null}));
        }
    }

    #[test]
    fn extra_column_in_a_row_is_an_error() {
        let body = "a,b\n1,2,3\n";
        let columns = vec![int_column("a"), int_column("b")];
        let mut iter = decode(&columns, Cursor::new(body.as_bytes())).unwrap();
        assert!(iter.next().unwrap().is_err());
    }
}

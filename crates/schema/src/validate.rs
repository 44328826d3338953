use crate::compiled::{CompiledSchema, Node};
use crate::types::Set;
use serde_json::Value;

/// Validates a batch document (a JSON array of already-assembled rows)
/// against a compiled schema, returning the total number of validation
/// errors found across the batch. Never fails outright — callers in strict
/// mode convert a nonzero count into a fatal error themselves.
pub fn validate_batch(schema: &CompiledSchema, batch: &Value) -> usize {
    let rows = match batch.as_array() {
        Some(rows) => rows,
        None => return 1, // a malformed batch document is itself one error
    };
    rows.iter().map(|row| validate_node(&schema.root, row)).sum()
}

fn validate_node(node: &Node, value: &Value) -> usize {
    let mut errors = 0;

    if let Some(expected) = node.ty {
        if !expected.overlaps(Set::of(value)) {
            return errors + 1; // type mismatch makes deeper checks meaningless
        }
    }

    if !node.properties.is_empty() || !node.required.is_empty() {
        match value.as_object() {
            Some(obj) => {
                for name in &node.required {
                    if !obj.contains_key(name) {
                        errors += 1;
                    }
                }
                for (name, sub) in &node.properties {
                    if let Some(field) = obj.get(name) {
                        errors += validate_node(sub, field);
                    }
                }
            }
            None => errors += 1,
        }
    }

    if let Some(item_schema) = &node.items {
        match value.as_array() {
            Some(items) => {
                for item in items {
                    errors += validate_node(item_schema, item);
                }
            }
            None => errors += 1,
        }
    }

    errors
}

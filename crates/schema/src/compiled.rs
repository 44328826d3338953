use crate::error::SchemaError;
use crate::types::{self, Set};
use serde_json::Value;

/// Keywords this core understands. Anything else present in a schema
/// document is rejected by `compile` so that unsupported constructs fail
/// fast at pipeline initialization rather than silently passing every row.
const SUPPORTED_KEYWORDS: &[&str] = &["type", "properties", "required", "items", "$schema", "$id"];

/// A schema compiled from the JSON-Schema subset this core validates
/// against: `type`, object `properties` + `required`, and array `items`.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    pub(crate) root: Node,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
    pub ty: Option<Set>,
    pub properties: Vec<(String, Node)>,
    pub required: Vec<String>,
    pub items: Option<Box<Node>>,
}

impl CompiledSchema {
    /// Compile a schema document. Columns are reported in the order
    /// `properties` appears in the document (object key order is preserved
    /// by `serde_json`'s `preserve_order` feature), matching the spec's
    /// requirement that `Stats.perColumn` follow schema order.
    pub fn compile(schema: &Value) -> Result<CompiledSchema, SchemaError> {
        let root = compile_node(schema)?;
        Ok(CompiledSchema { root })
    }

    /// The schema's top-level object columns, in schema order, with their
    /// declared type-set. Empty if the schema does not describe an object
    /// (e.g. a bare array-of-scalars schema).
    pub fn columns(&self) -> Vec<(String, Set)> {
        self.root
            .properties
            .iter()
            .map(|(name, node)| (name.clone(), node.ty.unwrap_or(types::ANY)))
            .collect()
    }
}

fn compile_node(schema: &Value) -> Result<Node, SchemaError> {
    let obj = schema
        .as_object()
        .ok_or(SchemaError::NotAnObject(value_kind(schema)))?;

    for key in obj.keys() {
        if !SUPPORTED_KEYWORDS.contains(&key.as_str()) {
            return Err(SchemaError::UnsupportedKeyword(key.clone()));
        }
    }

    let ty = match obj.get("type") {
        None => None,
        Some(Value::String(s)) => {
            Some(types::Set::from_keyword(s).ok_or_else(|| SchemaError::UnrecognizedType(s.clone()))?)
        }
        Some(Value::Array(items)) => {
            let mut set = types::INVALID;
            for item in items {
                let name = item
                    .as_str()
                    .ok_or_else(|| SchemaError::UnrecognizedType(item.to_string()))?;
                set = set
                    | types::Set::from_keyword(name)
                        .ok_or_else(|| SchemaError::UnrecognizedType(name.to_string()))?;
            }
            Some(set)
        }
        Some(other) => return Err(SchemaError::UnrecognizedType(other.to_string())),
    };

    let properties = match obj.get("properties") {
        None => Vec::new(),
        Some(Value::Object(props)) => props
            .iter()
            .map(|(name, sub)| Ok((name.clone(), compile_node(sub)?)))
            .collect::<Result<_, SchemaError>>()?,
        Some(_) => return Err(SchemaError::InvalidProperties),
    };

    let required = match obj.get("required") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or(SchemaError::InvalidRequired))
            .collect::<Result<_, SchemaError>>()?,
        Some(_) => return Err(SchemaError::InvalidRequired),
    };

    let items = match obj.get("items") {
        None => None,
        Some(sub) => Some(Box::new(compile_node(sub)?)),
    };

    Ok(Node {
        ty,
        properties,
        required,
        items,
    })
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! User data attached to nodes and links.
//!
//! Data is a JSON object map. Re-adding a node or link deep-merges the new
//! data into the existing map instead of replacing it.

use serde_json::{Map, Value};

use super::error::GraphError;

/// Arbitrary user data.
pub type Data = Map<String, Value>;

/// Nesting depth past which merging stops recursing and replaces wholesale.
pub const MAX_MERGE_DEPTH: usize = 64;

/// Deep-merge `source` into `target`.
///
/// - Objects merge key by key, recursively.
/// - Arrays merge index by index; extra source elements are appended.
/// - Any other value overwrites the target (last writer wins).
/// - `null` in the source means "undefined" and never overwrites.
pub fn merge_data(target: &mut Data, source: Data) {
    merge_map(target, source, 0);
}

fn merge_map(target: &mut Data, source: Data, depth: usize) {
    for (key, value) in source {
        if value.is_null() {
            continue;
        }
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value, depth + 1),
            None => {
                target.insert(key, value);
            }
        }
    }
}

fn merge_value(target: &mut Value, source: Value, depth: usize) {
    if depth >= MAX_MERGE_DEPTH {
        *target = source;
        return;
    }

    match (target, source) {
        (Value::Object(target), Value::Object(source)) => merge_map(target, source, depth),
        (Value::Array(target), Value::Array(source)) => {
            for (i, value) in source.into_iter().enumerate() {
                if value.is_null() {
                    if i >= target.len() {
                        target.push(Value::Null);
                    }
                    continue;
                }
                match target.get_mut(i) {
                    Some(existing) => merge_value(existing, value, depth + 1),
                    None => target.push(value),
                }
            }
        }
        (target, source) => *target = source,
    }
}

/// Convert an arbitrary JSON value into node/link data.
///
/// `null` counts as "no data"; anything else must be an object.
pub fn data_from_value(value: Value) -> Result<Data, GraphError> {
    match value {
        Value::Null => Ok(Data::new()),
        Value::Object(map) => Ok(map),
        other => Err(GraphError::InvalidData(format!(
            "expected an object, got {other}"
        ))),
    }
}

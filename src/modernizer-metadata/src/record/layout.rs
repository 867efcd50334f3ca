//! Key order of a record as it was read from disk.

use serde_json::{Map, Value};

/// The JSON object a record was parsed from.
///
/// Only used to lay keys out again on write, so it never takes part in
/// record equality.
#[derive(Debug, Clone, Default)]
pub struct SourceLayout(Map<String, Value>);

impl SourceLayout {
    pub(crate) fn new(source: Map<String, Value>) -> Self {
        Self(source)
    }

    /// Arranges `fields` in the order of the source object.
    ///
    /// Keys of the source keep their position with the value from `fields`.
    /// Source keys that serialize to nothing (`null` or `""`) are kept as they
    /// were. Keys new to `fields` are appended in their own order.
    pub(crate) fn arrange(&self, mut fields: Map<String, Value>) -> Map<String, Value> {
        let mut arranged = Map::with_capacity(fields.len());
        for (key, original) in &self.0 {
            if let Some(value) = fields.shift_remove(key) {
                arranged.insert(key.clone(), value);
            } else if is_blank(original) {
                arranged.insert(key.clone(), original.clone());
            }
        }
        arranged.extend(fields);
        arranged
    }
}

impl PartialEq for SourceLayout {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn keeps_source_positions_and_appends_new_keys() {
        let layout = SourceLayout::new(object(json!({"b": 1, "a": 2, "c": ""})));

        let arranged = layout.arrange(object(json!({"a": 3, "b": 4, "d": 5})));

        let keys: Vec<_> = arranged.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a", "c", "d"]);
        assert_eq!(arranged["a"], 3);
        assert_eq!(arranged["c"], "");
    }

    #[test]
    fn drops_cleared_values() {
        let layout = SourceLayout::new(object(json!({"a": "x", "b": 1})));

        let arranged = layout.arrange(object(json!({"b": 1})));

        assert!(!arranged.contains_key("a"));
    }
}

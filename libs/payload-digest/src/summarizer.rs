use serde_json::{Map, Value};

use crate::config::SummaryCaps;

/// Suffix appended to truncated strings.
pub const TRUNCATION_MARKER: &str = " …";

/// Key of the omission marker used in arrays and objects.
pub const MORE_KEY: &str = "__more__";

/// Applies [`SummaryCaps`] to arbitrary payload values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summarizer {
    caps: SummaryCaps,
}

impl Summarizer {
    pub fn new(caps: SummaryCaps) -> Self {
        Self { caps }
    }

    pub fn caps(&self) -> SummaryCaps {
        self.caps
    }

    /// Returns a copy of `value` with every string, array and object cut down
    /// to the configured caps. Values already within the caps come back
    /// structurally equal.
    pub fn summarize(&self, value: &Value) -> Value {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
            Value::String(text) => Value::String(self.truncate(text)),
            Value::Array(items) => Value::Array(self.summarize_array(items)),
            Value::Object(map) => Value::Object(self.summarize_object(map)),
        }
    }

    pub fn summarize_array(&self, items: &[Value]) -> Vec<Value> {
        let limit = self.caps.max_array_items;
        let mut out: Vec<Value> = items
            .iter()
            .take(limit)
            .map(|item| self.summarize(item))
            .collect();

        if items.len() > limit {
            out.push(omitted_items_marker(items.len() - limit));
        }
        out
    }

    pub fn summarize_object(&self, map: &Map<String, Value>) -> Map<String, Value> {
        let limit = self.caps.max_object_keys;
        let mut out: Map<String, Value> = map
            .iter()
            .take(limit)
            .map(|(key, value)| (key.clone(), self.summarize(value)))
            .collect();

        if map.len() > limit {
            out.insert(
                MORE_KEY.to_string(),
                Value::String(format!("+{} keys", map.len() - limit)),
            );
        }
        out
    }

    fn truncate(&self, text: &str) -> String {
        match text.char_indices().nth(self.caps.max_string) {
            Some((cut, _)) => {
                let mut truncated = String::with_capacity(cut + TRUNCATION_MARKER.len());
                truncated.push_str(&text[..cut]);
                truncated.push_str(TRUNCATION_MARKER);
                truncated
            }
            None => text.to_string(),
        }
    }
}

/// Marker element appended to arrays that lost `omitted` trailing elements.
pub fn omitted_items_marker(omitted: usize) -> Value {
    let mut marker = Map::new();
    marker.insert(MORE_KEY.to_string(), Value::from(omitted));
    Value::Object(marker)
}

/// Convenience wrapper around [`Summarizer::summarize`].
pub fn summarize_value(value: &Value, caps: SummaryCaps) -> Value {
    Summarizer::new(caps).summarize(value)
}

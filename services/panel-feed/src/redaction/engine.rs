use serde_json::Value;
use tracing::debug;

use super::REDACTED_PLACEHOLDER;

/// Masks identity members in summaries when the panel's redact toggle is on.
///
/// Field names match at any depth; `null` members are left alone so the
/// summary still shows which identities were absent.
#[derive(Debug, Clone)]
pub struct RedactionEngine {
    fields: Vec<String>,
}

impl RedactionEngine {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Masks every configured member in place, returning how many were masked.
    pub fn redact(&self, value: &mut Value) -> usize {
        let masked = self.redact_recursive(value);
        if masked > 0 {
            debug!(fields_masked = masked, "Redaction completed");
        }
        masked
    }

    fn redact_recursive(&self, value: &mut Value) -> usize {
        let mut count = 0;

        match value {
            Value::Object(map) => {
                for (key, nested) in map.iter_mut() {
                    if self.fields.iter().any(|field| field == key) {
                        if !nested.is_null() {
                            *nested = Value::String(REDACTED_PLACEHOLDER.to_string());
                            count += 1;
                        }
                    } else {
                        count += self.redact_recursive(nested);
                    }
                }
            }
            Value::Array(items) => {
                for item in items.iter_mut() {
                    count += self.redact_recursive(item);
                }
            }
            _ => {}
        }

        count
    }
}

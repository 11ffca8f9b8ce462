use serde_json::{Map, Value};
use tracing::trace;
use url::form_urlencoded;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Turns a captured body into the payload value handed to the extractors.
///
/// Already-parsed JSON passes through. Text bodies are decoded as form data
/// when the content type says so, otherwise as JSON (beacons often send JSON
/// as `text/plain`), and fall back to the raw string. Blank bodies yield
/// `None`.
pub fn decode_body(raw: &Value, content_type: Option<&str>) -> Option<Value> {
    let text = match raw {
        Value::Null => return None,
        Value::String(text) => text,
        parsed => return Some(parsed.clone()),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if content_type.map_or(false, is_form_content_type) {
        return Some(decode_form(trimmed));
    }

    match serde_json::from_str(trimmed) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            trace!(error = %err, "body is not JSON, keeping raw text");
            Some(Value::String(text.clone()))
        }
    }
}

fn is_form_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map_or(false, |mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Repeated form keys collect into an array in submission order.
fn decode_form(text: &str) -> Value {
    let mut out = Map::new();
    for (key, value) in form_urlencoded::parse(text.as_bytes()) {
        let value = Value::String(value.into_owned());
        match out.get_mut(&*key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                out.insert(key.into_owned(), value);
            }
        }
    }
    Value::Object(out)
}

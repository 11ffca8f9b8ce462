//! Small total helpers over untyped payload values.

use serde_json::Value;

/// Resolves a dotted path such as `context.page.title` against `value`.
///
/// Each segment descends into an object member, or into an array element when
/// the segment is a decimal index. Descent stops at the first missing or
/// `null` step, so the result is never `Some(Value::Null)`.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }?;
        (!next.is_null()).then_some(next)
    })
}

/// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy,
/// everything else (including empty arrays and objects) is truthy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns the member `key` of `value` when it exists and is truthy.
pub fn truthy_member<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|member| truthy(member))
}

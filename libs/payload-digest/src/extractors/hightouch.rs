use serde_json::{Map, Value};

use crate::builder::build_object;
use crate::config::ExtractorConfig;
use crate::extractor::{Extractor, ExtractorContext};
use crate::summarizer::Summarizer;
use crate::value::{get_path, truthy, truthy_member};

pub const HIGHTOUCH_EVENT: &str = "hightouch-event";
pub const SDK_NAME: &str = "hightouch";

/// Credential member reported only as `writeKey_present`.
pub const WRITE_KEY: &str = "writeKey";
pub const WRITE_KEY_PRESENT: &str = "writeKey_present";

/// At least one of these must be truthy for a payload to count as an event.
const IDENTITY_FIELDS: &[&str] = &["anonymousId", "userId", WRITE_KEY, "messageId"];

const PAGE_FIELDS: &[&str] = &["title", "url", "path", "referrer"];

const CONTEXT_FIELDS: &[&str] = &[
    "locale",
    "timezone",
    "sessionId",
    "sessionStart",
    "library",
    "userAgentData",
];

/// Single Events-SDK envelope (`page`, `track`, `identify`, `group`, `screen`).
#[derive(Debug, Clone, Copy, Default)]
pub struct HightouchEventExtractor;

impl HightouchEventExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for HightouchEventExtractor {
    fn name(&self) -> &str {
        HIGHTOUCH_EVENT
    }

    fn matches(&self, ctx: &ExtractorContext<'_>) -> bool {
        is_hightouch_event(ctx.body)
    }

    fn summarize(&self, ctx: &ExtractorContext<'_>) -> Value {
        summarize_event(ctx.body, &ctx.config_for(HIGHTOUCH_EVENT))
    }
}

/// Light structural check: a string `type` plus one truthy identity field.
pub fn is_hightouch_event(body: &Value) -> bool {
    let Some(envelope) = body.as_object() else {
        return false;
    };

    envelope.get("type").map_or(false, Value::is_string)
        && IDENTITY_FIELDS
            .iter()
            .any(|field| envelope.get(*field).map_or(false, truthy))
}

/// Summarizes one event envelope under `config`.
///
/// With key selection configured the flat envelope goes through
/// [`build_object`]; otherwise only `properties` and `context` are capped.
pub fn summarize_event(body: &Value, config: &ExtractorConfig) -> Value {
    let mut envelope = event_envelope(body);

    if config.selects_keys() {
        return Value::Object(build_object(&envelope, config));
    }

    let summarizer = Summarizer::new(config.caps);
    for key in ["properties", "context"] {
        if let Some(nested) = envelope.get_mut(key) {
            *nested = summarizer.summarize(nested);
        }
    }
    Value::Object(envelope)
}

fn event_envelope(body: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("sdk".to_string(), Value::from(SDK_NAME));
    copy_member(&mut out, body, "type");
    copy_member(&mut out, body, "messageId");

    let timestamp = truthy_member(body, "timestamp").or_else(|| body.get("sentAt"));
    if let Some(timestamp) = timestamp {
        out.insert("timestamp".to_string(), timestamp.clone());
    }

    for field in ["userId", "anonymousId"] {
        let value = body.get(field).cloned().unwrap_or(Value::Null);
        out.insert(field.to_string(), value);
    }

    out.insert(
        WRITE_KEY_PRESENT.to_string(),
        Value::Bool(body.get(WRITE_KEY).map_or(false, truthy)),
    );

    let page = get_path(body, "context.page")
        .filter(|page| truthy(page))
        .or_else(|| truthy_member(body, "properties"));
    out.insert("page".to_string(), pick(page, PAGE_FIELDS));

    let mut properties = truthy_member(body, "properties")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    strip_write_keys(&mut properties);
    out.insert("properties".to_string(), properties);

    let mut context = pick(truthy_member(body, "context"), CONTEXT_FIELDS);
    strip_write_keys(&mut context);
    out.insert("context".to_string(), context);

    out
}

fn copy_member(out: &mut Map<String, Value>, body: &Value, key: &str) {
    if let Some(value) = body.get(key) {
        out.insert(key.to_string(), value.clone());
    }
}

/// Copies the listed members of `source` that exist, in list order.
fn pick(source: Option<&Value>, fields: &[&str]) -> Value {
    let mut out = Map::new();
    if let Some(Value::Object(map)) = source {
        for field in fields {
            if let Some(value) = map.get(*field) {
                out.insert(field.to_string(), value.clone());
            }
        }
    }
    Value::Object(out)
}

/// Removes every `writeKey` member at any depth.
pub(crate) fn strip_write_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.shift_remove(WRITE_KEY);
            map.values_mut().for_each(strip_write_keys);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_write_keys),
        _ => {}
    }
}

pub(crate) fn contains_write_key(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key(WRITE_KEY) || map.values().any(contains_write_key),
        Value::Array(items) => items.iter().any(contains_write_key),
        _ => false,
    }
}

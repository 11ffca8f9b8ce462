use serde_json::{Map, Value};

use super::hightouch::{
    is_hightouch_event, strip_write_keys, summarize_event, HIGHTOUCH_EVENT, SDK_NAME, WRITE_KEY,
    WRITE_KEY_PRESENT,
};
use crate::extractor::{Extractor, ExtractorContext};
use crate::summarizer::{omitted_items_marker, Summarizer};
use crate::value::truthy;

pub const HIGHTOUCH_BATCH: &str = "hightouch-batch";

/// `{ "batch": [event, ...], "sentAt": ..., "writeKey": ... }` envelopes.
///
/// The batch entry's `maxArrayItems` bounds how many events are shown; each
/// shown event is summarized with the `hightouch-event` settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HightouchBatchExtractor;

impl HightouchBatchExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for HightouchBatchExtractor {
    fn name(&self) -> &str {
        HIGHTOUCH_BATCH
    }

    fn matches(&self, ctx: &ExtractorContext<'_>) -> bool {
        batch_items(ctx.body).map_or(false, |items| items.iter().any(is_hightouch_event))
    }

    fn summarize(&self, ctx: &ExtractorContext<'_>) -> Value {
        let batch_config = ctx.config_for(HIGHTOUCH_BATCH);
        let event_config = ctx.config_for(HIGHTOUCH_EVENT);
        let items = batch_items(ctx.body).unwrap_or(&[]);

        let batch_summarizer = Summarizer::new(batch_config.caps);

        let mut out = Map::new();
        out.insert("sdk".to_string(), Value::from(SDK_NAME));
        out.insert("kind".to_string(), Value::from("batch"));
        out.insert("count".to_string(), Value::from(items.len()));
        if let Some(sent_at) = ctx.body.get("sentAt") {
            out.insert("sentAt".to_string(), batch_summarizer.summarize(sent_at));
        }
        out.insert(
            WRITE_KEY_PRESENT.to_string(),
            Value::Bool(ctx.body.get(WRITE_KEY).map_or(false, truthy)),
        );
        out.insert(
            "types".to_string(),
            batch_summarizer.summarize(&distinct_types(items)),
        );

        let fallback = Summarizer::new(event_config.caps);
        let shown = batch_config.caps.max_array_items;
        let mut events: Vec<Value> = items
            .iter()
            .take(shown)
            .map(|item| {
                if is_hightouch_event(item) {
                    summarize_event(item, &event_config)
                } else {
                    let mut scrubbed = item.clone();
                    strip_write_keys(&mut scrubbed);
                    fallback.summarize(&scrubbed)
                }
            })
            .collect();
        if items.len() > shown {
            events.push(omitted_items_marker(items.len() - shown));
        }
        out.insert("events".to_string(), Value::Array(events));

        Value::Object(out)
    }
}

fn batch_items(body: &Value) -> Option<&[Value]> {
    body.get("batch")?.as_array().map(Vec::as_slice)
}

fn distinct_types(items: &[Value]) -> Value {
    let mut types: Vec<&str> = Vec::new();
    for kind in items.iter().filter_map(|item| item.get("type")?.as_str()) {
        if !types.contains(&kind) {
            types.push(kind);
        }
    }
    Value::from(types)
}

use serde_json::Value;

use super::hightouch::{contains_write_key, strip_write_keys, WRITE_KEY, WRITE_KEY_PRESENT};
use crate::extractor::{Extractor, ExtractorContext};
use crate::summarizer::Summarizer;
use crate::value::truthy;

pub const GENERIC: &str = "generic";

/// Catch-all extractor. Matches every payload, so it must be registered last.
///
/// `writeKey` members are dropped at any depth; a top-level one is reported
/// as `writeKey_present` like the event summaries do.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericExtractor;

impl GenericExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for GenericExtractor {
    fn name(&self) -> &str {
        GENERIC
    }

    fn matches(&self, _ctx: &ExtractorContext<'_>) -> bool {
        true
    }

    fn summarize(&self, ctx: &ExtractorContext<'_>) -> Value {
        let summarizer = Summarizer::new(ctx.config_for(GENERIC).caps);
        if !contains_write_key(ctx.body) {
            return summarizer.summarize(ctx.body);
        }

        let mut scrubbed = ctx.body.clone();
        strip_write_keys(&mut scrubbed);
        let mut summary = summarizer.summarize(&scrubbed);
        if let (Some(write_key), Value::Object(map)) = (ctx.body.get(WRITE_KEY), &mut summary) {
            map.insert(WRITE_KEY_PRESENT.to_string(), Value::Bool(truthy(write_key)));
        }
        summary
    }
}

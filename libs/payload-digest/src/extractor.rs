use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::config::{CustomFields, ExtractorConfig};

/// Everything an extractor sees for one payload.
#[derive(Debug, Clone, Copy)]
pub struct ExtractorContext<'a> {
    pub body: &'a Value,
    pub custom_fields: &'a CustomFields,
}

impl<'a> ExtractorContext<'a> {
    pub fn new(body: &'a Value, custom_fields: &'a CustomFields) -> Self {
        Self {
            body,
            custom_fields,
        }
    }

    pub fn config_for(&self, name: &str) -> Cow<'a, ExtractorConfig> {
        self.custom_fields.config_for(name)
    }
}

/// Recognizes one payload shape and turns it into a bounded summary.
///
/// `matches` must be total: any payload, including scalars, yields `false`
/// rather than panicking. Implementations hold no per-call state.
pub trait Extractor: Send + Sync {
    /// Unique name, also the key of this extractor's settings entry.
    fn name(&self) -> &str;

    fn matches(&self, ctx: &ExtractorContext<'_>) -> bool;

    fn summarize(&self, ctx: &ExtractorContext<'_>) -> Value;
}

type MatchFn = dyn Fn(&ExtractorContext<'_>) -> bool + Send + Sync;
type SummarizeFn = dyn Fn(&ExtractorContext<'_>) -> Value + Send + Sync;

/// Extractor assembled from a pair of closures, for caller-defined shapes.
pub struct FnExtractor {
    name: String,
    matcher: Box<MatchFn>,
    summarizer: Box<SummarizeFn>,
}

impl FnExtractor {
    pub fn new<M, S>(name: impl Into<String>, matcher: M, summarizer: S) -> Self
    where
        M: Fn(&ExtractorContext<'_>) -> bool + Send + Sync + 'static,
        S: Fn(&ExtractorContext<'_>) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            matcher: Box::new(matcher),
            summarizer: Box::new(summarizer),
        }
    }
}

impl Extractor for FnExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, ctx: &ExtractorContext<'_>) -> bool {
        (self.matcher)(ctx)
    }

    fn summarize(&self, ctx: &ExtractorContext<'_>) -> Value {
        (self.summarizer)(ctx)
    }
}

impl fmt::Debug for FnExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExtractor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

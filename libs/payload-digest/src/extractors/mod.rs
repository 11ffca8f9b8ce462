//! Built-in extractors, in their default priority order.

mod batch;
mod generic;
mod hightouch;

pub use batch::{HightouchBatchExtractor, HIGHTOUCH_BATCH};
pub use generic::{GenericExtractor, GENERIC};
pub use hightouch::{
    is_hightouch_event, summarize_event, HightouchEventExtractor, HIGHTOUCH_EVENT, SDK_NAME,
    WRITE_KEY, WRITE_KEY_PRESENT,
};

use crate::extractor::Extractor;

/// `hightouch-event`, `hightouch-batch`, then the `generic` fallback.
pub fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(HightouchEventExtractor::new()),
        Box::new(HightouchBatchExtractor::new()),
        Box::new(GenericExtractor::new()),
    ]
}

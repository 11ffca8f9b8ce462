//! Payload Inspector classification and summarization engine.
//!
//! Captured request/response bodies are handed to an ordered [`Registry`] of
//! [`Extractor`]s. The first extractor that recognizes the payload's shape
//! turns it into a compact summary bounded by the per-extractor
//! [`SummaryCaps`]. The crate performs no I/O and keeps no state between
//! calls; the default registry can be shared freely across threads.

use thiserror::Error;

// Module declarations
pub mod builder;
pub mod config;
pub mod extractor;
pub mod extractors;
pub mod registry;
pub mod summarizer;
pub mod value;

// Re-export key types
pub use builder::build_object;
pub use config::{CustomFields, ExtractorConfig, SummaryCaps};
pub use extractor::{Extractor, ExtractorContext, FnExtractor};
pub use extractors::{
    default_extractors, GenericExtractor, HightouchBatchExtractor, HightouchEventExtractor,
};
pub use registry::{classify, default_registry, Classification, Registry, RegistryBuilder};
pub use summarizer::{summarize_value, Summarizer, MORE_KEY, TRUNCATION_MARKER};
pub use value::get_path;

/// Errors emitted by the extractor registry.
#[derive(Debug, Error)]
pub enum DigestError {
    /// No registered extractor accepted the payload
    #[error("No extractor matched the payload; register a fallback extractor")]
    NoMatchingExtractor,

    /// Two extractors share a name
    #[error("Duplicate extractor name: {name}")]
    DuplicateExtractor { name: String },
}

/// Summarizes `body` with the process-wide default registry.
///
/// # Example
/// ```
/// use payload_inspector_digest::{summarize_payload, CustomFields};
/// use serde_json::json;
///
/// let body = json!({"type": "track", "userId": "user-1", "writeKey": "secret"});
/// let result = summarize_payload(&body, &CustomFields::new()).unwrap();
/// assert_eq!(result.extractor, "hightouch-event");
/// assert_eq!(result.summary["writeKey_present"], json!(true));
/// ```
pub fn summarize_payload(
    body: &serde_json::Value,
    custom_fields: &CustomFields,
) -> Result<Classification<'static>, DigestError> {
    default_registry().classify(body, custom_fields)
}

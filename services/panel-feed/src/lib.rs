pub mod capture;
pub mod config;
pub mod feed;
pub mod filter;
pub mod redaction;
pub mod settings;

pub use capture::{decode_body, CapturedRequest};
pub use config::{InputSource, PanelConfig};
pub use feed::{run_feed, BodySummary, FeedError, FeedStats, Inspection, Inspector, PanelEntry};
pub use filter::{FilterDecision, RequestFilter, SkipReason};
pub use redaction::RedactionEngine;
pub use settings::PanelSettings;

mod engine;

pub use engine::RedactionEngine;

pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

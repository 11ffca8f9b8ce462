use payload_inspector_digest::DigestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Classification failed: {0}")]
    Classification(#[from] DigestError),

    #[error("Failed to encode panel entry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

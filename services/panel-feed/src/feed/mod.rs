mod error;
mod inspector;
mod stream;

pub use error::FeedError;
pub use inspector::{BodySummary, Inspection, Inspector, PanelEntry};
pub use stream::{run_feed, FeedStats};

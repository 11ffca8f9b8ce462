mod body;
mod record;

pub use body::decode_body;
pub use record::CapturedRequest;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::body::decode_body;

/// One captured request, as handed over by the capture hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedRequest {
    pub url: String,

    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Raw body text, or an already-parsed JSON value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl CapturedRequest {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            url: url.to_string(),
            method: method.to_string(),
            status: None,
            content_type: None,
            request_body: None,
            response_body: None,
            captured_at: None,
        }
    }

    pub fn with_request_body(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn with_response_body(mut self, body: Value) -> Self {
        self.response_body = Some(body);
        self
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Lower-cased host of `url`, if it parses.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
    }

    pub fn is_preflight(&self) -> bool {
        self.method.eq_ignore_ascii_case("OPTIONS")
    }

    pub fn decoded_request_body(&self) -> Option<Value> {
        decode_body(self.request_body.as_ref()?, self.content_type.as_deref())
    }

    pub fn decoded_response_body(&self) -> Option<Value> {
        decode_body(self.response_body.as_ref()?, None)
    }

    /// Body text searched by the panel filter.
    pub fn searchable_body(&self) -> String {
        [self.request_body.as_ref(), self.response_body.as_ref()]
            .into_iter()
            .flatten()
            .map(|body| match body {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

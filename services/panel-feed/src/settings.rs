use std::path::Path;

use anyhow::{Context, Result};
use payload_inspector_digest::CustomFields;
use serde::Deserialize;

pub const DEFAULT_EVENT_HOST: &str = "events.hightouch.com";

/// Identity members masked when `htRedact` is on.
pub const DEFAULT_REDACT_FIELDS: &[&str] = &["userId", "anonymousId", "email", "phone", "ip"];

/// Panel settings as persisted by the extension, camelCase on disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelSettings {
    /// Hosts whose traffic counts as analytics events.
    #[serde(rename = "htHosts")]
    pub event_hosts: Vec<String>,

    /// Also list requests to hosts outside `event_hosts`.
    pub show_non_events: bool,

    /// Case-insensitive text filter over URL and body.
    #[serde(rename = "htFilter")]
    pub filter: String,

    /// Mask identity members in summaries.
    #[serde(rename = "htRedact")]
    pub redact: bool,

    /// Also list CORS preflight (`OPTIONS`) requests.
    pub show_preflight: bool,

    /// Members masked when `redact` is set.
    pub redact_fields: Vec<String>,

    /// Per-extractor configuration handed to the digest registry.
    pub custom_fields: CustomFields,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            event_hosts: vec![DEFAULT_EVENT_HOST.to_string()],
            show_non_events: false,
            filter: String::new(),
            redact: false,
            show_preflight: false,
            redact_fields: DEFAULT_REDACT_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
            custom_fields: CustomFields::default(),
        }
    }
}

impl PanelSettings {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Invalid panel settings JSON")
    }

    /// Load settings from a JSON file; missing members take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        Self::from_json_str(&raw)
    }
}

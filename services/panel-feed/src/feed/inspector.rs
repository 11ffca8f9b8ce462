use chrono::{DateTime, Utc};
use payload_inspector_digest::Registry;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::FeedError;
use crate::capture::CapturedRequest;
use crate::filter::{FilterDecision, RequestFilter, SkipReason};
use crate::redaction::RedactionEngine;
use crate::settings::PanelSettings;

/// Summary of one body, tagged with the extractor that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodySummary {
    pub extractor: String,
    pub summary: Value,
}

/// One row of the panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelEntry {
    pub id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub method: String,
    pub url: String,
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub is_event: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<BodySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<BodySummary>,
}

#[derive(Debug, Clone)]
pub enum Inspection {
    Shown(Box<PanelEntry>),
    Skipped(SkipReason),
}

/// Applies panel settings and the extractor registry to captured requests.
#[derive(Debug)]
pub struct Inspector {
    registry: Registry,
    settings: PanelSettings,
    filter: RequestFilter,
    redactor: Option<RedactionEngine>,
    summarize_responses: bool,
}

impl Inspector {
    pub fn new(settings: PanelSettings) -> Self {
        Self::with_registry(Registry::with_defaults(), settings)
    }

    pub fn with_registry(registry: Registry, settings: PanelSettings) -> Self {
        let filter = RequestFilter::from_settings(&settings);
        let redactor = settings
            .redact
            .then(|| RedactionEngine::new(settings.redact_fields.iter().cloned()));

        Self {
            registry,
            settings,
            filter,
            redactor,
            summarize_responses: true,
        }
    }

    pub fn summarize_responses(mut self, enabled: bool) -> Self {
        self.summarize_responses = enabled;
        self
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn inspect(&self, record: &CapturedRequest) -> Result<Inspection, FeedError> {
        let is_event = match self.filter.evaluate(record) {
            FilterDecision::Show { is_event } => is_event,
            FilterDecision::Skip(reason) => {
                debug!(url = %record.url, reason = reason.as_str(), "capture skipped");
                return Ok(Inspection::Skipped(reason));
            }
        };

        let request = record
            .decoded_request_body()
            .map(|body| self.summarize_body(&body))
            .transpose()?;

        let response = if self.summarize_responses {
            record
                .decoded_response_body()
                .map(|body| self.summarize_body(&body))
                .transpose()?
        } else {
            None
        };

        Ok(Inspection::Shown(Box::new(PanelEntry {
            id: Uuid::new_v4(),
            captured_at: record.captured_at.unwrap_or_else(Utc::now),
            method: record.method.to_ascii_uppercase(),
            url: record.url.clone(),
            host: record.host(),
            status: record.status,
            is_event,
            request,
            response,
        })))
    }

    fn summarize_body(&self, body: &Value) -> Result<BodySummary, FeedError> {
        let classification = self
            .registry
            .classify(body, &self.settings.custom_fields)?;

        let mut summary = classification.summary;
        if let Some(ref redactor) = self.redactor {
            redactor.redact(&mut summary);
        }

        Ok(BodySummary {
            extractor: classification.extractor.to_string(),
            summary,
        })
    }
}

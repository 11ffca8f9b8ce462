use serde::Serialize;

use crate::capture::CapturedRequest;
use crate::settings::PanelSettings;

/// Why a captured request was left out of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Preflight,
    NonEvent,
    FilteredOut,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Preflight => "preflight",
            SkipReason::NonEvent => "non_event",
            SkipReason::FilteredOut => "filtered_out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Show { is_event: bool },
    Skip(SkipReason),
}

/// Visibility rules derived from [`PanelSettings`].
#[derive(Debug, Clone)]
pub struct RequestFilter {
    event_hosts: Vec<String>,
    show_non_events: bool,
    show_preflight: bool,
    needle: Option<String>,
}

impl RequestFilter {
    pub fn from_settings(settings: &PanelSettings) -> Self {
        let needle = settings.filter.trim().to_lowercase();
        Self {
            event_hosts: settings
                .event_hosts
                .iter()
                .map(|host| host.trim().trim_end_matches('.').to_ascii_lowercase())
                .filter(|host| !host.is_empty())
                .collect(),
            show_non_events: settings.show_non_events,
            show_preflight: settings.show_preflight,
            needle: (!needle.is_empty()).then_some(needle),
        }
    }

    /// Exact host or any subdomain of a configured event host.
    pub fn is_event_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.event_hosts.iter().any(|event_host| {
            host == *event_host
                || host
                    .strip_suffix(event_host.as_str())
                    .map_or(false, |prefix| prefix.ends_with('.'))
        })
    }

    pub fn evaluate(&self, record: &CapturedRequest) -> FilterDecision {
        if record.is_preflight() && !self.show_preflight {
            return FilterDecision::Skip(SkipReason::Preflight);
        }

        let is_event = record
            .host()
            .map_or(false, |host| self.is_event_host(&host));
        if !is_event && !self.show_non_events {
            return FilterDecision::Skip(SkipReason::NonEvent);
        }

        if let Some(ref needle) = self.needle {
            let in_url = record.url.to_lowercase().contains(needle.as_str());
            if !in_url && !record.searchable_body().to_lowercase().contains(needle.as_str()) {
                return FilterDecision::Skip(SkipReason::FilteredOut);
            }
        }

        FilterDecision::Show { is_event }
    }
}

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::value::truthy;

pub const DEFAULT_MAX_STRING: usize = 500;
pub const DEFAULT_MAX_ARRAY_ITEMS: usize = 3;
pub const DEFAULT_MAX_OBJECT_KEYS: usize = 20;
pub const DEFAULT_SAMPLE_COUNT: usize = 1;

/// Size limits applied by the bounded summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryCaps {
    /// Characters kept per string before the truncation marker.
    pub max_string: usize,
    /// Elements kept per array before the omission marker.
    pub max_array_items: usize,
    /// Keys kept per object before the `__more__` key.
    pub max_object_keys: usize,
}

impl SummaryCaps {
    pub const fn new(max_string: usize, max_array_items: usize, max_object_keys: usize) -> Self {
        Self {
            max_string,
            max_array_items,
            max_object_keys,
        }
    }
}

impl Default for SummaryCaps {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_STRING,
            DEFAULT_MAX_ARRAY_ITEMS,
            DEFAULT_MAX_OBJECT_KEYS,
        )
    }
}

/// Per-extractor options, validated once from the untyped settings value.
///
/// Parsing never fails: options with the wrong shape fall back to their
/// defaults, so a broken settings entry degrades to the default summary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct ExtractorConfig {
    /// Paths that are always copied into the output when present.
    pub keys: Option<Vec<String>>,
    /// Top-level keys skipped by `include_all`.
    pub exclude: Option<HashSet<String>>,
    /// Copy every remaining top-level key.
    pub include_all: bool,
    /// Accepted for settings compatibility; built-in extractors ignore it.
    pub sample_count: usize,
    pub caps: SummaryCaps,
}

impl ExtractorConfig {
    /// Caps-only configuration, leaving key selection unset.
    pub fn with_caps(caps: SummaryCaps) -> Self {
        Self {
            caps,
            ..Self::default()
        }
    }

    /// Whether the settings ask for explicit key selection or an inclusion
    /// policy, which routes event summaries through the object builder.
    pub fn selects_keys(&self) -> bool {
        self.keys.is_some() || self.exclude.is_some() || self.include_all
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.exclude
            .as_ref()
            .map_or(false, |exclude| exclude.contains(key))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            keys: None,
            exclude: None,
            include_all: false,
            sample_count: DEFAULT_SAMPLE_COUNT,
            caps: SummaryCaps::default(),
        }
    }
}

impl From<&Value> for ExtractorConfig {
    fn from(raw: &Value) -> Self {
        let caps = SummaryCaps {
            max_string: parse_count(raw, "maxString", DEFAULT_MAX_STRING),
            max_array_items: parse_count(raw, "maxArrayItems", DEFAULT_MAX_ARRAY_ITEMS),
            max_object_keys: parse_count(raw, "maxObjectKeys", DEFAULT_MAX_OBJECT_KEYS),
        };

        Self {
            keys: parse_strings(raw, "keys"),
            exclude: parse_strings(raw, "exclude").map(|keys| keys.into_iter().collect()),
            include_all: raw.get("includeAll").map_or(false, truthy),
            sample_count: parse_count(raw, "sampleCount", DEFAULT_SAMPLE_COUNT),
            caps,
        }
    }
}

impl From<Value> for ExtractorConfig {
    fn from(raw: Value) -> Self {
        Self::from(&raw)
    }
}

fn parse_count(raw: &Value, option: &str, default: usize) -> usize {
    let Some(candidate) = raw.get(option) else {
        return default;
    };

    match candidate.as_f64() {
        Some(n) if n.is_finite() && n >= 0.0 => n.floor() as usize,
        _ => {
            debug!(option, value = %candidate, default, "invalid count option, using default");
            default
        }
    }
}

fn parse_strings(raw: &Value, option: &str) -> Option<Vec<String>> {
    let items = raw.get(option)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
    )
}

/// Extractor configurations keyed by extractor name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub struct CustomFields {
    configs: HashMap<String, ExtractorConfig>,
}

impl CustomFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, config: ExtractorConfig) -> Self {
        self.insert(name, config);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, config: ExtractorConfig) {
        self.configs.insert(name.into(), config);
    }

    pub fn get(&self, name: &str) -> Option<&ExtractorConfig> {
        self.configs.get(name)
    }

    /// Configuration for `name`, or the defaults when none was supplied.
    pub fn config_for(&self, name: &str) -> Cow<'_, ExtractorConfig> {
        self.get(name)
            .map(Cow::Borrowed)
            .unwrap_or_else(|| Cow::Owned(ExtractorConfig::default()))
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

impl From<&Value> for CustomFields {
    fn from(raw: &Value) -> Self {
        let configs = raw
            .as_object()
            .map(|entries| {
                entries
                    .iter()
                    .map(|(name, config)| (name.clone(), ExtractorConfig::from(config)))
                    .collect()
            })
            .unwrap_or_default();
        Self { configs }
    }
}

impl From<Value> for CustomFields {
    fn from(raw: Value) -> Self {
        Self::from(&raw)
    }
}

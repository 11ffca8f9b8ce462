use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::settings::PanelSettings;

/// Where capture records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl std::str::FromStr for InputSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" => anyhow::bail!("Input path cannot be empty"),
            "-" => Ok(InputSource::Stdin),
            path => Ok(InputSource::File(PathBuf::from(path))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// NDJSON capture records, `-` for stdin
    pub input: InputSource,

    /// Panel settings file (defaults apply when unset)
    pub settings_path: Option<PathBuf>,

    /// Pretty-print entries instead of one JSON object per line
    pub pretty: bool,

    /// Summarize response bodies as well as request bodies
    pub summarize_responses: bool,

    /// Log level
    pub log_level: String,
}

impl PanelConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let input = std::env::var("INSPECTOR_INPUT")
            .unwrap_or_else(|_| "-".to_string())
            .parse()
            .context("Invalid INSPECTOR_INPUT")?;

        let settings_path = std::env::var("INSPECTOR_SETTINGS")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let pretty = std::env::var("INSPECTOR_PRETTY")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .context("Invalid INSPECTOR_PRETTY")?;

        let summarize_responses = std::env::var("INSPECTOR_RESPONSES")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .context("Invalid INSPECTOR_RESPONSES")?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            input,
            settings_path,
            pretty,
            summarize_responses,
            log_level,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let InputSource::File(ref path) = self.input {
            if !path.exists() {
                anyhow::bail!("Capture input file not found: {:?}", path);
            }
        }

        if let Some(ref path) = self.settings_path {
            if !path.exists() {
                anyhow::bail!("Settings file not found: {:?}", path);
            }
        }

        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL cannot be empty");
        }

        Ok(())
    }

    /// Panel settings from `settings_path`, or the install-time defaults
    pub fn load_settings(&self) -> Result<PanelSettings> {
        match self.settings_path {
            Some(ref path) => PanelSettings::load(path),
            None => Ok(PanelSettings::default()),
        }
    }
}

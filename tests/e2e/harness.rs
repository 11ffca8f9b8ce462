use anyhow::{anyhow, Context, Result};
use payload_inspector_panel::{run_feed, FeedStats, Inspector, PanelSettings};
use rand::Rng;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Result of one feed run: counters plus every entry it printed.
#[derive(Debug)]
pub struct FeedRun {
    pub stats: Option<FeedStats>,
    pub entries: Vec<Value>,
}

impl FeedRun {
    pub fn extractors(&self, side: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| entry[side]["extractor"].as_str().map(str::to_owned))
            .collect()
    }
}

pub struct TestHarness {
    workspace_dir: PathBuf,
    pub temp_dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Result<Self> {
        // Several tests share the process; only the first install wins.
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();

        let workspace_dir =
            PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()));
        let temp_dir = TempDir::new().context("creating harness tempdir")?;
        Ok(Self {
            workspace_dir,
            temp_dir,
        })
    }

    pub fn write_settings(&self, settings: &Value) -> Result<PathBuf> {
        let path = self.temp_dir.path().join("settings.json");
        std::fs::write(&path, serde_json::to_string_pretty(settings)?)
            .context("writing settings file")?;
        Ok(path)
    }

    pub fn write_captures(&self, records: &[Value]) -> Result<PathBuf> {
        let path = self.temp_dir.path().join("captures.ndjson");
        let body: Vec<String> = records.iter().map(Value::to_string).collect();
        std::fs::write(&path, body.join("\n")).context("writing capture file")?;
        Ok(path)
    }

    /// Runs the feed in-process against files written by this harness.
    pub async fn run_in_process(&self, settings: &Path, captures: &Path) -> Result<FeedRun> {
        let settings = PanelSettings::load(settings)?;
        let inspector = Inspector::new(settings);
        let file = tokio::fs::File::open(captures)
            .await
            .context("opening capture file")?;

        let mut output = Vec::new();
        let stats = run_feed(&inspector, BufReader::new(file), &mut output, false).await?;
        debug!(?stats, "in-process feed finished");

        Ok(FeedRun {
            stats: Some(stats),
            entries: parse_entries(&output)?,
        })
    }

    /// Runs the `panel-feed` binary with `env`, feeding `stdin` when given.
    pub async fn run_binary(
        &self,
        env: &HashMap<&str, String>,
        stdin: Option<&str>,
    ) -> Result<FeedRun> {
        info!("Starting panel-feed binary");
        let mut command = Command::new("cargo");
        command
            .current_dir(&self.workspace_dir)
            .arg("run")
            .arg("--quiet")
            .arg("--package")
            .arg("payload-inspector-panel")
            .arg("--bin")
            .arg("panel-feed")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in env {
            command.env(key, value);
        }

        let mut child = command.spawn().context("spawning panel-feed")?;
        if let Some(mut pipe) = child.stdin.take() {
            if let Some(input) = stdin {
                pipe.write_all(input.as_bytes()).await?;
            }
            // Dropping the pipe closes stdin so the feed sees EOF.
        }

        let output = timeout(Duration::from_secs(300), child.wait_with_output())
            .await
            .map_err(|_| anyhow!("timeout waiting for panel-feed"))??;
        if !output.status.success() {
            return Err(anyhow!(
                "panel-feed exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(FeedRun {
            stats: None,
            entries: parse_entries(&output.stdout)?,
        })
    }
}

fn parse_entries(output: &[u8]) -> Result<Vec<Value>> {
    let text = std::str::from_utf8(output).context("feed output is not UTF-8")?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).context("parsing feed entry"))
        .collect()
}

pub fn random_anonymous_id(prefix: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!("{prefix}-{suffix:08x}")
}

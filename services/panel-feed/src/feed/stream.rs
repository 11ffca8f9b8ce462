use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use super::{FeedError, Inspection, Inspector};
use crate::capture::CapturedRequest;

/// Counters reported when a feed finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub records: usize,
    pub shown: usize,
    pub skipped: usize,
    pub malformed: usize,
}

/// Reads NDJSON capture records from `reader` and writes one panel entry per
/// shown record to `writer`.
///
/// Blank lines are ignored and malformed records are logged and counted, so a
/// single bad capture never stops the feed.
pub async fn run_feed<R, W>(
    inspector: &Inspector,
    reader: R,
    mut writer: W,
    pretty: bool,
) -> Result<FeedStats, FeedError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = FeedStats::default();
    let mut lines = reader.lines();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }
        stats.records += 1;

        let record: CapturedRequest = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(err) => {
                warn!(line = line_number, error = %err, "Skipping malformed capture record");
                stats.malformed += 1;
                continue;
            }
        };

        match inspector.inspect(&record)? {
            Inspection::Shown(entry) => {
                let encoded = if pretty {
                    serde_json::to_string_pretty(&entry)?
                } else {
                    serde_json::to_string(&entry)?
                };
                writer.write_all(encoded.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                stats.shown += 1;
            }
            Inspection::Skipped(reason) => {
                debug!(line = line_number, reason = reason.as_str(), "record not shown");
                stats.skipped += 1;
            }
        }
    }

    writer.flush().await?;
    Ok(stats)
}

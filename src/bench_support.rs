use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

pub use payload_inspector_digest;
pub use payload_inspector_panel;

const WORDS: &[&str] = &[
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
];

/// A Hightouch page event shaped like what the browser SDK sends.
pub fn page_event(anonymous_id: &str) -> Value {
    json!({
        "type": "page",
        "messageId": format!("msg-{anonymous_id}"),
        "anonymousId": anonymous_id,
        "userId": null,
        "writeKey": "bench-write-key",
        "sentAt": "2024-05-01T12:00:00.000Z",
        "properties": {
            "path": "/pricing",
            "url": "https://shop.example.com/pricing",
            "title": "Pricing",
            "referrer": "https://search.example.com/?q=pricing"
        },
        "context": {
            "page": {
                "path": "/pricing",
                "url": "https://shop.example.com/pricing",
                "title": "Pricing",
                "referrer": "https://search.example.com/?q=pricing",
                "search": ""
            },
            "library": { "name": "hightouch-events", "version": "1.4.0" },
            "userAgent": "Mozilla/5.0 (X11; Linux x86_64)",
            "locale": "en-US",
            "timezone": "Europe/Berlin"
        }
    })
}

/// A batch envelope holding `size` track events.
pub fn batch_payload(size: usize) -> Value {
    let events: Vec<Value> = (0..size)
        .map(|index| {
            json!({
                "type": "track",
                "event": format!("Item Viewed {index}"),
                "anonymousId": format!("anon-{index}"),
                "properties": { "sku": format!("SKU-{index:04}"), "price": index }
            })
        })
        .collect();
    json!({
        "batch": events,
        "sentAt": "2024-05-01T12:00:00.000Z",
        "writeKey": "bench-write-key"
    })
}

/// Deterministic random JSON tree used to exercise the generic summarizer.
pub fn random_tree(seed: u64, depth: usize, breadth: usize) -> Value {
    let mut rng = StdRng::seed_from_u64(seed);
    random_node(&mut rng, depth, breadth)
}

fn random_node(rng: &mut StdRng, depth: usize, breadth: usize) -> Value {
    if depth == 0 {
        return random_leaf(rng);
    }
    match rng.gen_range(0..3) {
        0 => Value::Array(
            (0..breadth)
                .map(|_| random_node(rng, depth - 1, breadth))
                .collect(),
        ),
        1 => {
            let mut map = Map::new();
            for index in 0..breadth {
                let word = WORDS[rng.gen_range(0..WORDS.len())];
                map.insert(
                    format!("{word}_{index}"),
                    random_node(rng, depth - 1, breadth),
                );
            }
            Value::Object(map)
        }
        _ => random_leaf(rng),
    }
}

fn random_leaf(rng: &mut StdRng) -> Value {
    match rng.gen_range(0..4) {
        0 => Value::Null,
        1 => Value::Bool(rng.gen()),
        2 => json!(rng.gen_range(-1_000_000i64..1_000_000)),
        _ => {
            let len = rng.gen_range(0..1_200);
            Value::String((0..len).map(|_| rng.gen_range('a'..='z')).collect())
        }
    }
}

/// One NDJSON capture line per record, alternating event and non-event hosts.
pub fn capture_lines(count: usize) -> String {
    let mut lines = Vec::with_capacity(count);
    for index in 0..count {
        let record = if index % 2 == 0 {
            json!({
                "url": "https://events.hightouch.com/v1/page",
                "method": "POST",
                "status": 200,
                "requestBody": page_event(&format!("anon-{index}")).to_string(),
                "responseBody": "{\"success\":true}"
            })
        } else {
            json!({
                "url": "https://cdn.example.com/app.js",
                "method": "GET",
                "status": 200
            })
        };
        lines.push(record.to_string());
    }
    lines.join("\n")
}

/// Capture and settings files laid out on disk for the panel feed.
pub struct FeedFixture {
    pub temp_dir: TempDir,
    pub captures: PathBuf,
    pub settings: PathBuf,
}

impl FeedFixture {
    /// `settings` is written verbatim, in the extension's on-disk shape.
    pub fn new(records: usize, settings: &Value) -> Result<Self> {
        let temp_dir = TempDir::new().context("creating feed fixture tempdir")?;
        let captures = temp_dir.path().join("captures.ndjson");
        let settings_path = temp_dir.path().join("settings.json");

        std::fs::write(&captures, capture_lines(records)).context("writing capture file")?;
        std::fs::write(
            &settings_path,
            serde_json::to_string_pretty(settings).context("encoding settings")?,
        )
        .context("writing settings file")?;

        Ok(Self {
            temp_dir,
            captures,
            settings: settings_path,
        })
    }
}

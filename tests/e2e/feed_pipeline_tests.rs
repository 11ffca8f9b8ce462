use super::{random_anonymous_id, TestHarness};
use anyhow::Result;
use payload_inspector::bench_support::{batch_payload, page_event};
use serde_json::{json, Value};

fn event_capture(anonymous_id: &str) -> Value {
    json!({
        "url": "https://events.hightouch.com/v1/page",
        "method": "POST",
        "status": 200,
        "capturedAt": "2024-05-01T12:00:00Z",
        "requestBody": page_event(anonymous_id).to_string(),
        "responseBody": "{\"success\":true}"
    })
}

fn asset_capture() -> Value {
    json!({
        "url": "https://cdn.example.com/app.js",
        "method": "GET",
        "status": 200,
        "responseBody": "console.log('ready')"
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_default_settings_show_only_events() -> Result<()> {
    let harness = TestHarness::new()?;
    let anonymous_id = random_anonymous_id("anon");
    let settings = harness.write_settings(&json!({}))?;
    let captures = harness.write_captures(&[
        event_capture(&anonymous_id),
        asset_capture(),
        json!({"url": "https://events.hightouch.com/v1/page", "method": "OPTIONS"}),
    ])?;

    let run = harness.run_in_process(&settings, &captures).await?;
    let stats = run.stats.expect("in-process runs report stats");
    assert_eq!(stats.records, 3);
    assert_eq!(stats.shown, 1);
    assert_eq!(stats.skipped, 2);

    let entry = &run.entries[0];
    assert_eq!(entry["isEvent"], json!(true));
    assert_eq!(entry["host"], json!("events.hightouch.com"));
    assert_eq!(entry["capturedAt"], json!("2024-05-01T12:00:00Z"));

    let summary = &entry["request"]["summary"];
    assert_eq!(entry["request"]["extractor"], json!("hightouch-event"));
    assert_eq!(summary["anonymousId"], json!(anonymous_id));
    assert_eq!(summary["writeKey_present"], json!(true));
    assert_eq!(summary["page"]["path"], json!("/pricing"));
    assert!(!entry.to_string().contains("bench-write-key"));

    assert_eq!(entry["response"]["extractor"], json!("generic"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_custom_fields_shape_event_summaries() -> Result<()> {
    let harness = TestHarness::new()?;
    let settings = harness.write_settings(&json!({
        "customFields": {
            "hightouch-event": {
                "keys": ["page.path", "type"],
                "exclude": ["context", "properties", "page"],
                "includeAll": true
            }
        }
    }))?;
    let captures = harness.write_captures(&[event_capture("anon-1")])?;

    let run = harness.run_in_process(&settings, &captures).await?;
    let summary = run.entries[0]["request"]["summary"]
        .as_object()
        .expect("object summary");

    let keys: Vec<&str> = summary.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "page.path",
            "type",
            "sdk",
            "messageId",
            "timestamp",
            "userId",
            "anonymousId",
            "writeKey_present"
        ]
    );
    assert_eq!(summary["page.path"], json!("/pricing"));
    assert_eq!(summary["userId"], Value::Null);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redaction_and_filter_settings() -> Result<()> {
    let harness = TestHarness::new()?;
    let settings = harness.write_settings(&json!({
        "showNonEvents": true,
        "htFilter": "pricing",
        "htRedact": true
    }))?;
    let captures = harness.write_captures(&[event_capture("anon-secret"), asset_capture()])?;

    let run = harness.run_in_process(&settings, &captures).await?;
    let stats = run.stats.expect("in-process runs report stats");
    assert_eq!(stats.shown, 1);
    assert_eq!(stats.skipped, 1);

    let summary = &run.entries[0]["request"]["summary"];
    assert_eq!(summary["anonymousId"], json!("[REDACTED]"));
    assert!(!run.entries[0].to_string().contains("\"anon-secret\""));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_batches_and_form_bodies() -> Result<()> {
    let harness = TestHarness::new()?;
    let settings = harness.write_settings(&json!({"showNonEvents": true}))?;
    let captures = harness.write_captures(&[
        json!({
            "url": "https://events.hightouch.com/v1/batch",
            "method": "POST",
            "requestBody": batch_payload(5).to_string()
        }),
        json!({
            "url": "https://shop.example.com/checkout",
            "method": "POST",
            "contentType": "application/x-www-form-urlencoded",
            "requestBody": "item=a&item=b&coupon=SPRING"
        }),
    ])?;

    let run = harness.run_in_process(&settings, &captures).await?;
    assert_eq!(run.extractors("request"), vec!["hightouch-batch", "generic"]);

    let batch = &run.entries[0]["request"]["summary"];
    assert_eq!(batch["count"], json!(5));
    assert_eq!(batch["types"], json!(["track"]));
    assert_eq!(batch["events"].as_array().map(Vec::len), Some(4));
    assert_eq!(batch["events"][3], json!({"__more__": 2}));

    let form = &run.entries[1]["request"]["summary"];
    assert_eq!(form, &json!({"item": ["a", "b"], "coupon": "SPRING"}));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_lines_do_not_stop_the_feed() -> Result<()> {
    let harness = TestHarness::new()?;
    let settings = harness.write_settings(&json!({}))?;
    let captures = harness.temp_dir.path().join("mixed.ndjson");
    std::fs::write(
        &captures,
        format!(
            "{}\nnot json\n\n{{\"method\":\"POST\"}}\n{}\n",
            event_capture("anon-a"),
            event_capture("anon-b")
        ),
    )?;

    let run = harness.run_in_process(&settings, &captures).await?;
    let stats = run.stats.expect("in-process runs report stats");
    assert_eq!(stats.records, 4);
    assert_eq!(stats.malformed, 2);
    assert_eq!(stats.shown, 2);
    Ok(())
}

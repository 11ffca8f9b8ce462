use super::TestHarness;
use anyhow::Result;
use payload_inspector::bench_support::capture_lines;
use std::collections::HashMap;

#[tokio::test(flavor = "multi_thread")]
#[ignore = "builds and spawns the panel-feed binary through cargo"]
async fn test_binary_reads_stdin() -> Result<()> {
    let harness = TestHarness::new()?;
    let env = HashMap::from([("LOG_LEVEL", "warn".to_string())]);

    let run = harness.run_binary(&env, Some(&capture_lines(6))).await?;
    assert_eq!(run.entries.len(), 3);
    assert_eq!(run.extractors("request"), vec!["hightouch-event"; 3]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "builds and spawns the panel-feed binary through cargo"]
async fn test_binary_reads_file_with_settings() -> Result<()> {
    let harness = TestHarness::new()?;
    let settings = harness.write_settings(&serde_json::json!({"showNonEvents": true}))?;
    let captures = harness.temp_dir.path().join("captures.ndjson");
    std::fs::write(&captures, capture_lines(4))?;

    let env = HashMap::from([
        ("INSPECTOR_INPUT", captures.display().to_string()),
        ("INSPECTOR_SETTINGS", settings.display().to_string()),
        ("INSPECTOR_RESPONSES", "false".to_string()),
        ("LOG_LEVEL", "warn".to_string()),
    ]);

    let run = harness.run_binary(&env, None).await?;
    assert_eq!(run.entries.len(), 4);
    assert!(run.entries.iter().all(|entry| entry.get("response").is_none()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "builds and spawns the panel-feed binary through cargo"]
async fn test_binary_rejects_missing_input() -> Result<()> {
    let harness = TestHarness::new()?;
    let missing = harness.temp_dir.path().join("missing.ndjson");
    let env = HashMap::from([("INSPECTOR_INPUT", missing.display().to_string())]);

    let err = harness
        .run_binary(&env, None)
        .await
        .expect_err("missing input must fail");
    assert!(err.to_string().contains("exited with"));
    Ok(())
}

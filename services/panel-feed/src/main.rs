use anyhow::{Context, Result};
use payload_inspector_panel::config::{InputSource, PanelConfig};
use payload_inspector_panel::feed::{run_feed, FeedStats, Inspector};
use tokio::io::{AsyncBufRead, BufReader};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = PanelConfig::from_env().context("Failed to load configuration")?;

    // Initialize tracing with the configured log level
    init_tracing(&config.log_level);

    info!("payload-inspector panel feed starting");
    info!(
        "Configuration loaded: input={:?}, settings={:?}",
        config.input, config.settings_path
    );

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(e);
    }

    let settings = config.load_settings()?;
    info!(
        "Panel settings: event_hosts={:?}, show_non_events={}, redact={}",
        settings.event_hosts, settings.show_non_events, settings.redact
    );

    let inspector = Inspector::new(settings).summarize_responses(config.summarize_responses);
    let reader = open_input(&config.input).await?;

    tokio::select! {
        result = run_feed(&inspector, reader, tokio::io::stdout(), config.pretty) => {
            match result {
                Ok(stats) => log_stats(&stats),
                Err(e) => {
                    error!("Feed error: {}", e);
                    return Err(e.into());
                }
            }
        }
        _ = shutdown_signal() => {
            info!("Received shutdown signal");
        }
    }

    info!("payload-inspector panel feed stopped");
    Ok(())
}

async fn open_input(input: &InputSource) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match input {
        InputSource::Stdin => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
        InputSource::File(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open capture file: {:?}", path))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

fn log_stats(stats: &FeedStats) {
    info!(
        records = stats.records,
        shown = stats.shown,
        skipped = stats.skipped,
        malformed = stats.malformed,
        "Feed completed"
    );
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // stdout carries the entries, so logs go to stderr
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .compact()
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// Draft client entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the API client and probe connectivity
// 4. Create mpsc channels
// 5. Spawn the app logic task
// 6. Run the TUI event loop (blocking until user quits)
// 7. Cleanup on exit

use draftdeck::api::ApiClient;
use draftdeck::app;
use draftdeck::config;
use draftdeck::tui;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("draft client starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "config loaded: api={}, push={}, poll={}s",
        config.api_base_url,
        config.ws_url,
        config.status_poll.as_secs()
    );

    // 3. Build the API client and probe connectivity
    let api = Arc::new(
        ApiClient::new(&config.api_base_url, config.request_timeout)
            .context("failed to build HTTP client")?,
    );
    match api.health().await {
        Ok(()) => info!("draft service reachable"),
        // Not fatal; the service may come up later and every screen
        // retries on its own cadence.
        Err(e) => warn!("draft service health check failed: {e}"),
    }

    // 4. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_state = app::AppState::new(config, api);

    // 5. Spawn the app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("application loop error: {e}");
        }
    });

    // 6. Run the TUI event loop (blocking until user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {e}");
    }

    // 7. Cleanup: wait for the app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("draft client shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used
/// by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draftdeck.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftdeck=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

//! HTTP server for the center payroll engine.
//!
//! Environment:
//! - `CENTER_CONFIG_DIR`: configuration directory (default `./config/center`)
//! - `CENTER_SETTINGS_FILE`: local settings file (default `./settings.json`)
//! - `BIND_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `RUST_LOG`: log filter (default `info`)

use std::sync::Arc;
use std::time::Duration;

use center_payroll::api::{AppState, create_router};
use center_payroll::config::{ConfigLoader, LocalSettings};
use center_payroll::generative::{ContentAssistant, GeminiClient};
use center_payroll::logging;
use center_payroll::models::PayMonth;
use center_payroll::store::{DataStore, InMemoryStore, RestStore};
use center_payroll::sync::FinanceMonitor;
use tracing::{info, warn};

const FINANCE_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config_dir =
        std::env::var("CENTER_CONFIG_DIR").unwrap_or_else(|_| "./config/center".to_string());
    let config = ConfigLoader::load(&config_dir)?;

    let settings_path =
        std::env::var("CENTER_SETTINGS_FILE").unwrap_or_else(|_| "./settings.json".to_string());
    let settings = LocalSettings::load(&settings_path)?;
    info!(
        center = settings.center_name(config.center()),
        config_dir = %config_dir,
        "Configuration loaded"
    );

    let store: Arc<dyn DataStore> = match config.config().store() {
        Some(store_config) => {
            info!(url = %store_config.url, "Using hosted store");
            Arc::new(RestStore::from_config(store_config)?)
        }
        None => {
            warn!("No store configured, using an empty in-memory store");
            Arc::new(InMemoryStore::new())
        }
    };

    let mut state = AppState::new(config.clone(), Arc::clone(&store));
    if let Some(generative) = config.config().generative() {
        match GeminiClient::from_config(generative) {
            Ok(client) => {
                info!(model = %generative.model, "Content generation enabled");
                state = state.with_assistant(ContentAssistant::new(Arc::new(client)));
            }
            Err(err) => warn!(error = %err, "Content generation disabled"),
        }
    }

    let today = chrono::Local::now().date_naive();
    let monitor = FinanceMonitor::new(Arc::clone(&store), PayMonth::of(today), None);
    let monitor_handle = monitor.spawn(Some(FINANCE_REFRESH_INTERVAL));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    monitor_handle.shutdown();
    info!("Server stopped");
    Ok(())
}

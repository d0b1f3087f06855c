use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use cv_tailor::{ApiClient, ApiError, ConfigManager, SessionEvent};

mod cli;

use cli::{handle_command, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigManager::load()?;

    // Logs go to a file so stdout stays clean JSON
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.client.log_path)
        .with_context(|| format!("Failed to open log file {}", config.client.log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Environment: {}", config.environment);
    info!("Gateway: {}", config.client.api_base_url);

    let client = ApiClient::from_config(config.client)?;
    let mut session_events = client.auth().events().subscribe();

    let result = handle_command(cli, &client).await;

    if let Ok(SessionEvent::Expired { redirect_to }) = session_events.try_recv() {
        info!("Session ended, redirecting to {}", redirect_to);
    }

    match result {
        Err(e) if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_session_expired) => {
            eprintln!("Your session has expired. Run `cv-tailor login <email> <password>`.");
            std::process::exit(2);
        }
        other => other,
    }
}

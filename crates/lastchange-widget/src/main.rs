//! Last-change widget - SVG badges of recent GitHub commit activity
//!
//! Serves `/widgets/github/{owner}/{repo}/changes/latest` for embedding in
//! READMEs and dashboards.

use github_api::GitHubClient;
use lastchange_widget::{
    start_server, ActivityService, Clock, Result, ServerState, SharedState, SystemClock,
    WidgetConfig,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("lastchange_widget=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting last-change widget...");

    let config = WidgetConfig::from_env();
    info!("Port: {}", config.port);
    info!("GitHub API: {}", config.github_api_url);
    info!("Mode: {:?}", config.mode);
    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN not set, using the unauthenticated rate limit");
    }
    if config.mode.is_development() {
        info!("Development mode: data cache disabled");
    }

    let client = GitHubClient::with_base_url(&config.github_api_url, config.github_token.as_deref())?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let activity = ActivityService::new(Arc::new(client), clock.clone(), config.mode);
    let state: SharedState = Arc::new(ServerState::new(activity, clock));

    // Cancel in-flight work and stop accepting connections on Ctrl+C
    let shutdown = state.shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    start_server(state, config.port).await?;

    info!("Server stopped");
    Ok(())
}

//! watchcat Server Entry Point

use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use watchcat::cli::Cli;
use watchcat::config::{MonitorSettings, ServerConfig};
use watchcat::notifier::{DiscordWebhookNotifier, LogNotifier, Notifier};
use watchcat::registry::CatRegistry;
use watchcat::scheduler::CatScheduler;
use watchcat::service_log::ServiceLogStore;
use watchcat::shutdown::ShutdownController;
use watchcat::{logging, server, AppState};
use watchcat_common::config::WatchcatConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _log_guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("watchcat v{}", env!("CARGO_PKG_VERSION"));

    let config = WatchcatConfig::load(&cli.config)?;
    let settings = MonitorSettings::from_env();
    let server_config = ServerConfig::from_env().with_overrides(cli.host, cli.port);

    let notifier: Arc<dyn Notifier> = match &config.discord_webhook {
        Some(url) => Arc::new(DiscordWebhookNotifier::new(
            url.clone(),
            settings.notify_timeout,
        )?),
        None => {
            warn!("discord_webhook is not configured, notifications are only logged");
            Arc::new(LogNotifier)
        }
    };

    let service_logs = ServiceLogStore::new();
    let registry = CatRegistry::from_config(
        &config,
        Utc::now(),
        notifier,
        Arc::new(service_logs.clone()),
        &settings,
    )?;
    info!(count = registry.len(), "cat(s) loaded");

    let shutdown = ShutdownController::default();
    let scheduler = CatScheduler::start(&registry, shutdown.clone());

    let state = AppState {
        registry,
        service_logs,
        http_token: Arc::from(config.http_token.as_str()),
        shutdown: shutdown.clone(),
    };

    let served = server::run(state, &server_config.bind_addr()).await;

    shutdown.request_shutdown();
    scheduler.join().await;

    served?;
    Ok(())
}

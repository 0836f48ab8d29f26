//! warden - allow-listed moderation bot.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use warden::Bot;
use warden::config::{Config, DEFAULT_CONFIG_PATH};
use warden::network::GatewayClient;
use warden::platform::discord::{DiscordPlatform, RestClient};
use warden::state::AllowList;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration: file first, then environment overrides
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = Config::load_or_default(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    config.apply_env(|key| std::env::var(key).ok());

    let settings = config.settings().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    info!(
        application = %settings.application_id,
        guild = %settings.guild_id,
        "Starting warden"
    );

    warden::metrics::init();

    let allowlist = Arc::new(AllowList::load(&settings.allowlist_path).map_err(|e| {
        error!(path = %settings.allowlist_path.display(), error = %e, "Failed to load allow-list");
        e
    })?);
    if allowlist.is_empty() {
        warn!(
            path = %allowlist.path().display(),
            "Allow-list is empty; nobody can use the bot. Stop it and add user ids to the file."
        );
    }
    warden::metrics::set_allowlist_size(allowlist.len());

    let rest = RestClient::new(settings.token.clone())?;
    let platform = Arc::new(DiscordPlatform::new(
        rest,
        settings.application_id,
        settings.guild_id,
    ));

    // Registration failure is not fatal: commands registered earlier still work.
    if let Err(e) = platform.register_commands().await {
        error!(error = %e, "Failed to register commands");
    }

    let bot = Arc::new(Bot::new(allowlist, platform.clone())?);

    if let Some(port) = settings.metrics_port {
        tokio::spawn(warden::http::run_http_server(port));
    }

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    GatewayClient::new(platform, bot).run(shutdown_rx).await?;

    info!("warden stopped");
    Ok(())
}

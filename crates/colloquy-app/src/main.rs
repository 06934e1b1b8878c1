mod cli;
mod commands;
mod logging;
mod render;
mod repl;
mod setup;

use std::sync::Arc;

use colloquy_answer::HttpAnswerClient;
use colloquy_common::{ConfigError, EventBus};
use colloquy_config::ColloquyConfig;
use colloquy_session::SessionManager;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Load config before logging so [logging].level can take effect
    let loaded = colloquy_config::load_config(args.config.as_deref());
    let configured = match &loaded {
        Ok(config) => config.logging.level.as_directive(),
        Err(_) => colloquy_config::LogLevel::default().as_directive(),
    };

    // Initialize logging
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(logging::filter(
            rust_log.as_deref(),
            args.log_level.as_deref(),
            configured,
        ))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Colloquy v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(level) = args.log_level.as_deref().filter(|l| !logging::is_level(l)) {
        tracing::warn!("Ignoring unknown --log-level {level:?}");
    }

    if let Err(e) = run(&args, loaded).await {
        tracing::error!("{e}");
        eprintln!("colloquy: {e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}

async fn run(
    args: &cli::Args,
    loaded: Result<ColloquyConfig, ConfigError>,
) -> colloquy_common::Result<()> {
    let config = setup::resolve_config(args.config.as_deref(), loaded)?;
    if let Err(e) = colloquy_config::validation::validate(&config) {
        tracing::warn!("{e}");
    }
    tracing::info!(base_url = %config.service.base_url, "Config loaded");

    let client = Arc::new(HttpAnswerClient::new(setup::answer_config(&config.service))?);

    let store = setup::build_store(&setup::store_choice(args, &config.storage));
    let events = Arc::new(EventBus::default());
    let listener = repl::spawn_event_listener(events.subscribe());

    let manager = SessionManager::open(
        store,
        client.clone(),
        events,
        setup::manager_options(&config.session),
    );
    tracing::info!(sessions = manager.session_count(), "Sessions ready");

    let result = repl::Repl::new(&manager, &client).run().await;
    listener.abort();
    result
}

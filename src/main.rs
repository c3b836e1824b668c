use tracing::{error, info};

use feedrelay::{Config, Database, Relay, RunMode};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = feedrelay::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        feedrelay::logging::init_console_only(&config.logging.level);
    }

    info!("feedrelay - syndication feed to chat webhook relay");

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {e}", config.database.path);
            std::process::exit(1);
        }
    };

    let relay = match Relay::new(db, &config) {
        Ok(relay) => relay,
        Err(e) => {
            error!("Failed to initialize relay: {e}");
            std::process::exit(1);
        }
    };

    match config.relay.mode {
        RunMode::Once => {
            let summary = relay.run_once().await;
            info!("{} new article(s) delivered", summary.delivered);
        }
        RunMode::Watch => relay.run().await,
    }
}

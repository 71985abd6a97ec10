//! # Cacheable Server
//!
//! Entry point of the sample server.

use cacheable_config::ConfigLoader;
use cacheable_core::telemetry::{init_telemetry, shutdown_telemetry};
use cacheable_server::{startup::print_banner, AppBuilder};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_telemetry(&config.telemetry) {
        eprintln!("Failed to initialize telemetry: {}", e);
        std::process::exit(1);
    }

    print_banner();
    info!("Starting Cacheable server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let result = AppBuilder::new().with_config(config).run().await;
    shutdown_telemetry();

    if let Err(e) = result {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

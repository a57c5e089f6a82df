//! # Freight Lookup Server Main Driver
//!
//! ## Purpose
//! Main entry point for the freight lookup server. Loads configuration,
//! builds the Record Table, and starts the web server for handling lookup
//! requests.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging and tracing
//! 3. Load and concatenate the configured CSV sources
//! 4. Build the lookup engine (degraded when the load failed)
//! 5. Start the web API server
//! 6. Handle shutdown signals gracefully
//!
//! A dataset load failure does not abort startup: the server comes up with
//! `data_loaded: false` and refuses lookups with a typed outcome, so the
//! failure is observable through `/health` instead of a crash loop.

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use freight_lookup::{
    api::ApiServer,
    config::Config,
    dataset,
    errors::{LookupError, Result},
    lookup::LookupEngine,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("freight-lookup-server")
        .version("1.0.0")
        .author("Freight Data Team")
        .about("Read-only carrier and container lookup service over preloaded CSV datasets")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Validate configuration and source files, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").unwrap();
    let mut config = Config::from_file(config_path)?;

    // Override port if specified
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let config = Arc::new(config);

    // Initialize logging
    init_logging(&config)?;

    info!("Starting Freight Lookup Server v1.0.0");
    info!("Configuration loaded from: {}", config_path);
    log_startup_diagnostics();

    // Run health checks if requested
    if matches.get_flag("check-health") {
        return run_health_checks(&config);
    }

    // Load the dataset and build the engine
    let app_state = initialize_components(config.clone());

    // Start the API server
    let server = ApiServer::new(app_state);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            error!("Server error: {}", e);
        }
    });

    info!(
        "Freight Lookup Server started on {}:{}",
        config.server.host, config.server.port
    );

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = server_handle => {
            warn!("Server stopped unexpectedly");
        }
    }

    info!("Freight Lookup Server shut down");
    Ok(())
}

/// Initialize logging and tracing
fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .map_err(|_| LookupError::Config {
            message: format!("Invalid log level: {}", config.logging.level),
        })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if config.logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }

    info!("Logging initialized with level: {}", config.logging.level);
    Ok(())
}

/// Log the environment facts that matter when the service misbehaves in a
/// container: where it is running from and which port it was handed.
fn log_startup_diagnostics() {
    match std::env::current_dir() {
        Ok(cwd) => info!("Current working directory: {:?}", cwd),
        Err(e) => warn!("Could not determine working directory: {}", e),
    }
    match std::env::var("PORT") {
        Ok(port) => info!("PORT environment variable: {}", port),
        Err(_) => info!("PORT environment variable: not set"),
    }
}

/// Load the dataset and assemble the shared application state.
///
/// The load outcome is made explicit here: a failure is logged and the engine
/// is built degraded rather than the process aborting.
fn initialize_components(config: Arc<Config>) -> AppState {
    info!(
        "Loading dataset from {} source(s)...",
        config.dataset.sources.len()
    );

    let table = match dataset::load_sources(&config.dataset.sources) {
        Ok(table) => {
            info!("Dataset loaded: {} records", table.row_count());
            Some(table)
        }
        Err(e) => {
            error!("Dataset load failed ({}): {}", e.category(), e);
            warn!("Serving in degraded mode; lookups will be refused");
            None
        }
    };

    let engine = Arc::new(LookupEngine::new(config.dataset.keys.clone(), table));
    AppState { config, engine }
}

/// Validate configuration and source-file presence, then exit
fn run_health_checks(config: &Config) -> Result<()> {
    info!("Running health checks...");
    info!("✓ Configuration is valid");

    for source in &config.dataset.sources {
        if !source.exists() {
            return Err(LookupError::SourceRead {
                source_path: source.display().to_string(),
                details: "file not found".to_string(),
            });
        }
    }
    info!("✓ All {} source file(s) exist", config.dataset.sources.len());

    let table = dataset::load_sources(&config.dataset.sources)?;
    info!("✓ Dataset loads cleanly: {} records", table.row_count());

    info!("All health checks passed!");
    Ok(())
}

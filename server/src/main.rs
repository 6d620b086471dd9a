use anyhow::{Context, Result};
use clap::Parser;
use tasklist_server::config::{Config, StorageBackend};
use tasklist_server::setup::initialize_app;
use tasklist_server::telemetry::{
    init_telemetry, log_config_validation, log_shutdown_info, log_startup_info, report_error,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tasklist-server")]
#[command(about = "Task list web service")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE")]
    config: Option<String>,

    /// Database URL override
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Listen address override
    #[arg(long, env = "LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Port override
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Log level override
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Storage backend override (sqlite, memory)
    #[arg(long, env = "STORAGE_BACKEND")]
    storage: Option<StorageBackend>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(config_file) => Config::from_file(config_file)?,
        None => Config::from_env()?,
    };

    // CLI flags win over every other source
    if let Some(ref database_url) = cli.database_url {
        config.database.url = Some(database_url.clone());
    }

    if let Some(ref listen_addr) = cli.listen_addr {
        config.server.listen_addr = listen_addr.clone();
    }

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Some(ref log_level) = cli.log_level {
        config.logging.level = log_level.clone();
    }

    if let Some(backend) = cli.storage {
        config.storage.backend = backend;
    }

    Ok(config)
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config(&cli).context("Failed to load configuration")?;

    init_telemetry(&config.logging).context("Failed to initialize telemetry")?;

    log_config_validation(&config);

    if config.validate().is_err() {
        std::process::exit(1);
    }

    log_startup_info(&config);

    let server = match initialize_app(&config).await {
        Ok(server) => server,
        Err(e) => {
            report_error(&e, "startup");
            std::process::exit(1);
        }
    };

    let addr = config.server_address()?;

    if let Err(e) = server.serve_with_shutdown(addr, shutdown_signal()).await {
        error!(error = %e, "Task list server error");
        std::process::exit(3);
    }

    log_shutdown_info();
    Ok(())
}

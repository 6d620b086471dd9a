use anyhow::{Context, Result};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::config::{Config, LogFormat, LoggingConfig, StorageBackend};

/// Build the level filter. `RUST_LOG` wins over the configured level
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log level configuration")
}

/// Initialize the tracing subscriber for logging and telemetry
pub fn init_telemetry(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;

    let registry = Registry::default().with(env_filter);

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true);

            registry.with(fmt_layer).try_init()
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_list(true)
                .flatten_event(true);

            registry.with(fmt_layer).try_init()
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false);

            registry.with(fmt_layer).try_init()
        }
    }
    .context("Failed to install tracing subscriber")?;

    tracing::info!(
        log_level = %config.level,
        log_format = ?config.format,
        "Telemetry initialized"
    );

    Ok(())
}

/// Log server startup information
pub fn log_startup_info(config: &Config) {
    let address = config
        .server_address()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| format!("{}:{}", config.server.listen_addr, config.server.port));

    match config.storage.backend {
        StorageBackend::Sqlite => tracing::info!(
            backend = %config.storage.backend,
            server_address = %address,
            database_url = %config.database_url().unwrap_or_else(|| "<unset>".to_string()),
            connect_attempts = config.database.connect_attempts,
            request_attempts = config.database.request_attempts,
            "Task list server starting up"
        ),
        StorageBackend::Memory => tracing::info!(
            backend = %config.storage.backend,
            server_address = %address,
            seed_sample_tasks = config.storage.seed_sample_tasks,
            "Task list server starting up"
        ),
    }
}

/// Log server shutdown information
pub fn log_shutdown_info() {
    tracing::info!("Task list server shutting down gracefully");
}

/// Log configuration validation
pub fn log_config_validation(config: &Config) {
    match config.validate() {
        Ok(()) => {
            tracing::info!("Configuration validation passed");
        }
        Err(e) => {
            tracing::error!(error = %e, "Configuration validation failed");
        }
    }
}

/// Log an error with its full cause chain
pub fn report_error(error: &anyhow::Error, context: &str) {
    tracing::error!(
        error = %error,
        context = context,
        "Operation failed"
    );

    for (depth, cause) in error.chain().skip(1).enumerate() {
        tracing::error!(
            error = %cause,
            depth = depth + 1,
            "Error cause"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_env_filter() {
        // RUST_LOG may be set in the environment; either source must parse
        for level in ["trace", "debug", "info", "warn", "error"] {
            let config = LoggingConfig {
                level: level.to_string(),
                format: LogFormat::Compact,
            };
            assert!(build_env_filter(&config).is_ok());
        }
    }

    #[test]
    fn test_logging_helpers_do_not_panic() {
        // No subscriber is installed here, so these only exercise formatting
        let mut config = Config::default();
        log_startup_info(&config);
        log_config_validation(&config);

        config.storage.backend = StorageBackend::Memory;
        config.server.listen_addr = "not-an-ip".to_string();
        log_startup_info(&config);
        log_config_validation(&config);

        let error = anyhow::anyhow!("root cause").context("outer");
        report_error(&error, "test");
        log_shutdown_info();
    }
}

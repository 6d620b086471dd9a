use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use task_core::{Backoff, RetryPolicy};

/// Prefix for `TASKLIST_<SECTION>__<KEY>` overrides
const ENV_PREFIX: &str = "TASKLIST";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Which repository implementation backs the API
    pub backend: StorageBackend,
    /// Preload sample tasks into the memory backend
    pub seed_sample_tasks: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow::anyhow!(
                "Invalid storage backend: {other}. Must be one of: sqlite, memory"
            )),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    /// Database URL. Required by the sqlite backend; checked at first connection
    pub url: Option<String>,
    /// Connection attempts at startup before giving up
    pub connect_attempts: u32,
    /// Base pause between connection attempts, in milliseconds
    pub retry_delay_ms: u64,
    /// How the pause grows between attempts
    pub backoff: Backoff,
    /// Connection attempts for each API request
    pub request_attempts: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind
    pub listen_addr: String,
    /// Port number to listen on
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json, compact)
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl Config {
    /// Load configuration from the defaults, `CONFIG_FILE` and environment variables
    pub fn from_env() -> Result<Self> {
        let config_file = env::var("CONFIG_FILE").ok();
        Self::load(config_file.as_deref(), false)
    }

    /// Load configuration from a specific file path layered over the defaults
    pub fn from_file(path: &str) -> Result<Self> {
        Self::load(Some(path), true)
    }

    fn load(config_file: Option<&str>, required: bool) -> Result<Self> {
        let mut builder = ConfigBuilder::builder().add_source(File::from_str(
            include_str!("../config/default.toml"),
            FileFormat::Toml,
        ));

        if let Some(config_file) = config_file {
            builder = builder.add_source(
                File::with_name(config_file)
                    .required(required)
                    .format(FileFormat::Toml),
            );
        }

        // TASKLIST_DATABASE__URL, TASKLIST_SERVER__PORT, ...
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?;

        let mut result: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        result.apply_standard_env_vars(|name| env::var(name).ok())?;

        Ok(result)
    }

    /// Apply standard variables (DATABASE_URL, LISTEN_ADDR, PORT, LOG_LEVEL, STORAGE_BACKEND)
    pub fn apply_standard_env_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(database_url) = lookup("DATABASE_URL") {
            self.database.url = Some(database_url);
        }

        if let Some(listen_addr) = lookup("LISTEN_ADDR") {
            self.server.listen_addr = listen_addr;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }

        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.logging.level = log_level;
        }

        if let Some(backend) = lookup("STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }

        Ok(())
    }

    /// Configured database URL, if any non-blank one is set
    pub fn database_url(&self) -> Option<String> {
        self.database
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }

    /// Get the server socket address
    pub fn server_address(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .listen_addr
            .trim()
            .parse()
            .with_context(|| format!("Invalid listen address: {}", self.server.listen_addr))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Retry policy for the schema setup connection at startup
    pub fn startup_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.database.connect_attempts,
            Duration::from_millis(self.database.retry_delay_ms),
            self.database.backoff,
        )
    }

    /// Retry policy for the connection opened by each API request
    pub fn request_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.database.request_attempts,
            Duration::from_millis(self.database.retry_delay_ms),
            self.database.backoff,
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ));
            }
        }

        // Validate server configuration
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }
        self.server_address()?;

        if self.database.connect_attempts == 0 {
            return Err(anyhow::anyhow!(
                "Database connect_attempts must be greater than 0"
            ));
        }

        if self.database.request_attempts == 0 {
            return Err(anyhow::anyhow!(
                "Database request_attempts must be greater than 0"
            ));
        }

        // A missing URL is reported at the first connection, not here
        if self.storage.backend == StorageBackend::Sqlite {
            if let Some(url) = self.database_url() {
                validate_database_url(&url)?;
            }
        }

        Ok(())
    }
}

/// Accept `sqlite:` URLs and bare file paths; reject other schemes and
/// in-memory SQLite, which per-request connections would each see empty
fn validate_database_url(url: &str) -> Result<()> {
    if url.contains(":memory:") || url.contains("mode=memory") {
        return Err(anyhow::anyhow!(
            "In-memory SQLite URLs are not supported: {url}. Use storage.backend = \"memory\" instead"
        ));
    }

    if !url.starts_with("sqlite:") && url.contains("://") {
        return Err(anyhow::anyhow!(
            "Only SQLite databases are supported. URL must start with 'sqlite://'. Got: {url}"
        ));
    }

    Ok(())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Sqlite,
                seed_sample_tasks: false,
            },
            database: DatabaseConfig {
                url: None,
                connect_attempts: 10,
                retry_delay_ms: 2000,
                backoff: Backoff::Fixed,
                request_attempts: 1,
            },
            server: ServerConfig {
                listen_addr: "0.0.0.0".to_string(),
                port: 5000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}

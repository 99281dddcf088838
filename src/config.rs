// Configuration module
// Loads settings from an optional config file with in-code defaults;
// the PORT environment variable overrides the configured port.

use serde::Deserialize;
use std::net::SocketAddr;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Content roots: where exam files and static assets live
#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    pub exam_dir: String,
    pub static_dir: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

impl Config {
    /// Load configuration from "config.toml" in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    /// The file is optional; defaults cover every key.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("content.exam_dir", "json")?
            .set_default("content.static_dir", ".")?
            .set_default("logging.access_log", true)?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;

        // PORT takes precedence over the file, matching the reference
        // deployment's contract. A set-but-unparseable value is a startup
        // error rather than a silent fallback.
        if let Ok(port) = std::env::var("PORT") {
            cfg.server.port = port.parse().map_err(|e| {
                config::ConfigError::Message(format!("invalid PORT value '{port}': {e}"))
            })?;
        }

        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

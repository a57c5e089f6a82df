//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the freight lookup service: server settings,
//! the dataset source list, and the key-column mapping that parameterizes the
//! lookup engine. The near-duplicate service variants of the original system
//! differ only in these values, so they live in configuration rather than in
//! code.
//!
//! ## Input/Output Specification
//! - **Input**: Configuration file (TOML), environment variables, CLI overrides
//! - **Output**: Validated configuration structs with defaults and overrides
//! - **Validation**: Non-empty source list, usable ports, non-empty key names
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use freight_lookup::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{LookupError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Dataset sources and key-column mapping
    pub dataset: DatasetConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Number of worker threads for the HTTP server
    pub workers: usize,
    /// Enable CORS
    pub enable_cors: bool,
}

/// Dataset sources and the key-column mapping used by the lookup engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Ordered list of CSV source files; rows are concatenated in this order
    pub sources: Vec<PathBuf>,
    /// Column names used as lookup keys
    pub keys: KeyColumns,
}

/// Column names the lookup engine matches against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyColumns {
    /// Carrier primary key column (numeric equality)
    pub dot_number: String,
    /// Container number column (byte-exact equality)
    pub container_number: String,
    /// Bill-of-lading reference column (byte-exact equality)
    pub bol: String,
    /// Consignee column (case-insensitive filter)
    pub consignee: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| LookupError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| LookupError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("FREIGHT_LOOKUP_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("FREIGHT_LOOKUP_PORT") {
            self.server.port = port.parse().map_err(|_| LookupError::Config {
                message: "Invalid port number in FREIGHT_LOOKUP_PORT".to_string(),
            })?;
        }
        // The hosting platform of the original service injects a bare PORT
        // variable; honor it with lower precedence than the namespaced one.
        if std::env::var("FREIGHT_LOOKUP_PORT").is_err() {
            if let Ok(port) = std::env::var("PORT") {
                self.server.port = port.parse().map_err(|_| LookupError::Config {
                    message: "Invalid port number in PORT".to_string(),
                })?;
            }
        }
        if let Ok(dir) = std::env::var("FREIGHT_LOOKUP_DATA_DIR") {
            let dir = PathBuf::from(dir);
            self.dataset.sources = self
                .dataset
                .sources
                .iter()
                .map(|p| match p.file_name() {
                    Some(name) => dir.join(name),
                    None => p.clone(),
                })
                .collect();
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(LookupError::ValidationFailed {
                field: "server.port".to_string(),
                reason: "Port cannot be zero".to_string(),
            });
        }

        if self.server.workers == 0 {
            return Err(LookupError::ValidationFailed {
                field: "server.workers".to_string(),
                reason: "Worker count cannot be zero".to_string(),
            });
        }

        if self.dataset.sources.is_empty() {
            return Err(LookupError::ValidationFailed {
                field: "dataset.sources".to_string(),
                reason: "At least one source file must be configured".to_string(),
            });
        }

        for (name, value) in [
            ("dataset.keys.dot_number", &self.dataset.keys.dot_number),
            (
                "dataset.keys.container_number",
                &self.dataset.keys.container_number,
            ),
            ("dataset.keys.bol", &self.dataset.keys.bol),
            ("dataset.keys.consignee", &self.dataset.keys.consignee),
        ] {
            if value.trim().is_empty() {
                return Err(LookupError::ValidationFailed {
                    field: name.to_string(),
                    reason: "Key column name cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                workers: num_cpus::get(),
                enable_cors: true,
            },
            dataset: DatasetConfig {
                sources: vec![
                    PathBuf::from("data1.csv"),
                    PathBuf::from("data2.csv"),
                    PathBuf::from("data3.csv"),
                ],
                keys: KeyColumns::default(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

impl Default for KeyColumns {
    fn default() -> Self {
        Self {
            dot_number: "DOT_NUMBER".to_string(),
            container_number: "CONTAINER_NUMBER".to_string(),
            bol: "BOL_NUMBER".to_string(),
            consignee: "CONSIGNEE".to_string(),
        }
    }
}

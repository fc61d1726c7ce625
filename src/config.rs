//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `HACKHUB_*` environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub smtp: SmtpConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("hackhub").join("hackhub.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./hackhub_data/hackhub.db".to_string())
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Media host configuration for payment screenshots
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// "local" or "cloudinary"
    #[serde(default = "default_media_provider")]
    pub provider: String,

    /// Directory used by the local provider
    #[serde(default = "default_media_dir")]
    pub local_dir: String,

    /// Public URL prefix for locally stored files
    #[serde(default = "default_media_url")]
    pub public_url: String,

    #[serde(default)]
    pub cloud_name: String,

    /// Unsigned upload preset configured on the media host
    #[serde(default)]
    pub upload_preset: String,
}

fn default_media_provider() -> String {
    "local".to_string()
}

fn default_media_dir() -> String {
    "./hackhub_data/media".to_string()
}

fn default_media_url() -> String {
    "http://localhost:8082/media".to_string()
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            provider: default_media_provider(),
            local_dir: default_media_dir(),
            public_url: default_media_url(),
            cloud_name: String::new(),
            upload_preset: String::new(),
        }
    }
}

/// SMTP relay configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_smtp_host")]
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_smtp_from")]
    pub from: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_from() -> String {
    "HackHub <no-reply@hackhub.local>".to_string()
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: default_smtp_from(),
        }
    }
}

/// HTTP access layer configuration (used by the CLI)
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_client_timeout")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    crate::client::DEFAULT_BASE_URL.to_string()
}

fn default_client_timeout() -> u64 {
    10_000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_client_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub fn filter_directive(&self) -> String {
        format!("hackhub={},tower_http=debug", self.level)
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            std::env::var("HACKHUB_CONFIG").ok().map(PathBuf::from),
            dirs::config_dir().map(|p| p.join("hackhub").join("config.toml")),
            Some(PathBuf::from("/etc/hackhub/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(host) = var("HACKHUB_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("HACKHUB_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        // Database overrides
        if let Some(path) = var("HACKHUB_DB_PATH") {
            self.database.path = path;
        }

        // Media overrides
        if let Some(provider) = var("HACKHUB_MEDIA_PROVIDER") {
            self.media.provider = provider;
        }
        if let Some(dir) = var("HACKHUB_MEDIA_DIR") {
            self.media.local_dir = dir;
        }
        if let Some(cloud) = var("HACKHUB_CLOUD_NAME") {
            self.media.cloud_name = cloud;
        }
        if let Some(preset) = var("HACKHUB_UPLOAD_PRESET") {
            self.media.upload_preset = preset;
        }

        // SMTP overrides
        if let Some(host) = var("HACKHUB_SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Some(user) = var("HACKHUB_SMTP_USER") {
            self.smtp.username = user;
        }
        if let Some(pass) = var("HACKHUB_SMTP_PASSWORD") {
            self.smtp.password = pass;
        }
        if let Some(enabled) = var("HACKHUB_SMTP_ENABLED") {
            self.smtp.enabled = enabled.to_lowercase() != "false" && enabled != "0";
        }

        // Client overrides
        if let Some(url) = var("HACKHUB_API_URL") {
            self.client.base_url = url;
        }

        // Logging overrides
        if let Some(level) = var("HACKHUB_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("HACKHUB_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# HackHub Configuration
#
# Environment variables override these settings:
# - HACKHUB_HOST, HACKHUB_PORT
# - HACKHUB_DB_PATH
# - HACKHUB_MEDIA_PROVIDER, HACKHUB_MEDIA_DIR, HACKHUB_CLOUD_NAME, HACKHUB_UPLOAD_PRESET
# - HACKHUB_SMTP_ENABLED, HACKHUB_SMTP_HOST, HACKHUB_SMTP_USER, HACKHUB_SMTP_PASSWORD
# - HACKHUB_API_URL
# - HACKHUB_LOG_LEVEL, HACKHUB_LOG_FORMAT

[server]
host = "0.0.0.0"
port = 8082
cors_origins = ["http://localhost:5173", "http://127.0.0.1:5173"]

[database]
# SQLite database file
path = "./hackhub_data/hackhub.db"

[media]
# Where payment screenshots go: "local" or "cloudinary"
provider = "local"
local_dir = "./hackhub_data/media"
public_url = "http://localhost:8082/media"

# Cloudinary settings (provider = "cloudinary")
cloud_name = ""
upload_preset = ""

[smtp]
# Notification emails are skipped while disabled
enabled = false
host = "smtp.gmail.com"
port = 587
username = ""
password = ""
from = "HackHub <no-reply@hackhub.local>"

[client]
# Base URL used by hackhub-cli
base_url = "http://localhost:8082/api/v1"
timeout_ms = 10000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::session::BootPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub autosave: AutosaveConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// REST backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Session and routing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Directory holding the persisted token store
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// How a persisted token is treated on boot
    #[serde(default)]
    pub boot_policy: BootPolicy,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Where authenticated visitors of public-only pages are sent
    #[serde(default = "default_landing_path")]
    pub default_path: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("dino").to_string_lossy().to_string())
        .unwrap_or_else(|| "./dino_data".to_string())
}

fn default_login_path() -> String {
    "/login".to_string()
}

fn default_landing_path() -> String {
    "/classes".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            boot_policy: BootPolicy::default(),
            login_path: default_login_path(),
            default_path: default_landing_path(),
        }
    }
}

impl SessionConfig {
    /// Path of the JSON file backing the token store
    pub fn store_path(&self) -> PathBuf {
        expand_home(&self.data_dir).join("storage.json")
    }
}

/// Resolve a leading `~` against the user's home directory
fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => &rest[1..],
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Note autosave configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AutosaveConfig {
    #[serde(default = "default_autosave_delay")]
    pub delay_ms: u64,
}

fn default_autosave_delay() -> u64 {
    2000
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_autosave_delay(),
        }
    }
}

/// Notification polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    30
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
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
    "warn".to_string()
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

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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
            dirs::config_dir().map(|p| p.join("dino").join("config.toml")),
            Some(PathBuf::from("/etc/dino/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("DINO_API_URL") {
            self.api.base_url = url;
        }

        if let Ok(data_dir) = std::env::var("DINO_DATA_DIR") {
            self.session.data_dir = data_dir;
        }
        if let Ok(policy) = std::env::var("DINO_BOOT_POLICY") {
            match policy.parse() {
                Ok(p) => self.session.boot_policy = p,
                Err(e) => tracing::warn!("Ignoring DINO_BOOT_POLICY: {}", e),
            }
        }

        if let Ok(delay) = std::env::var("DINO_AUTOSAVE_DELAY_MS") {
            if let Ok(d) = delay.parse() {
                self.autosave.delay_ms = d;
            }
        }

        if let Ok(level) = std::env::var("DINO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("DINO_LOG_FORMAT") {
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
    r#"# Dino Configuration
#
# Environment variables override these settings:
# - DINO_API_URL
# - DINO_DATA_DIR
# - DINO_BOOT_POLICY
# - DINO_AUTOSAVE_DELAY_MS
# - DINO_LOG_LEVEL
# - DINO_LOG_FORMAT

[api]
# Base URL of the platform REST API
base_url = "http://localhost:3000/api"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# Directory holding the persisted session token
data_dir = "~/.local/share/dino"

# How a stored token is treated on startup:
# - "validate": confirm it against the profile endpoint
# - "trust_token": treat token presence as authenticated
boot_policy = "validate"

# Login page, target of session-expiry redirects
login_path = "/login"

# Where signed-in users land when they open login/register
default_path = "/classes"

[autosave]
# Quiet period after the last keystroke before a note is saved (ms)
delay_ms = 2000

[notifications]
# How often the unread count is refreshed (seconds)
poll_interval_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

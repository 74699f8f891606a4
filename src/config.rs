//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.
//!
//! The structures are always available (the dashboard reuses the defaults);
//! loading from disk requires the `native` feature.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default assistant service URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default CSV locations, relative to the served site root
pub const DEFAULT_PROFILES_CSV: &str = "/data/cleaned_doctor_profiles_info2.csv";
pub const DEFAULT_DIRECTORY_CSV: &str = "/data/doctors_dataset.csv";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub datasets: DatasetConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which chat transport to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Real assistant service over HTTP
    #[default]
    Http,
    /// Canned replies, no network
    Simulated,
}

impl FromStr for TransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(TransportKind::Http),
            "simulated" | "mock" => Ok(TransportKind::Simulated),
            other => Err(ConfigError::Invalid(format!("unknown transport {other:?}"))),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Http => f.write_str("http"),
            TransportKind::Simulated => f.write_str("simulated"),
        }
    }
}

/// Chat service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub transport: TransportKind,

    /// Pause between simulated fragments
    #[serde(default = "default_simulated_delay")]
    pub simulated_delay_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_simulated_delay() -> u64 {
    50
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            transport: TransportKind::default(),
            simulated_delay_ms: default_simulated_delay(),
        }
    }
}

/// Dataset locations
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_profiles")]
    pub profiles: String,

    #[serde(default = "default_directory")]
    pub directory: String,
}

fn default_profiles() -> String {
    DEFAULT_PROFILES_CSV.to_string()
}

fn default_directory() -> String {
    DEFAULT_DIRECTORY_CSV.to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
            directory: default_directory(),
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

#[cfg(feature = "native")]
impl Config {
    /// Load configuration from a file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
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
    pub fn load_with_env(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("tunimed").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("TUNIMED_API_URL") {
            self.chat.base_url = url;
        }
        if let Ok(transport) = std::env::var("TUNIMED_TRANSPORT") {
            match transport.parse() {
                Ok(kind) => self.chat.transport = kind,
                Err(e) => tracing::warn!("Ignoring TUNIMED_TRANSPORT: {}", e),
            }
        }

        if let Ok(level) = std::env::var("TUNIMED_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TUNIMED_LOG_FORMAT") {
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

    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# TuniMed Configuration
#
# Environment variables override these settings:
# - TUNIMED_API_URL
# - TUNIMED_TRANSPORT
# - TUNIMED_LOG_LEVEL
# - TUNIMED_LOG_FORMAT

[chat]
# Medical assistant service (POST {base_url}/api/chat)
base_url = "http://localhost:8000"

# Transport: "http" for the real service, "simulated" for canned replies
transport = "http"

# Pause between simulated reply fragments (ms)
simulated_delay_ms = 50

[datasets]
# Doctor profiles (single working-hours column)
profiles = "/data/cleaned_doctor_profiles_info2.csv"

# Doctor directory (profile URL and per-day working hours)
directory = "/data/doctors_dataset.csv"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(all(test, feature = "native"))]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.chat.base_url, "http://localhost:8000");
        assert_eq!(config.chat.transport, TransportKind::Http);
        assert_eq!(config.datasets.directory, DEFAULT_DIRECTORY_CSV);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_transport_kind_parse() {
        assert_eq!("HTTP".parse::<TransportKind>().unwrap(), TransportKind::Http);
        assert_eq!(
            "simulated".parse::<TransportKind>().unwrap(),
            TransportKind::Simulated
        );
        assert!("carrier-pigeon".parse::<TransportKind>().is_err());
    }

    #[test]
    fn test_default_template_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.chat.simulated_delay_ms, 50);
        assert_eq!(config.datasets.profiles, DEFAULT_PROFILES_CSV);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chat]\ntransport = \"simulated\"\nbase_url = \"http://10.0.0.2:9000\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.chat.transport, TransportKind::Simulated);
        assert_eq!(config.chat.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(std::path::Path::new("/nonexistent/tunimed.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

//! Configuration module for filedrop.

use serde::Deserialize;
use std::path::Path;

use crate::{FiledropError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upload handling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory uploaded files are stored in.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    /// Expected authorization token. Absent means authorization is disabled.
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_upload_dir() -> String {
    "data/uploads".to_string()
}

fn default_max_upload_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            auth_token: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/filedrop.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl LoggingConfig {
    /// Resolve the configured level string to a tracing level.
    ///
    /// Unknown values fall back to INFO.
    pub fn tracing_level(&self) -> tracing::Level {
        match self.level.to_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "info" => tracing::Level::INFO,
            "warn" | "warning" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload settings.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FiledropError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FiledropError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEDROP_AUTH_TOKEN`: Override the expected upload token
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("FILEDROP_AUTH_TOKEN") {
            if !token.is_empty() {
                self.upload.auth_token = Some(token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upload.dir, "data/uploads");
        assert_eq!(config.upload.max_upload_bytes, 5 * 1024 * 1024);
        assert!(config.upload.auth_token.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upload.max_upload_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_parse_partial() {
        let config = Config::parse(
            r#"
            [upload]
            dir = "/tmp/uploads"
            max_upload_bytes = 1024
            "#,
        )
        .unwrap();

        assert_eq!(config.upload.dir, "/tmp/uploads");
        assert_eq!(config.upload.max_upload_bytes, 1024);
        // Untouched sections keep their defaults
        assert_eq!(config.server.port, 8080);
        assert!(config.upload.auth_token.is_none());
    }

    #[test]
    fn test_parse_auth_token() {
        let config = Config::parse(
            r#"
            [upload]
            auth_token = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.upload.auth_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = Config::parse("this is not toml [");
        assert!(matches!(result, Err(FiledropError::Config(_))));
    }

    #[test]
    fn test_env_override_auth_token() {
        std::env::set_var("FILEDROP_AUTH_TOKEN", "from-env");

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.upload.auth_token.as_deref(), Some("from-env"));

        std::env::remove_var("FILEDROP_AUTH_TOKEN");
    }

    #[test]
    fn test_tracing_level_known_values() {
        let mut config = LoggingConfig::default();
        for (name, level) in [
            ("trace", tracing::Level::TRACE),
            ("debug", tracing::Level::DEBUG),
            ("info", tracing::Level::INFO),
            ("warn", tracing::Level::WARN),
            ("warning", tracing::Level::WARN),
            ("error", tracing::Level::ERROR),
        ] {
            config.level = name.to_string();
            assert_eq!(config.tracing_level(), level);
        }
    }

    #[test]
    fn test_tracing_level_case_insensitive() {
        let mut config = LoggingConfig::default();
        config.level = "DEBUG".to_string();
        assert_eq!(config.tracing_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_tracing_level_unknown_falls_back_to_info() {
        let mut config = LoggingConfig::default();
        config.level = "verbose".to_string();
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("does/not/exist.toml");
        assert!(matches!(result, Err(FiledropError::Io(_))));
    }
}

//! Configuration management for the RAX file API
//!
//! Values come from built-in defaults, an optional `config.toml` and
//! `FILE_API_*` environment variables, in increasing priority.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default config file looked up in the working directory (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Server configuration, fixed for the lifetime of the process
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address the HTTP listener binds to
    pub bind_address: String,

    /// HTTP port. `0` asks the OS for an ephemeral port.
    pub port: u16,

    /// Directory that holds every managed file
    pub base_dir: String,

    /// Largest accepted request body
    pub max_body_bytes: usize,

    /// Time allowed to receive one complete request, also the keep-alive idle timeout
    pub request_timeout_secs: u64,

    /// Maximum concurrently served connections
    pub max_connections: usize,

    /// How long shutdown waits for in-flight connections before abandoning them
    pub shutdown_grace_secs: u64,

    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            base_dir: "./data".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout_secs: 30,
            max_connections: 64,
            shutdown_grace_secs: 10,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the given file (if present) with environment overrides
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("base_dir", defaults.base_dir)?
            .set_default("max_body_bytes", defaults.max_body_bytes as i64)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs as i64)?
            .set_default("max_connections", defaults.max_connections as i64)?
            .set_default("shutdown_grace_secs", defaults.shutdown_grace_secs as i64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("FILE_API"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.bind_address.is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.base_dir.is_empty() {
            return Err(config::ConfigError::Message(
                "base_dir cannot be empty".into(),
            ));
        }

        if self.max_body_bytes == 0 {
            return Err(config::ConfigError::Message(
                "max_body_bytes must be greater than 0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.max_connections == 0 {
            return Err(config::ConfigError::Message(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get base directory as PathBuf
    pub fn base_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.base_dir)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.listen_socket(), "127.0.0.1:3000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.shutdown_grace(), Duration::from_secs(10));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let config = ServerConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.max_connections, 64);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "port = 8081\nbase_dir = \"/tmp/store\"\nmax_connections = 4\nshutdown_grace_secs = 2"
        )
        .unwrap();

        let config = ServerConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.base_dir_path(), PathBuf::from("/tmp/store"));
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.shutdown_grace_secs, 2);
        assert_eq!(config.bind_address, "127.0.0.1");
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let config = ServerConfig {
            max_body_bytes: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            base_dir: String::new(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

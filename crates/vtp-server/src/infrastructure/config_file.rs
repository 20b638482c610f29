//! TOML configuration file for the server.
//!
//! The file is optional and every field has a default, so a file containing
//! only the settings the operator cares about is enough:
//!
//! ```toml
//! [server]
//! bind_address = "127.0.0.1"
//! port = 9000
//!
//! [ping]
//! echo_delay_ms = 100
//! ```
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file.  CLI flags are
//! applied on top of the loaded [`FileConfig`] before it is converted into a
//! [`ServerConfig`].

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::config::{
    PingTiming, ServerConfig, DEFAULT_NODE, DEFAULT_PORT, DEFAULT_WS_PATH,
};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `bind_address` is not an IP address.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddress {
        value: String,
        #[source]
        source: AddrParseError,
    },

    /// `ws_path` does not start with `/`.
    #[error("WebSocket path must start with '/': '{0}'")]
    InvalidWsPath(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub ping: PingSection,
    #[serde(default)]
    pub log: LogSection,
}

/// Listener and request defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// IP address to bind to.  `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_ws_path")]
    pub ws_path: String,
    /// Device id for requests without a `node`.
    #[serde(default = "default_node")]
    pub default_node: String,
}

/// Simulated ping timing, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PingSection {
    #[serde(default = "default_echo_delay_ms")]
    pub echo_delay_ms: u64,
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogSection {
    /// `tracing` filter: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_ws_path() -> String {
    DEFAULT_WS_PATH.to_string()
}
fn default_node() -> String {
    DEFAULT_NODE.to_string()
}
fn default_echo_delay_ms() -> u64 {
    500
}
fn default_reply_delay_ms() -> u64 {
    1500
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            ws_path: default_ws_path(),
            default_node: default_node(),
        }
    }
}

impl Default for PingSection {
    fn default() -> Self {
        Self {
            echo_delay_ms: default_echo_delay_ms(),
            reply_delay_ms: default_reply_delay_ms(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl FileConfig {
    /// Validates the settings and converts them into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if `bind_address` is not an
    /// IP address, and [`ConfigError::InvalidWsPath`] if `ws_path` is not
    /// absolute.
    pub fn into_server_config(self) -> Result<ServerConfig, ConfigError> {
        let ip: IpAddr =
            self.server
                .bind_address
                .parse()
                .map_err(|source| ConfigError::InvalidBindAddress {
                    value: self.server.bind_address.clone(),
                    source,
                })?;

        if !self.server.ws_path.starts_with('/') {
            return Err(ConfigError::InvalidWsPath(self.server.ws_path));
        }

        Ok(ServerConfig {
            ws_bind_addr: SocketAddr::new(ip, self.server.port),
            ws_path: self.server.ws_path,
            default_node: self.server.default_node,
            ping: PingTiming {
                echo_delay: Duration::from_millis(self.ping.echo_delay_ms),
                reply_delay: Duration::from_millis(self.ping.reply_delay_ms),
            },
            log_level: self.log.level,
        })
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads a [`FileConfig`] from `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read (including when it
/// does not exist) and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_default_file_config_matches_server_defaults() {
        // Arrange / Act
        let cfg = FileConfig::default().into_server_config().unwrap();

        // Assert
        assert_eq!(cfg, ServerConfig::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        // Arrange
        let file = write_temp("[server]\nport = 9000\n\n[ping]\necho_delay_ms = 10\n");

        // Act
        let cfg = load_config_file(file.path())
            .unwrap()
            .into_server_config()
            .unwrap();

        // Assert
        assert_eq!(cfg.ws_bind_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(cfg.ws_path, "/ws");
        assert_eq!(cfg.ping.echo_delay, Duration::from_millis(10));
        assert_eq!(cfg.ping.reply_delay, Duration::from_millis(1500));
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let file = write_temp("");
        let loaded = load_config_file(file.path()).unwrap();
        assert_eq!(loaded, FileConfig::default());
    }

    #[test]
    fn test_full_file_is_applied() {
        let file = write_temp(
            r#"
[server]
bind_address = "127.0.0.1"
port = 8100
ws_path = "/vtp"
default_node = "SW1"

[ping]
echo_delay_ms = 1
reply_delay_ms = 2

[log]
level = "debug"
"#,
        );

        let cfg = load_config_file(file.path())
            .unwrap()
            .into_server_config()
            .unwrap();

        assert_eq!(cfg.ws_bind_addr.to_string(), "127.0.0.1:8100");
        assert_eq!(cfg.ws_path, "/vtp");
        assert_eq!(cfg.default_node, "SW1");
        assert_eq!(cfg.ping.reply_delay, Duration::from_millis(2));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn test_ipv6_bind_address_is_accepted() {
        let mut file_cfg = FileConfig::default();
        file_cfg.server.bind_address = "::1".to_string();

        let cfg = file_cfg.into_server_config().unwrap();

        assert_eq!(cfg.ws_bind_addr.to_string(), "[::1]:8000");
    }

    #[test]
    fn test_missing_file_returns_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() {
        let file = write_temp("[server\nport = ");
        let result = load_config_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_bind_address_returns_error() {
        let mut file_cfg = FileConfig::default();
        file_cfg.server.bind_address = "not.an.ip".to_string();

        let result = file_cfg.into_server_config();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidBindAddress { ref value, .. }) if value == "not.an.ip"
        ));
    }

    #[test]
    fn test_relative_ws_path_returns_error() {
        let mut file_cfg = FileConfig::default();
        file_cfg.server.ws_path = "ws".to_string();

        let result = file_cfg.into_server_config();

        assert!(matches!(result, Err(ConfigError::InvalidWsPath(_))));
    }
}

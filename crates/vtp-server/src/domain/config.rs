//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! It is assembled in `main.rs` from built-in defaults, an optional TOML file,
//! and CLI flags / environment variables, in increasing order of precedence.
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! reads in this layer) makes the server easy to embed in tests: a test builds
//! a `ServerConfig` literal and hands it to the server directly.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default WebSocket listener port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default WebSocket endpoint path.
pub const DEFAULT_WS_PATH: &str = "/ws";

/// Device id used when a request omits `node` or leaves it blank.
pub const DEFAULT_NODE: &str = "PC1";

/// All runtime configuration for the VTP simulator server.
///
/// Build once at startup and share behind an `Arc` across session tasks.
///
/// # Example
///
/// ```rust
/// use vtp_server::domain::ServerConfig;
///
/// let cfg = ServerConfig::default();
/// assert_eq!(cfg.ws_bind_addr.port(), 8000);
/// assert_eq!(cfg.ws_path, "/ws");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address and port the WebSocket listener binds to.
    pub ws_bind_addr: SocketAddr,

    /// HTTP path on which WebSocket upgrades are accepted.  Other paths get
    /// a 404 during the handshake.
    pub ws_path: String,

    /// Device id for requests that do not name a node.
    pub default_node: String,

    /// Timing of the scripted `ping` exchange.
    pub ping: PingTiming,

    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

/// Delays between the three events of a simulated ping.
///
/// ```text
/// log "Pinging X..."  ──echo_delay──►  flow ICMP  ──reply_delay──►  log "Reply received"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingTiming {
    pub echo_delay: Duration,
    pub reply_delay: Duration,
}

impl Default for PingTiming {
    fn default() -> Self {
        Self {
            echo_delay: Duration::from_millis(500),
            reply_delay: Duration::from_millis(1500),
        }
    }
}

impl Default for ServerConfig {
    /// | Field         | Default        |
    /// |---------------|----------------|
    /// | ws_bind_addr  | `0.0.0.0:8000` |
    /// | ws_path       | `/ws`          |
    /// | default_node  | `PC1`          |
    /// | ping          | 500 ms / 1500 ms |
    /// | log_level     | `info`         |
    fn default() -> Self {
        Self {
            ws_bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            ws_path: DEFAULT_WS_PATH.to_string(),
            default_node: DEFAULT_NODE.to_string(),
            ping: PingTiming::default(),
            log_level: "info".to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binds_all_interfaces_on_8000() {
        // Arrange / Act
        let cfg = ServerConfig::default();
        // Assert
        assert_eq!(cfg.ws_bind_addr.to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_default_path_and_node() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.ws_path, "/ws");
        assert_eq!(cfg.default_node, "PC1");
    }

    #[test]
    fn test_default_ping_timing() {
        let timing = PingTiming::default();
        assert_eq!(timing.echo_delay, Duration::from_millis(500));
        assert_eq!(timing.reply_delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_config_can_be_cloned() {
        // Cloneability is required so an Arc<ServerConfig> can be shared
        // across session tasks.
        let cfg = ServerConfig::default();
        assert_eq!(cfg.clone(), cfg);
    }
}

//! VTP Simulator Server: entry point.
//!
//! Accepts WebSocket connections from the browser console and answers
//! switch-style VTP commands against a shared, in-memory set of simulated
//! switches.
//!
//! # Usage
//!
//! ```text
//! vtp-server [OPTIONS]
//!
//! Options:
//!   --config        <PATH>  Optional TOML configuration file
//!   --bind          <IP>    Listener IP address [default: 0.0.0.0]
//!   --port          <PORT>  Listener port [default: 8000]
//!   --ws-path       <PATH>  WebSocket endpoint path [default: /ws]
//!   --default-node  <ID>    Device for requests without a node [default: PC1]
//!   --ping-echo-ms  <MS>    Delay before the ping flow event [default: 500]
//!   --ping-reply-ms <MS>    Delay before the ping reply [default: 1500]
//!   --log-level     <LVL>   Log filter when RUST_LOG is unset [default: info]
//! ```
//!
//! # Configuration precedence
//!
//! CLI flag, then its environment variable, then the `--config` file, then
//! the built-in default.
//!
//! | Variable            | Flag              |
//! |---------------------|-------------------|
//! | `VTP_CONFIG`        | `--config`        |
//! | `VTP_BIND`          | `--bind`          |
//! | `VTP_PORT`          | `--port`          |
//! | `VTP_WS_PATH`       | `--ws-path`       |
//! | `VTP_DEFAULT_NODE`  | `--default-node`  |
//! | `VTP_PING_ECHO_MS`  | `--ping-echo-ms`  |
//! | `VTP_PING_REPLY_MS` | `--ping-reply-ms` |
//! | `VTP_LOG`           | `--log-level`     |

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vtp_core::VtpService;
use vtp_server::domain::ServerConfig;
use vtp_server::infrastructure::{load_config_file, run_server, FileConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// VTP simulator backend.
///
/// Every flag is optional; unset flags fall back to the configuration file
/// and then to built-in defaults.
#[derive(Debug, Parser)]
#[command(
    name = "vtp-server",
    about = "WebSocket backend for the VTP simulator",
    version
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, env = "VTP_CONFIG")]
    config: Option<PathBuf>,

    /// IP address to bind the WebSocket listener to.
    #[arg(long, env = "VTP_BIND")]
    bind: Option<String>,

    /// TCP port for the WebSocket listener.
    #[arg(long, env = "VTP_PORT")]
    port: Option<u16>,

    /// Path on which WebSocket upgrades are accepted.
    #[arg(long, env = "VTP_WS_PATH")]
    ws_path: Option<String>,

    /// Device id for requests that omit `node`.
    #[arg(long, env = "VTP_DEFAULT_NODE")]
    default_node: Option<String>,

    /// Milliseconds between "Pinging ..." and the ICMP flow event.
    #[arg(long, env = "VTP_PING_ECHO_MS")]
    ping_echo_ms: Option<u64>,

    /// Milliseconds between the ICMP flow event and "Reply received ...".
    #[arg(long, env = "VTP_PING_REPLY_MS")]
    ping_reply_ms: Option<u64>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, env = "VTP_LOG")]
    log_level: Option<String>,
}

impl Cli {
    /// Loads the configuration file (if any), applies CLI overrides, and
    /// validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// merged bind address or WebSocket path is invalid.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        let mut file = match &self.config {
            Some(path) => load_config_file(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?,
            None => FileConfig::default(),
        };

        if let Some(bind) = self.bind {
            file.server.bind_address = bind;
        }
        if let Some(port) = self.port {
            file.server.port = port;
        }
        if let Some(ws_path) = self.ws_path {
            file.server.ws_path = ws_path;
        }
        if let Some(node) = self.default_node {
            file.server.default_node = node;
        }
        if let Some(ms) = self.ping_echo_ms {
            file.ping.echo_delay_ms = ms;
        }
        if let Some(ms) = self.ping_reply_ms {
            file.ping.reply_delay_ms = ms;
        }
        if let Some(level) = self.log_level {
            file.log.level = level;
        }

        file.into_server_config()
            .context("invalid server configuration")
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.into_server_config()?;

    // `RUST_LOG` wins; otherwise the configured level applies.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        "VTP simulator starting: ws={}{}, default node={}",
        config.ws_bind_addr, config.ws_path, config.default_node
    );

    // ── Graceful shutdown flag ─────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // One service for the whole process: every session sees the same devices.
    let service = VtpService::new();

    run_server(config, service, running).await?;

    info!("VTP simulator stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

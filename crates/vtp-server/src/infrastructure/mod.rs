//! Infrastructure layer for vtp-server.
//!
//! The infrastructure layer handles all I/O: accepting WebSocket connections
//! from browsers and reading the optional configuration file.
//!
//! # Responsibilities
//!
//! - Binding a TCP listener for browser WebSocket connections
//! - Performing the WebSocket HTTP upgrade handshake
//! - Spawning per-session Tokio tasks
//! - Handling the graceful shutdown signal
//! - Loading the TOML configuration file
//!
//! # What does NOT belong here?
//!
//! - Command routing and the ping script (that is the application layer)
//! - Message type definitions (that is the domain layer)

pub mod config_file;
pub mod ws_server;

// Re-export the primary entry points so `main.rs` can call them concisely.
pub use config_file::{load_config_file, ConfigError, FileConfig};
pub use ws_server::{run_server, serve};

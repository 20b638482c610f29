//! vtp-server library crate.
//!
//! Serves the VTP simulator over a JSON WebSocket protocol.  A browser console
//! sends switch-style command lines; the server routes them through
//! `vtp-core` and streams log and packet-flow events back.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser console (JSON over WebSocket)
//!         ↕
//! [vtp-server]
//!   ├── domain/           Pure types: request/event JSON, ServerConfig
//!   ├── application/      CommandSession: routing, ping script, EventSink seam
//!   └── infrastructure/
//!         ├── ws_server/   WebSocket accept loop (tokio-tungstenite)
//!         └── config_file/ Optional TOML configuration
//!         ↕
//! [vtp-core]  device store, domain registry, command handlers
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `vtp-core` only.
//! - `infrastructure` depends on all other layers plus `tokio` and `tungstenite`.

/// Domain layer: pure message and configuration types (no I/O).
pub mod domain;

/// Application layer: per-session command handling.
pub mod application;

/// Infrastructure layer: WebSocket server and configuration file.
pub mod infrastructure;

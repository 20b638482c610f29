//! Application layer for vtp-server.
//!
//! The application layer orchestrates the business logic: it knows *what* to
//! do, but delegates *how* to do it to the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Decoding inbound console requests and routing them to `vtp-core`
//! - Playing the scripted ping exchange
//! - Defining the `EventSink` seam and the `SessionError` type
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or listening for connections (that is infrastructure)
//! - WebSocket framing (handled by tokio-tungstenite)

pub mod session_service;

pub use session_service::{CommandSession, EventSink, SessionError, GREETING};

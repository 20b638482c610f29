//! Per-connection command session.
//!
//! A [`CommandSession`] turns raw inbound text frames into [`ServerEvent`]s.
//! It owns no socket: events leave through an [`EventSink`], which the
//! infrastructure layer implements on top of the WebSocket write half and
//! tests implement with a recording vector.
//!
//! # Request handling
//!
//! ```text
//! text frame ──parse──► CommandRequest ──route_command──► Routed
//!     │                                                    ├─ Reply     → log(origin)
//!     └─ bad JSON → log "Invalid payload: …"               ├─ Rejected  → log(origin) / notice
//!                                                          └─ Ping      → log, flow, log
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use vtp_core::{route_command, CommandError, Routed, VtpService};

use crate::domain::config::ServerConfig;
use crate::domain::messages::{CommandRequest, ServerEvent};

/// First event sent on every new session.
pub const GREETING: &str = "Connected to VTP simulator backend";

/// Protocol label on the simulated ping flow.
pub const PING_PROTO: &str = "ICMP";

/// Error type for the session use case.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The peer went away while an event was being delivered.
    #[error("event sink closed: {0}")]
    SinkClosed(String),

    /// An event could not be encoded for the wire.
    #[error("failed to encode event: {0}")]
    Encode(String),
}

/// Outbound seam for session events.
///
/// Infrastructure implementations write WebSocket text frames; test
/// implementations record calls.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers one event to the peer.
    async fn send_event(&self, event: ServerEvent) -> Result<(), SessionError>;
}

/// Command handling for one connected console.
///
/// All sessions share the same [`VtpService`], so a device configured from
/// one browser tab is visible from every other tab.
pub struct CommandSession {
    id: Uuid,
    service: VtpService,
    config: Arc<ServerConfig>,
    sink: Arc<dyn EventSink>,
}

impl CommandSession {
    /// Creates a session with a fresh random id.
    pub fn new(service: VtpService, config: Arc<ServerConfig>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            id: Uuid::new_v4(),
            service,
            config,
            sink,
        }
    }

    /// Session id used for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Sends the connection greeting.
    pub async fn greet(&self) -> Result<(), SessionError> {
        self.sink.send_event(ServerEvent::notice(GREETING)).await
    }

    /// Handles one inbound text frame.
    ///
    /// A frame that is not a JSON request object is answered with an
    /// `Invalid payload` notice; the session stays open.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] only when the sink fails, which means the
    /// peer is gone and the caller should end the session.
    pub async fn handle_text(&self, raw: &str) -> Result<(), SessionError> {
        match serde_json::from_str::<CommandRequest>(raw) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!(session = %self.id, "invalid payload: {e}");
                self.sink
                    .send_event(ServerEvent::notice(format!("Invalid payload: {raw}")))
                    .await
            }
        }
    }

    /// Routes a parsed request and emits its events.
    pub async fn handle_request(&self, request: CommandRequest) -> Result<(), SessionError> {
        let node = request.device_id(&self.config.default_node).to_string();

        match route_command(&self.service, &node, &request.command) {
            Routed::Reply(text) => {
                debug!(session = %self.id, node = %node, "command handled");
                self.sink.send_event(ServerEvent::log_from(node, text)).await
            }
            Routed::Rejected(CommandError::EmptyCommand) => {
                self.sink
                    .send_event(ServerEvent::notice(CommandError::EmptyCommand.to_string()))
                    .await
            }
            Routed::Rejected(e) => {
                debug!(session = %self.id, node = %node, kind = ?e.kind(), "command rejected");
                self.sink
                    .send_event(ServerEvent::log_from(node, e.to_string()))
                    .await
            }
            Routed::Ping { target } => self.run_ping(&node, &target).await,
        }
    }

    /// Plays the scripted ping exchange: log, flow, log.
    async fn run_ping(&self, origin: &str, target: &str) -> Result<(), SessionError> {
        let timing = self.config.ping;

        self.sink
            .send_event(ServerEvent::log_from(origin, format!("Pinging {target}...")))
            .await?;

        tokio::time::sleep(timing.echo_delay).await;
        self.sink
            .send_event(ServerEvent::Flow {
                from: origin.to_string(),
                to: target.to_string(),
                proto: PING_PROTO.to_string(),
            })
            .await?;

        tokio::time::sleep(timing.reply_delay).await;
        self.sink
            .send_event(ServerEvent::log_from(
                origin,
                format!("Reply received from {target} ✅"),
            ))
            .await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

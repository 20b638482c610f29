//! JSON message types for the browser-facing WebSocket protocol.
//!
//! # Message flow
//!
//! ```text
//! Browser → Server:  {"command":"vtp mode client","node":"SW2"}
//! Server  → Browser: {"event":"log","message":"VTP mode set to client","origin":"SW2"}
//!                    {"event":"flow","from":"PC1","to":"R1","proto":"ICMP"}
//! ```
//!
//! Requests are untagged objects; events carry an `"event"` discriminant.

use serde::{Deserialize, Serialize};

/// One command line sent by the browser console.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Raw command text, e.g. `"show vtp status"`.
    #[serde(default)]
    pub command: String,

    /// Device the command targets.  Missing, `null`, or blank means the
    /// server's default node.
    #[serde(default)]
    pub node: Option<String>,
}

impl CommandRequest {
    /// Resolves the target device id, falling back to `default_node`.
    pub fn device_id<'a>(&'a self, default_node: &'a str) -> &'a str {
        self.node
            .as_deref()
            .map(str::trim)
            .filter(|node| !node.is_empty())
            .unwrap_or(default_node)
    }
}

/// Everything the server sends to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ServerEvent {
    /// A line for the console log.
    Log {
        message: String,
        /// Device the line belongs to; absent for connection-level messages.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
    },

    /// A packet animation between two nodes.
    Flow {
        from: String,
        to: String,
        proto: String,
    },
}

impl ServerEvent {
    /// A log line attributed to `origin`.
    pub fn log_from(origin: impl Into<String>, message: impl Into<String>) -> Self {
        ServerEvent::Log {
            message: message.into(),
            origin: Some(origin.into()),
        }
    }

    /// A connection-level log line with no origin.
    pub fn notice(message: impl Into<String>) -> Self {
        ServerEvent::Log {
            message: message.into(),
            origin: None,
        }
    }

    /// Short variant name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ServerEvent::Log { .. } => "log",
            ServerEvent::Flow { .. } => "flow",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Domain layer for vtp-server.
//!
//! Pure types with no I/O: the JSON message shapes exchanged with the
//! browser, and the server's runtime configuration.
//!
//! Nothing here touches `tokio`, sockets, files, or environment variables.

pub mod config;
pub mod messages;

// Re-export the most commonly needed types at the domain module boundary
// so callers can write `domain::ServerConfig` instead of the longer path.
pub use config::{PingTiming, ServerConfig};
pub use messages::{CommandRequest, ServerEvent};

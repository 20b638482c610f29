//! WebSocket server: accept loop and per-session task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections from browsers.
//! 3. Upgrading each connection to a WebSocket session, rejecting upgrades
//!    on any path other than the configured endpoint with HTTP 404.
//! 4. Feeding every text frame to a [`CommandSession`] and writing the
//!    resulting events back as JSON text frames.
//! 5. Gracefully shutting down when the `running` flag is cleared.
//!
//! # Scalability
//!
//! Each browser session runs in its own Tokio task.  The accept loop never
//! blocks on a session: it accepts a connection and immediately spawns a task
//! for it.  Within one session, frames are handled strictly in arrival order,
//! so a `ping` delays the replies to commands sent after it.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{Error as WsError, Message as WsMessage},
    WebSocketStream,
};
use tracing::{debug, error, info, warn};

use vtp_core::VtpService;

use crate::application::{CommandSession, EventSink, SessionError};
use crate::domain::config::ServerConfig;
use crate::domain::messages::ServerEvent;

/// How often the accept loop re-checks the shutdown flag when idle.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(200);

type WsSink = SplitSink<WebSocketStream<TcpStream>, WsMessage>;

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds `config.ws_bind_addr` and serves sessions until `running` is cleared.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot be bound (e.g., the port is
/// already in use or the process lacks permission to bind).
pub async fn run_server(
    config: ServerConfig,
    service: VtpService,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.ws_bind_addr)
        .await
        .with_context(|| {
            format!(
                "failed to bind WebSocket listener on {}",
                config.ws_bind_addr
            )
        })?;

    serve(listener, config, service, running).await
}

/// Runs the accept loop on an already-bound listener.
///
/// Split out from [`run_server`] so tests can bind port 0 and learn the
/// actual address before the loop starts.
///
/// # Errors
///
/// Currently infallible once the listener is bound; the `Result` leaves room
/// for fatal listener errors.
pub async fn serve(
    listener: TcpListener,
    config: ServerConfig,
    service: VtpService,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    match listener.local_addr() {
        Ok(addr) => info!("VTP simulator listening on ws://{addr}{}", config.ws_path),
        Err(e) => warn!("listening (local address unavailable: {e})"),
    }

    let config = Arc::new(config);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Short timeout so the loop notices the shutdown flag while idle.
        match timeout(ACCEPT_POLL_INTERVAL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("new connection from {peer_addr}");
                let cfg = Arc::clone(&config);
                let svc = service.clone();
                tokio::spawn(async move {
                    handle_browser_session(stream, peer_addr, cfg, svc).await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g., too many open file descriptors).
                error!("accept error: {e}");
            }
            Err(_) => {
                // Timeout; loop back to check the flag.
            }
        }
    }

    Ok(())
}

// ── Event sink over the WebSocket write half ─────────────────────────────────

/// [`EventSink`] that serializes events to JSON text frames.
struct WsEventSink {
    sink: Mutex<WsSink>,
}

#[async_trait]
impl EventSink for WsEventSink {
    async fn send_event(&self, event: ServerEvent) -> Result<(), SessionError> {
        let json = serde_json::to_string(&event).map_err(|e| SessionError::Encode(e.to_string()))?;
        let mut sink = self.sink.lock().await;
        sink.send(WsMessage::Text(json))
            .await
            .map_err(|e| SessionError::SinkClosed(e.to_string()))
    }
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Wraps [`run_session`] and logs the outcome.
async fn handle_browser_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<ServerConfig>,
    service: VtpService,
) {
    match run_session(raw_stream, peer_addr, config, service).await {
        Ok(()) => info!("session {peer_addr} closed normally"),
        Err(e) => warn!("session {peer_addr} closed with error: {e:#}"),
    }
}

/// Runs the complete lifecycle of a single browser WebSocket session.
///
/// # Errors
///
/// Returns an error if the WebSocket handshake fails (including a request
/// for the wrong path) or the greeting cannot be delivered.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<ServerConfig>,
    service: VtpService,
) -> anyhow::Result<()> {
    // ── Step 1: Handshake, accepting only the configured path ─────────────────
    let endpoint = config.ws_path.clone();
    let check_path = move |request: &Request, response: Response| {
        if request.uri().path() == endpoint {
            Ok(response)
        } else {
            let mut rejection = ErrorResponse::new(Some("Not Found".to_string()));
            *rejection.status_mut() = StatusCode::NOT_FOUND;
            Err(rejection)
        }
    };

    let ws_stream = accept_hdr_async(raw_stream, check_path)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let (ws_tx, mut ws_rx) = ws_stream.split();
    let sink = Arc::new(WsEventSink {
        sink: Mutex::new(ws_tx),
    });

    let session = CommandSession::new(service, config, sink as Arc<dyn EventSink>);
    let session_id = session.id();
    info!("session {session_id} established with {peer_addr}");

    // ── Step 2: Greeting ──────────────────────────────────────────────────────
    session
        .greet()
        .await
        .with_context(|| format!("session {session_id}: failed to send greeting"))?;

    // ── Step 3: Frame loop ────────────────────────────────────────────────────
    loop {
        let ws_msg = match ws_rx.next().await {
            Some(Ok(msg)) => msg,
            Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                debug!("session {session_id}: browser WebSocket closed");
                break;
            }
            Some(Err(e)) => {
                warn!("session {session_id}: browser WebSocket error: {e}");
                break;
            }
            None => {
                debug!("session {session_id}: browser stream ended");
                break;
            }
        };

        match ws_msg {
            WsMessage::Text(text) => {
                if let Err(e) = session.handle_text(&text).await {
                    debug!("session {session_id}: {e}");
                    break;
                }
            }
            WsMessage::Binary(_) => {
                // The console protocol is JSON text only.
                warn!("session {session_id}: unexpected binary WebSocket frame (ignored)");
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) => {
                // tungstenite queues the Pong reply itself.
            }
            WsMessage::Close(_) => {
                debug!("session {session_id}: WebSocket Close frame received");
                break;
            }
            WsMessage::Frame(_) => {
                debug!("session {session_id}: raw frame (ignored)");
            }
        }
    }

    Ok(())
}

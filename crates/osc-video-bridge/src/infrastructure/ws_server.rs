//! Push channel: WebSocket accept loop and per-session forwarding.
//!
//! This module is responsible for:
//!
//! 1. Accepting TCP connections from the presentation page.
//! 2. Upgrading each connection to a WebSocket session.
//! 3. Registering the session with the [`PresentationHub`], which makes it the
//!    single active client.
//! 4. Forwarding every [`PushMessage`] the hub routes to this session as a
//!    JSON text frame.
//! 5. Detaching from the hub when the browser goes away.
//!
//! The channel is one-way.  Text the browser sends is logged and ignored.
//!
//! When a newer client replaces this one, the hub drops this session's
//! outbound channel.  The session stops forwarding but keeps reading until
//! the browser closes the socket.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};

use crate::infrastructure::presentation_hub::PresentationHub;

// ── Public API ────────────────────────────────────────────────────────────────

/// Accepts push-channel connections on `listener` until `running` is cleared.
pub async fn run_push_server(
    listener: TcpListener,
    hub: Arc<PresentationHub>,
    running: Arc<AtomicBool>,
) {
    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping push channel");
            break;
        }

        // Short timeout so the flag is re-checked while nobody connects.
        match timeout(Duration::from_millis(200), listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("push channel connection from {peer_addr}");
                let hub = Arc::clone(&hub);
                tokio::spawn(async move {
                    handle_presentation_session(stream, peer_addr, hub).await;
                });
            }
            Ok(Err(e)) => error!("push channel accept error: {e}"),
            Err(_) => {}
        }
    }
}

// ── Per-session handler ───────────────────────────────────────────────────────

async fn handle_presentation_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    hub: Arc<PresentationHub>,
) {
    match run_session(raw_stream, peer_addr, hub).await {
        Ok(()) => debug!("push session {peer_addr} closed"),
        Err(e) => warn!("push session {peer_addr} closed with error: {e:#}"),
    }
}

async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    hub: Arc<PresentationHub>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(raw_stream)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    let (id, mut pushes) = hub.attach(peer_addr);
    let mut superseded = false;

    let result = loop {
        tokio::select! {
            push = pushes.recv(), if !superseded => match push {
                Some(message) => {
                    let json = match serde_json::to_string(&message) {
                        Ok(json) => json,
                        Err(e) => {
                            error!("push session {peer_addr}: JSON serialization error: {e}");
                            continue;
                        }
                    };
                    debug!("push session {peer_addr}: → {json}");
                    if let Err(e) = ws_tx.send(WsMessage::Text(json)).await {
                        break Err(anyhow::Error::new(e).context("send failed"));
                    }
                }
                None => {
                    debug!("push session {peer_addr}: superseded by a newer client");
                    superseded = true;
                }
            },
            frame = ws_rx.next() => match frame {
                Some(Ok(WsMessage::Close(_))) | None => break Ok(()),
                Some(Ok(WsMessage::Text(text))) => {
                    debug!(
                        "push session {peer_addr}: ignoring inbound text ({} bytes)",
                        text.len()
                    );
                }
                Some(Ok(_)) => {}
                Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => break Ok(()),
                Some(Err(e)) => break Err(anyhow::Error::new(e).context("read failed")),
            },
        }
    };

    hub.detach(id);
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────

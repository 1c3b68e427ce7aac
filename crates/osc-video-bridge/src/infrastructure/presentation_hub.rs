//! Presentation hub: tracks the one active push connection and routes pushes
//! to it.
//!
//! At most one presentation client is active.  A new connection replaces the
//! previous one: the old session's outbound channel is dropped, so it stops
//! receiving pushes, but its socket is left for the browser to close.
//!
//! Each connection gets an id.  [`PresentationHub::detach`] only clears the
//! active slot when the id still matches, so a superseded session that closes
//! late cannot disconnect its successor.
//!
//! On attach, a client is caught up with `reload-video` when a file is
//! already set.  The catch-up is queued while the slot lock is held, so it is
//! always the first message the new client sees.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::{PlaybackStore, PresentationNotifier};
use crate::domain::PushMessage;

/// Identifies one accepted push connection.
pub type ConnectionId = Uuid;

struct ActiveConnection {
    id: ConnectionId,
    peer: SocketAddr,
    tx: mpsc::UnboundedSender<PushMessage>,
}

/// Owner of the active presentation connection.
pub struct PresentationHub {
    store: Arc<PlaybackStore>,
    active: Mutex<Option<ActiveConnection>>,
}

impl PresentationHub {
    pub fn new(store: Arc<PlaybackStore>) -> Self {
        Self {
            store,
            active: Mutex::new(None),
        }
    }

    /// Makes `peer` the active connection and returns its id together with
    /// the receiver its session task forwards to the socket.
    pub fn attach(&self, peer: SocketAddr) -> (ConnectionId, mpsc::UnboundedReceiver<PushMessage>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();

        let mut active = self.lock();
        if let Some(previous) = active.as_ref() {
            info!(
                "presentation client {peer} replaces {} ({})",
                previous.peer, previous.id
            );
        } else {
            info!("presentation client {peer} connected ({id})");
        }

        if self.store.snapshot().file_path.is_some() {
            // The receiver is alive in this scope, so the send cannot fail.
            let _ = tx.send(PushMessage::ReloadVideo);
        }
        *active = Some(ActiveConnection { id, peer, tx });

        (id, rx)
    }

    /// Clears the active slot if `id` still owns it.
    pub fn detach(&self, id: ConnectionId) {
        let mut active = self.lock();
        match active.as_ref() {
            Some(current) if current.id == id => {
                info!("presentation client {} disconnected", current.peer);
                *active = None;
            }
            _ => debug!("superseded connection {id} closed"),
        }
    }

    /// Whether a presentation client is currently attached.
    pub fn has_client(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveConnection>> {
        match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl PresentationNotifier for PresentationHub {
    fn push(&self, message: PushMessage) {
        let mut active = self.lock();
        let Some(conn) = active.as_ref() else {
            debug!("no presentation client; dropping {}", message.command_name());
            return;
        };

        if conn.tx.send(message).is_err() {
            // The session task already ended but has not detached yet.
            debug!("presentation client {} gone; clearing", conn.peer);
            *active = None;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

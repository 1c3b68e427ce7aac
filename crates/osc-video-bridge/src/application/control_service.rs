//! ControlService: applies decoded control commands to the playback state and
//! decides which pushes they trigger.
//!
//! | Command        | State change                    | Push            |
//! |----------------|---------------------------------|-----------------|
//! | `SetFilePath`  | file replaced if the path is OK | `reload-video`  |
//! | `SetPlayPos`   | position replaced               | `set-play-pos`  |
//! | `Refresh`      | none                            | none            |
//!
//! A rejected path still produces `reload-video`: the client re-fetches and
//! keeps playing the previous file, which is exactly what an unchanged state
//! should look like from its side.
//!
//! # Architecture
//!
//! The service depends on the [`PresentationNotifier`] trait, not on the
//! WebSocket hub, so the rules above are unit-testable with a recording
//! double.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use osc_video_core::ControlCommand;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::path_resolver::{PathError, PathResolver};
use crate::application::state_store::PlaybackStore;
use crate::domain::{PushMessage, ResolvedPath};

/// Sink for messages addressed to the presentation client.
///
/// Infrastructure forwards to the active push connection; tests record calls.
/// Delivery is best-effort: with no client connected the message is dropped.
pub trait PresentationNotifier: Send + Sync {
    /// Delivers `message` to the active client, if any.
    fn push(&self, message: PushMessage);
}

/// What applying a single command did.  Returned for logging and tests.
#[derive(Debug)]
pub enum ControlOutcome {
    /// The path resolved and is now the current file.
    PathAccepted,
    /// The path was rejected; the previous file (if any) remains current.
    PathRejected(PathError),
    /// The position was stored and forwarded.
    PositionUpdated(f64),
    /// `/refresh` arrived on the listen port.  The bridge only sends it.
    RefreshIgnored,
}

/// Applies [`ControlCommand`]s in arrival order.
pub struct ControlService {
    store: Arc<PlaybackStore>,
    resolver: PathResolver,
    notifier: Arc<dyn PresentationNotifier>,
}

impl ControlService {
    pub fn new(
        store: Arc<PlaybackStore>,
        resolver: PathResolver,
        notifier: Arc<dyn PresentationNotifier>,
    ) -> Self {
        Self {
            store,
            resolver,
            notifier,
        }
    }

    /// Applies one command: mutates the store, then pushes.
    ///
    /// The store is always updated before the push goes out, so a client that
    /// reacts to the push by fetching `/video` observes the new state.
    pub fn apply(&self, command: ControlCommand) -> ControlOutcome {
        match command {
            ControlCommand::SetFilePath(raw) => {
                let resolved = self.resolver.resolve(&raw);
                self.commit_path(&raw, resolved)
            }
            ControlCommand::SetPlayPos(seconds) => {
                debug!("play position {seconds}s");
                self.store.set_position(seconds);
                self.notifier.push(PushMessage::SetPlayPos(seconds));
                ControlOutcome::PositionUpdated(seconds)
            }
            ControlCommand::Refresh => {
                debug!("ignoring inbound /refresh");
                ControlOutcome::RefreshIgnored
            }
        }
    }

    /// Drains `commands` until every sender is dropped.
    ///
    /// This is the only task that mutates the file/position pair in response
    /// to control input, which keeps command handling strictly sequential.
    /// Path checks hit the filesystem, so they run on the blocking pool; the
    /// next command waits for them.
    pub async fn run(self, mut commands: mpsc::Receiver<ControlCommand>) {
        while let Some(command) = commands.recv().await {
            match command {
                ControlCommand::SetFilePath(raw) => {
                    let resolved = self.resolve_blocking(&raw).await;
                    self.commit_path(&raw, resolved);
                }
                other => {
                    self.apply(other);
                }
            }
        }
        debug!("control channel closed");
    }

    async fn resolve_blocking(&self, raw: &str) -> Result<ResolvedPath, PathError> {
        let resolver = self.resolver.clone();
        let owned = raw.to_string();
        tokio::task::spawn_blocking(move || resolver.resolve(&owned))
            .await
            .unwrap_or_else(|e| {
                Err(PathError::Inaccessible {
                    path: PathBuf::from(raw),
                    source: io::Error::other(e),
                })
            })
    }

    /// Stores an accepted path, then pushes `reload-video` either way.
    fn commit_path(
        &self,
        raw: &str,
        resolved: Result<ResolvedPath, PathError>,
    ) -> ControlOutcome {
        let outcome = match resolved {
            Ok(resolved) => {
                info!("current file set to {resolved}");
                self.store.set_file_path(resolved);
                ControlOutcome::PathAccepted
            }
            Err(e) => {
                warn!("rejected file path {raw:?}: {e}");
                ControlOutcome::PathRejected(e)
            }
        };
        self.notifier.push(PushMessage::ReloadVideo);
        outcome
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

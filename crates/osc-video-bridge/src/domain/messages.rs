//! JSON message types for the browser-facing push channel.
//!
//! The push channel is one-way: the bridge tells the presentation client what
//! to do and never waits for an answer.
//!
//! # JSON shape
//!
//! Every message is an object with a `"command"` field and, when the command
//! carries a value, a `"data"` field:
//!
//! ```json
//! {"command":"reload-video"}
//! {"command":"set-play-pos","data":12.5}
//! ```
//!
//! Serde's adjacently tagged representation
//! (`#[serde(tag = "command", content = "data")]`) produces exactly this.

use serde::{Deserialize, Serialize};

/// All messages the bridge pushes to the presentation client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "kebab-case")]
pub enum PushMessage {
    /// Re-fetch the media resource from scratch (`video.load()`).
    ReloadVideo,

    /// Jump to the given position in seconds without reloading.
    SetPlayPos(f64),
}

impl PushMessage {
    /// Returns the wire name of the command, for log messages.
    pub fn command_name(&self) -> &'static str {
        match self {
            PushMessage::ReloadVideo => "reload-video",
            PushMessage::SetPlayPos(_) => "set-play-pos",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! # osc-video-core
//!
//! Shared wire-protocol library for the OSC video stream bridge.
//!
//! The bridge is driven by an upstream automation host (for example a DAW
//! controller script) that speaks OSC over UDP.  This crate contains
//! everything needed to talk to that host and nothing else: no sockets, no
//! async runtime, no filesystem access.
//!
//! - **`protocol::messages`** – the typed OSC data model: packets, messages
//!   and arguments.
//!
//! - **`protocol::codec`** – how those types travel over the network.  OSC
//!   1.0 encodes every datagram as 4-byte aligned, NUL-padded strings and
//!   big-endian numbers; the codec turns bytes into typed messages and back.
//!
//! - **`protocol::commands`** – the small control vocabulary the bridge
//!   understands (`/path`, `/play-pos`, `/refresh`), validated and typed.

pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `osc_video_core::OscMessage` instead of the full module path.
pub use protocol::codec::{decode_packet, encode_message, ProtocolError};
pub use protocol::commands::{CommandError, ControlCommand};
pub use protocol::messages::{OscArg, OscMessage, OscPacket};

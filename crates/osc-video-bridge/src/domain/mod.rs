//! Domain layer for osc-video-bridge.
//!
//! The domain layer contains pure types that have no dependencies on I/O,
//! networking, or external frameworks.
//!
//! # What belongs in the domain layer?
//!
//! - The playback state snapshot and the validated path type
//! - Push-channel message types (the JSON "language" between bridge and browser)
//! - Configuration structures
//!
//! # What does NOT belong here?
//!
//! - Any `tokio`, socket or HTTP types
//! - File I/O or environment variable reading

pub mod config;
pub mod messages;
pub mod playback;

pub use config::BridgeConfig;
pub use messages::PushMessage;
pub use playback::{PlaybackState, ResolvedPath};

//! Infrastructure layer for osc-video-bridge.
//!
//! The infrastructure layer handles all I/O: the UDP control socket, the
//! WebSocket push channel, the HTTP server and the config file.
//!
//! # Responsibilities
//!
//! - Receiving and decoding OSC datagrams, sending `/refresh` upstream
//! - Tracking the single active presentation connection
//! - Accepting WebSocket sessions and forwarding pushes as JSON
//! - Serving the presentation page and byte ranges of the current file
//! - Binding sockets, spawning tasks and handling the shutdown flag
//!
//! # What does NOT belong here?
//!
//! - Deciding what a command does to the playback state (application layer)
//! - Message type definitions (domain layer)

pub mod config_file;
pub mod http_server;
pub mod osc_sender;
pub mod osc_server;
pub mod presentation_hub;
pub mod runtime;
pub mod ws_server;

// Re-export the primary entry points so `main.rs` can call them concisely.
pub use config_file::{ConfigError, FileConfig};
pub use osc_sender::{EgressError, OscSender};
pub use runtime::{run_server, BoundAddrs, Bridge};

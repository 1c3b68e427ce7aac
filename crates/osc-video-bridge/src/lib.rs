//! osc-video-bridge library crate.
//!
//! This crate keeps a browser-based video player synchronized with an
//! external transport that publishes "which file" and "what position" over
//! OSC, and serves the referenced file over HTTP with byte-range support.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Upstream host (OSC over UDP)          Browser tab
//!         ↕                          ↑ push (WebSocket)  ↑ GET /, /video (HTTP)
//! [osc-video-bridge]
//!   ├── domain/           Pure types: PlaybackState, PushMessage, BridgeConfig
//!   ├── application/      Path resolution, state store, control use case,
//!   │                     range planning
//!   └── infrastructure/
//!         ├── osc_server/        Control Ingress (UDP receive loop)
//!         ├── osc_sender/        Control Egress (startup refresh)
//!         ├── presentation_hub/  Active push connection + catch-up
//!         ├── ws_server/         Push channel accept loop
//!         ├── http_server/       Presentation page + media range server
//!         └── runtime/           Binds everything and runs it together
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain`, `osc-video-core` and tokio channels;
//!   it touches the filesystem only through the path resolver's existence
//!   check.
//! - `infrastructure` depends on all other layers plus `tokio`, `axum` and
//!   `tokio-tungstenite`.

/// Domain layer: pure types (no I/O).
pub mod domain;

/// Application layer: control logic and the shared playback state.
pub mod application;

/// Infrastructure layer: sockets, HTTP, WebSocket and process wiring.
pub mod infrastructure;

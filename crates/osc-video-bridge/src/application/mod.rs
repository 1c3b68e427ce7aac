//! Application layer for osc-video-bridge.
//!
//! The application layer knows *what* to do with control input and HTTP
//! requests, but delegates *how* bytes move to the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Normalizing and validating incoming file paths
//! - Owning the single mutable playback state
//! - Applying control commands and deciding which pushes they trigger
//! - Turning a `Range` header into a response plan
//!
//! # What does NOT belong here?
//!
//! - Opening sockets, HTTP routing or WebSocket framing
//! - Tokio task spawning

pub mod control_service;
pub mod path_resolver;
pub mod range;
pub mod state_store;

pub use control_service::{ControlOutcome, ControlService, PresentationNotifier};
pub use path_resolver::{PathError, PathResolver};
pub use range::{plan_range, RangePlan};
pub use state_store::PlaybackStore;

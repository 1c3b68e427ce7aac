//! Bridge configuration types.
//!
//! [`BridgeConfig`] is the single source of truth for all runtime settings.
//! It is populated in `main.rs` from CLI arguments, environment variables and
//! an optional TOML file; tests build it directly.
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! variable reads inside the domain) makes the bridge easy to start several
//! times in one test process on ephemeral ports.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default UDP address the control channel listens on.
pub const DEFAULT_OSC_LISTEN_ADDR: &str = "0.0.0.0:12345";
/// Default UDP address of the upstream host that receives `/refresh`.
pub const DEFAULT_OSC_UPSTREAM_ADDR: &str = "127.0.0.1:12346";
/// Default TCP address of the push channel (WebSocket).
pub const DEFAULT_WS_BIND_ADDR: &str = "0.0.0.0:4000";
/// Default TCP address of the HTTP server.
pub const DEFAULT_HTTP_BIND_ADDR: &str = "0.0.0.0:6789";

/// All runtime configuration for the bridge.
///
/// # Example
///
/// ```rust
/// use osc_video_bridge::domain::BridgeConfig;
///
/// let cfg = BridgeConfig::default();
/// assert_eq!(cfg.osc_listen_addr.port(), 12345);
/// assert_eq!(cfg.http_bind_addr.port(), 6789);
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// UDP address on which control messages (`/path`, `/play-pos`) arrive.
    pub osc_listen_addr: SocketAddr,

    /// UDP address the startup `/refresh` request is sent to.
    pub osc_upstream_addr: SocketAddr,

    /// TCP address of the push channel the presentation page connects to.
    pub ws_bind_addr: SocketAddr,

    /// TCP address serving `GET /` and `GET /video`.
    pub http_bind_addr: SocketAddr,

    /// Directory that relative control paths are resolved against.
    ///
    /// `None` means the process working directory.
    pub base_dir: Option<PathBuf>,

    /// Whether to send `/refresh` upstream once the sockets are bound.
    pub refresh_on_startup: bool,
}

impl Default for BridgeConfig {
    /// | Field              | Default           |
    /// |--------------------|-------------------|
    /// | osc_listen_addr    | `0.0.0.0:12345`   |
    /// | osc_upstream_addr  | `127.0.0.1:12346` |
    /// | ws_bind_addr       | `0.0.0.0:4000`    |
    /// | http_bind_addr     | `0.0.0.0:6789`    |
    /// | base_dir           | none (cwd)        |
    /// | refresh_on_startup | `true`            |
    fn default() -> Self {
        Self {
            // The `.parse().unwrap()` calls here are safe because these are
            // compile-time-known valid socket address strings.
            osc_listen_addr: DEFAULT_OSC_LISTEN_ADDR.parse().unwrap(),
            osc_upstream_addr: DEFAULT_OSC_UPSTREAM_ADDR.parse().unwrap(),
            ws_bind_addr: DEFAULT_WS_BIND_ADDR.parse().unwrap(),
            http_bind_addr: DEFAULT_HTTP_BIND_ADDR.parse().unwrap(),
            base_dir: None,
            refresh_on_startup: true,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Optional TOML configuration file.
//!
//! Every key is optional.  Missing keys fall back to the CLI, environment or
//! built-in defaults (see `main.rs` for precedence).  Example:
//!
//! ```toml
//! log_level = "debug"
//! base_dir = "/home/me/Videos"
//! refresh_on_startup = true
//!
//! [osc]
//! listen_addr = "0.0.0.0:12345"
//! upstream_addr = "127.0.0.1:12346"
//!
//! [presentation]
//! ws_bind_addr = "0.0.0.0:4000"
//! http_bind_addr = "0.0.0.0:6789"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::BridgeConfig;

/// Error type for configuration file loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk configuration.  Unknown keys are rejected so typos surface at
/// startup.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_level: Option<String>,
    pub base_dir: Option<PathBuf>,
    pub refresh_on_startup: Option<bool>,
    #[serde(default)]
    pub osc: OscSection,
    #[serde(default)]
    pub presentation: PresentationSection,
}

/// Control channel addresses.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OscSection {
    pub listen_addr: Option<SocketAddr>,
    pub upstream_addr: Option<SocketAddr>,
}

/// Push channel and HTTP addresses.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PresentationSection {
    pub ws_bind_addr: Option<SocketAddr>,
    pub http_bind_addr: Option<SocketAddr>,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Overlays the keys present in this file onto `base`.
    pub fn apply_to(&self, base: BridgeConfig) -> BridgeConfig {
        BridgeConfig {
            osc_listen_addr: self.osc.listen_addr.unwrap_or(base.osc_listen_addr),
            osc_upstream_addr: self.osc.upstream_addr.unwrap_or(base.osc_upstream_addr),
            ws_bind_addr: self.presentation.ws_bind_addr.unwrap_or(base.ws_bind_addr),
            http_bind_addr: self
                .presentation
                .http_bind_addr
                .unwrap_or(base.http_bind_addr),
            base_dir: self.base_dir.clone().or(base.base_dir),
            refresh_on_startup: self.refresh_on_startup.unwrap_or(base.refresh_on_startup),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

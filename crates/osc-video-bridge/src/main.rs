//! OSC video bridge: entry point.
//!
//! Listens for `/path` and `/play-pos` over OSC, serves the current file to a
//! browser page over HTTP with range support, and keeps the page's `<video>`
//! element in step through a WebSocket push channel.
//!
//! # Usage
//!
//! ```text
//! osc-video-bridge [OPTIONS]
//!
//! Options:
//!   --config <FILE>         TOML configuration file
//!   --osc-listen <ADDR>     UDP control address        [default: 0.0.0.0:12345]
//!   --osc-upstream <ADDR>   Where /refresh is sent     [default: 127.0.0.1:12346]
//!   --ws-bind <ADDR>        Push channel address       [default: 0.0.0.0:4000]
//!   --http-bind <ADDR>      HTTP address               [default: 0.0.0.0:6789]
//!   --base-dir <DIR>        Directory for relative control paths
//!   --no-refresh            Do not send /refresh at startup
//!   --log-level <FILTER>    Log filter when RUST_LOG is unset
//! ```
//!
//! # Configuration precedence
//!
//! CLI flag, then environment variable, then the `--config` file, then the
//! built-in default.
//!
//! | Variable                | Flag             |
//! |-------------------------|------------------|
//! | `OSC_VIDEO_CONFIG`      | `--config`       |
//! | `OSC_VIDEO_OSC_LISTEN`  | `--osc-listen`   |
//! | `OSC_VIDEO_OSC_UPSTREAM`| `--osc-upstream` |
//! | `OSC_VIDEO_WS_BIND`     | `--ws-bind`      |
//! | `OSC_VIDEO_HTTP_BIND`   | `--http-bind`    |
//! | `OSC_VIDEO_BASE_DIR`    | `--base-dir`     |
//! | `OSC_VIDEO_NO_REFRESH`  | `--no-refresh`   |
//! | `OSC_VIDEO_LOG_LEVEL`   | `--log-level`    |
//!
//! `RUST_LOG`, when set, overrides every log level setting.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use osc_video_bridge::domain::BridgeConfig;
use osc_video_bridge::infrastructure::{run_server, FileConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Keeps a browser video player in sync with an OSC transport.
#[derive(Debug, Parser)]
#[command(
    name = "osc-video-bridge",
    about = "OSC-controlled video player bridge with HTTP range streaming",
    version
)]
struct Cli {
    /// TOML configuration file.  Keys it sets are overridden by flags and
    /// environment variables.
    #[arg(long, env = "OSC_VIDEO_CONFIG")]
    config: Option<PathBuf>,

    /// UDP address on which `/path` and `/play-pos` arrive.
    #[arg(long, env = "OSC_VIDEO_OSC_LISTEN")]
    osc_listen: Option<String>,

    /// UDP address of the upstream host that receives `/refresh`.
    #[arg(long, env = "OSC_VIDEO_OSC_UPSTREAM")]
    osc_upstream: Option<String>,

    /// TCP address of the WebSocket push channel.
    #[arg(long, env = "OSC_VIDEO_WS_BIND")]
    ws_bind: Option<String>,

    /// TCP address of the HTTP server (presentation page and `/video`).
    #[arg(long, env = "OSC_VIDEO_HTTP_BIND")]
    http_bind: Option<String>,

    /// Directory that relative control paths are resolved against.
    #[arg(long, env = "OSC_VIDEO_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Skip the startup `/refresh` request.
    #[arg(long, env = "OSC_VIDEO_NO_REFRESH")]
    no_refresh: bool,

    /// `tracing` filter used when `RUST_LOG` is not set (e.g. `debug`).
    #[arg(long, env = "OSC_VIDEO_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Loads the config file named by `--config`, if any.
    fn load_file_config(&self) -> anyhow::Result<FileConfig> {
        match &self.config {
            Some(path) => FileConfig::load(path)
                .with_context(|| format!("failed to load config file {}", path.display())),
            None => Ok(FileConfig::default()),
        }
    }

    /// Layers the CLI arguments over `file` and the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if any address argument is not a valid `IP:PORT`.
    fn into_bridge_config(self, file: &FileConfig) -> anyhow::Result<BridgeConfig> {
        let base = file.apply_to(BridgeConfig::default());

        Ok(BridgeConfig {
            osc_listen_addr: parse_addr("--osc-listen", self.osc_listen)?
                .unwrap_or(base.osc_listen_addr),
            osc_upstream_addr: parse_addr("--osc-upstream", self.osc_upstream)?
                .unwrap_or(base.osc_upstream_addr),
            ws_bind_addr: parse_addr("--ws-bind", self.ws_bind)?.unwrap_or(base.ws_bind_addr),
            http_bind_addr: parse_addr("--http-bind", self.http_bind)?
                .unwrap_or(base.http_bind_addr),
            base_dir: self.base_dir.or(base.base_dir),
            refresh_on_startup: !self.no_refresh && base.refresh_on_startup,
        })
    }
}

fn parse_addr(flag: &str, value: Option<String>) -> anyhow::Result<Option<SocketAddr>> {
    value
        .map(|v| {
            v.parse::<SocketAddr>()
                .with_context(|| format!("invalid {flag} address: '{v}'"))
        })
        .transpose()
}

/// `RUST_LOG` wins; otherwise the first configured level; otherwise `info`.
fn log_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured.unwrap_or("info")))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file = cli.load_file_config()?;

    let level = cli.log_level.clone().or_else(|| file.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(level.as_deref()))
        .init();

    let config = cli.into_bridge_config(&file)?;
    info!(
        "osc-video-bridge starting: osc={}, ws={}, http={}, upstream={}",
        config.osc_listen_addr,
        config.ws_bind_addr,
        config.http_bind_addr,
        config.osc_upstream_addr
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    // The run loops poll `running` every 200 ms and exit once it is cleared.
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, running).await?;

    info!("osc-video-bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

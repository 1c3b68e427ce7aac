//! Sends a single control message to a running bridge.
//!
//! Stands in for the upstream automation host while testing by hand:
//!
//! ```text
//! osc-video-send path "C:\Videos\take 3.mp4"
//! osc-video-send play-pos 42.5
//! osc-video-send --target 127.0.0.1:12346 refresh
//! ```

use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use osc_video_bridge::infrastructure::OscSender;
use osc_video_core::ControlCommand;

#[derive(Debug, Parser)]
#[command(
    name = "osc-video-send",
    about = "Send one OSC control message to an osc-video-bridge",
    version
)]
struct Cli {
    /// Destination `IP:PORT`.
    #[arg(long, default_value = "127.0.0.1:12345", env = "OSC_VIDEO_SEND_TARGET")]
    target: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Propose a media file (`/path`).
    Path {
        /// File path, sent verbatim.
        file: String,
    },
    /// Report the playback position in seconds (`/play-pos`).
    PlayPos { seconds: f64 },
    /// Ask the receiver to resend its state (`/refresh`).
    Refresh,
}

impl From<Command> for ControlCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Path { file } => ControlCommand::SetFilePath(file),
            Command::PlayPos { seconds } => ControlCommand::SetPlayPos(seconds),
            Command::Refresh => ControlCommand::Refresh,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let target: SocketAddr = cli
        .target
        .parse()
        .with_context(|| format!("invalid --target address: '{}'", cli.target))?;

    let command = ControlCommand::from(cli.command);
    OscSender::new(target)
        .send(&command)
        .await
        .with_context(|| format!("failed to send {}", command.address()))?;

    println!("sent {} to {target}", command.address());
    Ok(())
}

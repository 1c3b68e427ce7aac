//! Control Egress: sends OSC messages to the upstream host.
//!
//! The bridge sends exactly one kind of message on its own: `/refresh` at
//! startup, so the upstream host re-emits its current path and position.  The
//! `osc-video-send` tool reuses [`OscSender`] to send arbitrary commands.
//!
//! Sends are fire-and-forget over an ephemeral UDP socket.  UDP gives no
//! delivery guarantee; a lost refresh simply means the bridge waits for the
//! next `/path` from upstream.

use std::net::SocketAddr;

use osc_video_core::{encode_message, ControlCommand, ProtocolError};
use thiserror::Error;
use tokio::net::UdpSocket;
use tracing::{debug, info};

/// Error type for outbound control messages.
#[derive(Debug, Error)]
pub enum EgressError {
    /// The message could not be encoded.
    #[error("failed to encode {address}: {source}")]
    Encode {
        address: &'static str,
        #[source]
        source: ProtocolError,
    },

    /// No local UDP socket could be bound.
    #[error("failed to bind outbound socket: {0}")]
    Bind(#[source] std::io::Error),

    /// The datagram could not be handed to the OS.
    #[error("failed to send to {target}: {source}")]
    Send {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Sends control commands to a fixed upstream address.
#[derive(Debug, Clone, Copy)]
pub struct OscSender {
    target: SocketAddr,
}

impl OscSender {
    pub fn new(target: SocketAddr) -> Self {
        Self { target }
    }

    /// Asks the upstream host to resend its state.
    pub async fn request_refresh(&self) -> Result<(), EgressError> {
        self.send(&ControlCommand::Refresh).await?;
        info!("requested state refresh from {}", self.target);
        Ok(())
    }

    /// Encodes `command` and sends it as one datagram.
    pub async fn send(&self, command: &ControlCommand) -> Result<(), EgressError> {
        let bytes =
            encode_message(&command.to_message()).map_err(|source| EgressError::Encode {
                address: command.address(),
                source,
            })?;

        let local: SocketAddr = if self.target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(local).await.map_err(EgressError::Bind)?;
        socket
            .send_to(&bytes, self.target)
            .await
            .map_err(|source| EgressError::Send {
                target: self.target,
                source,
            })?;

        debug!("sent {} ({} bytes) to {}", command.address(), bytes.len(), self.target);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

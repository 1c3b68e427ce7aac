//! Control Ingress: receives OSC datagrams on UDP and turns them into typed
//! [`ControlCommand`]s.
//!
//! Each datagram is decoded independently.  Bundles are flattened and their
//! messages handled in element order.  A datagram that fails to decode, or a
//! known address with the wrong arguments, is logged and dropped; unknown
//! addresses are ignored.  Nothing a sender can put on the wire stops the
//! loop.
//!
//! Accepted commands are forwarded over a bounded channel to the control
//! task, which applies them one at a time in arrival order.
//!
//! # Read timeout
//!
//! `recv_from` is wrapped in a 200 ms timeout so the loop re-checks the
//! `running` flag even when the upstream host is silent.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use osc_video_core::{decode_packet, ControlCommand};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Largest datagram the control socket accepts.
const MAX_DATAGRAM_LEN: usize = 65_536;

/// Poll interval for the shutdown flag.
const RECV_POLL: Duration = Duration::from_millis(200);

/// Receives datagrams on `socket` until `running` is cleared or the control
/// task goes away.
pub async fn run_control_ingress(
    socket: UdpSocket,
    commands: mpsc::Sender<ControlCommand>,
    running: Arc<AtomicBool>,
) {
    let mut buf = vec![0u8; MAX_DATAGRAM_LEN];

    while running.load(Ordering::Relaxed) {
        let (len, src) = match timeout(RECV_POLL, socket.recv_from(&mut buf)).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                // On some platforms an ICMP "port unreachable" from an earlier
                // send surfaces here; it says nothing about this socket.
                error!("control recv error: {e}");
                continue;
            }
            Err(_) => continue,
        };

        for command in commands_from_datagram(&buf[..len], src) {
            if commands.send(command).await.is_err() {
                debug!("control task gone; stopping ingress");
                return;
            }
        }
    }

    info!("control ingress stopped");
}

/// Decodes one datagram into the commands it carries, logging anything that
/// is dropped.
pub fn commands_from_datagram(datagram: &[u8], src: SocketAddr) -> Vec<ControlCommand> {
    let packet = match decode_packet(datagram) {
        Ok(packet) => packet,
        Err(e) => {
            warn!("dropping undecodable datagram from {src}: {e}");
            return Vec::new();
        }
    };

    packet
        .into_messages()
        .into_iter()
        .filter_map(|msg| match ControlCommand::from_message(&msg) {
            Ok(Some(command)) => {
                debug!("{} from {src}", command.address());
                Some(command)
            }
            Ok(None) => {
                debug!("ignoring unknown address {} from {src}", msg.address);
                None
            }
            Err(e) => {
                warn!("dropping malformed control message from {src}: {e}");
                None
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

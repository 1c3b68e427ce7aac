//! Process lifecycle: binds every socket, wires the components together and
//! runs them until shutdown.
//!
//! ```text
//!  UDP /path, /play-pos ──► osc_server ──mpsc──► ControlService ──► PlaybackStore
//!                                                     │                  ▲
//!                                                     ▼                  │
//!  browser ◄── ws_server ◄── PresentationHub ◄── push          http_server (/video)
//! ```
//!
//! Binding happens in [`Bridge::bind`], before anything is served, so the
//! actual addresses (including ephemeral ports) are known up front and the
//! presentation page can embed the real push-channel port.

use std::net::SocketAddr;
use std::sync::{atomic::AtomicBool, Arc};
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::application::{ControlService, PathResolver, PlaybackStore, PresentationNotifier};
use crate::domain::BridgeConfig;
use crate::infrastructure::http_server::{run_http_server, HttpState};
use crate::infrastructure::osc_sender::OscSender;
use crate::infrastructure::osc_server::run_control_ingress;
use crate::infrastructure::presentation_hub::PresentationHub;
use crate::infrastructure::ws_server::run_push_server;

/// Capacity of the ingress → control task channel.
const COMMAND_QUEUE_DEPTH: usize = 64;

/// How long open media streams may keep the HTTP server alive after shutdown.
const HTTP_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Addresses the bridge actually bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundAddrs {
    pub osc: SocketAddr,
    pub ws: SocketAddr,
    pub http: SocketAddr,
}

/// A bridge with all sockets bound, ready to serve.
pub struct Bridge {
    config: BridgeConfig,
    addrs: BoundAddrs,
    osc_socket: UdpSocket,
    ws_listener: TcpListener,
    http_listener: TcpListener,
    store: Arc<PlaybackStore>,
    hub: Arc<PresentationHub>,
}

impl Bridge {
    /// Binds the control socket and both listeners.
    ///
    /// # Errors
    ///
    /// Returns an error if any address is in use or cannot be bound.
    pub async fn bind(config: BridgeConfig) -> anyhow::Result<Self> {
        let osc_socket = UdpSocket::bind(config.osc_listen_addr)
            .await
            .with_context(|| format!("failed to bind OSC socket on {}", config.osc_listen_addr))?;
        let ws_listener = TcpListener::bind(config.ws_bind_addr)
            .await
            .with_context(|| format!("failed to bind push channel on {}", config.ws_bind_addr))?;
        let http_listener = TcpListener::bind(config.http_bind_addr)
            .await
            .with_context(|| format!("failed to bind HTTP server on {}", config.http_bind_addr))?;

        let addrs = BoundAddrs {
            osc: osc_socket.local_addr().context("OSC socket has no local address")?,
            ws: ws_listener.local_addr().context("push listener has no local address")?,
            http: http_listener.local_addr().context("HTTP listener has no local address")?,
        };

        let store = Arc::new(PlaybackStore::new());
        let hub = Arc::new(PresentationHub::new(Arc::clone(&store)));

        Ok(Self {
            config,
            addrs,
            osc_socket,
            ws_listener,
            http_listener,
            store,
            hub,
        })
    }

    /// The addresses actually bound.
    pub fn local_addrs(&self) -> BoundAddrs {
        self.addrs
    }

    /// Runs every component until `running` is cleared and all loops stop.
    pub async fn serve(self, running: Arc<AtomicBool>) -> anyhow::Result<()> {
        let Self {
            config,
            addrs,
            osc_socket,
            ws_listener,
            http_listener,
            store,
            hub,
        } = self;

        let notifier: Arc<dyn PresentationNotifier> = hub.clone();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);

        let control = ControlService::new(
            Arc::clone(&store),
            PathResolver::new(config.base_dir.clone()),
            Arc::clone(&notifier),
        );
        let control_task = tokio::spawn(control.run(command_rx));
        let ingress_task = tokio::spawn(run_control_ingress(
            osc_socket,
            command_tx,
            Arc::clone(&running),
        ));
        let push_task = tokio::spawn(run_push_server(
            ws_listener,
            Arc::clone(&hub),
            Arc::clone(&running),
        ));
        let mut http_task = tokio::spawn(run_http_server(
            http_listener,
            HttpState {
                store,
                notifier,
                ws_port: addrs.ws.port(),
            },
            Arc::clone(&running),
        ));

        info!(
            "listening: osc=udp://{} push=ws://{} http=http://{}",
            addrs.osc, addrs.ws, addrs.http
        );

        if config.refresh_on_startup {
            if let Err(e) = OscSender::new(config.osc_upstream_addr)
                .request_refresh()
                .await
            {
                warn!("startup refresh failed: {e}");
            }
        }

        ingress_task.await.context("control ingress task panicked")?;
        // Ingress dropped its sender, so the control task drains and ends.
        control_task.await.context("control task panicked")?;
        push_task.await.context("push channel task panicked")?;
        match timeout(HTTP_DRAIN_TIMEOUT, &mut http_task).await {
            Ok(joined) => joined.context("HTTP server task panicked")??,
            Err(_) => {
                warn!("media streams still open after {HTTP_DRAIN_TIMEOUT:?}; closing them");
                http_task.abort();
            }
        }

        info!("bridge stopped");
        Ok(())
    }
}

/// Binds and serves with `config` until `running` is cleared.
pub async fn run_server(config: BridgeConfig, running: Arc<AtomicBool>) -> anyhow::Result<()> {
    Bridge::bind(config).await?.serve(running).await
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use osc_video_core::{decode_packet, ControlCommand};
    use std::sync::atomic::Ordering;

    fn ephemeral_config(upstream: SocketAddr) -> BridgeConfig {
        BridgeConfig {
            osc_listen_addr: "127.0.0.1:0".parse().unwrap(),
            osc_upstream_addr: upstream,
            ws_bind_addr: "127.0.0.1:0".parse().unwrap(),
            http_bind_addr: "127.0.0.1:0".parse().unwrap(),
            base_dir: None,
            refresh_on_startup: true,
        }
    }

    #[tokio::test]
    async fn test_bind_reports_ephemeral_ports() {
        let bridge = Bridge::bind(ephemeral_config("127.0.0.1:9".parse().unwrap()))
            .await
            .unwrap();
        let addrs = bridge.local_addrs();
        assert_ne!(addrs.osc.port(), 0);
        assert_ne!(addrs.ws.port(), 0);
        assert_ne!(addrs.http.port(), 0);
    }

    #[tokio::test]
    async fn test_bind_fails_when_port_taken() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = ephemeral_config("127.0.0.1:9".parse().unwrap());
        config.http_bind_addr = taken.local_addr().unwrap();

        assert!(Bridge::bind(config).await.is_err());
    }

    #[tokio::test]
    async fn test_serve_sends_startup_refresh_and_stops_on_flag() {
        // Arrange: a fake upstream host.
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let bridge = Bridge::bind(ephemeral_config(upstream.local_addr().unwrap()))
            .await
            .unwrap();
        let running = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(bridge.serve(Arc::clone(&running)));

        // Act
        let mut buf = [0u8; 256];
        let (len, _) = timeout(Duration::from_secs(2), upstream.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();

        // Assert
        let msg = decode_packet(&buf[..len]).unwrap().into_messages().remove(0);
        assert_eq!(
            ControlCommand::from_message(&msg).unwrap(),
            Some(ControlCommand::Refresh)
        );

        running.store(false, Ordering::Relaxed);
        timeout(Duration::from_secs(3), task)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}

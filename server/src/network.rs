//! Server network layer handling UDP request/response traffic

use crate::engine::LeaderboardEngine;
use crate::error::EngineError;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Packet, MAX_PACKET_SIZE};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// Messages sent from network tasks to the main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived {
        packet: Packet,
        addr: SocketAddr,
    },
    #[allow(dead_code)]
    Shutdown,
}

/// A response queued for the outbound sender task
#[derive(Debug)]
pub struct Outbound {
    pub packet: Packet,
    pub addr: SocketAddr,
}

/// Main server coordinating the socket and the leaderboard engine
pub struct Server {
    socket: Arc<UdpSocket>,
    engine: Arc<LeaderboardEngine>,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    out_tx: mpsc::UnboundedSender<Outbound>,
    out_rx: mpsc::UnboundedReceiver<Outbound>,
}

impl Server {
    pub async fn new(
        addr: &str,
        engine: Arc<LeaderboardEngine>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", addr);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            engine,
            server_tx,
            server_rx,
            out_tx,
            out_rx,
        })
    }

    /// The address the socket actually bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Spawns task that continuously listens for incoming packets
    async fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; MAX_PACKET_SIZE];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that drains the outbound response queue
    async fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let mut out_rx = std::mem::replace(&mut self.out_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(Outbound { packet, addr }) = out_rx.recv().await {
                match serialize(&packet) {
                    Ok(data) => {
                        if let Err(e) = socket.send_to(&data, addr).await {
                            error!("Failed to send response to {}: {}", addr, e);
                        }
                    }
                    Err(e) => error!("Failed to serialize response: {}", e),
                }
            }
        });
    }

    /// Hands one request to the engine on its own task.
    ///
    /// Per-table locking inside the engine provides the required mutual
    /// exclusion, so requests for different tables proceed in parallel
    /// and one table's slow storage never stalls the others.
    fn dispatch_request(&self, packet: Packet, addr: SocketAddr) {
        let engine = Arc::clone(&self.engine);
        let out_tx = self.out_tx.clone();

        tokio::spawn(async move {
            if let Some(response) = handle_request(&engine, packet).await {
                if let Err(e) = out_tx.send(Outbound {
                    packet: response,
                    addr,
                }) {
                    error!("Failed to queue response: {}", e);
                }
            }
        });
    }

    /// Main server loop coordinating all operations
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_network_receiver().await;
        self.spawn_network_sender().await;

        info!("Server started successfully");

        while let Some(message) = self.server_rx.recv().await {
            match message {
                ServerMessage::PacketReceived { packet, addr } => {
                    self.dispatch_request(packet, addr);
                }
                ServerMessage::Shutdown => {
                    info!("Server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Produces the response for one request packet, if it warrants one.
///
/// Response variants arriving here are a misbehaving peer; they are
/// logged and dropped without a reply.
pub async fn handle_request(engine: &LeaderboardEngine, packet: Packet) -> Option<Packet> {
    match packet {
        Packet::ListTables => Some(Packet::Tables {
            tables: engine.tables(),
        }),

        Packet::GetLeaderboard { table } => {
            let table = table.trim().to_lowercase();
            Some(match engine.list(&table).await {
                Ok(entries) => Packet::Leaderboard { table, entries },
                Err(e) => error_packet(e),
            })
        }

        Packet::SubmitScore {
            table,
            name,
            score,
            proof,
        } => {
            let table = table.trim().to_lowercase();
            Some(match engine.submit(&table, &name, score, proof.as_deref()).await {
                Ok(entries) => Packet::Leaderboard { table, entries },
                Err(e) => error_packet(e),
            })
        }

        other => {
            warn!("Unexpected packet type: {:?}", other);
            None
        }
    }
}

fn error_packet(err: EngineError) -> Packet {
    if err.is_client_error() {
        debug!("Rejected request: {}", err);
    } else {
        error!("Request failed: {}", err);
    }

    Packet::Error {
        kind: err.kind(),
        message: err.to_string(),
    }
}

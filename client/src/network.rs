use bincode::{deserialize, serialize};
use log::warn;
use shared::{Packet, ScoreEntry, MAX_PACKET_SIZE};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// How long to wait for a response before retrying.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
/// How many times a request is sent before giving up.
const MAX_ATTEMPTS: u32 = 3;

pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
}

impl Client {
    pub async fn new(server_addr: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        Ok(Client {
            socket,
            server_addr,
        })
    }

    /// The tables the server is configured with.
    pub async fn list_tables(&self) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        match self.request(&Packet::ListTables).await? {
            Packet::Tables { tables } => Ok(tables),
            other => Err(unexpected(other)),
        }
    }

    /// The current leaderboard for `table`, highest score first.
    pub async fn fetch_leaderboard(
        &self,
        table: &str,
    ) -> Result<Vec<ScoreEntry>, Box<dyn std::error::Error>> {
        let packet = Packet::GetLeaderboard {
            table: table.to_string(),
        };

        match self.request(&packet).await? {
            Packet::Leaderboard { entries, .. } => Ok(entries),
            Packet::Error { kind, message } => Err(server_error(kind, message)),
            other => Err(unexpected(other)),
        }
    }

    /// Submits a score and returns the resulting leaderboard, which is
    /// unchanged when the score did not qualify.
    pub async fn submit_score(
        &self,
        table: &str,
        name: &str,
        score: i64,
        proof: Option<String>,
    ) -> Result<Vec<ScoreEntry>, Box<dyn std::error::Error>> {
        let packet = Packet::SubmitScore {
            table: table.to_string(),
            name: name.to_string(),
            score,
            proof,
        };

        match self.request(&packet).await? {
            Packet::Leaderboard { entries, .. } => Ok(entries),
            Packet::Error { kind, message } => Err(server_error(kind, message)),
            other => Err(unexpected(other)),
        }
    }

    async fn request(&self, packet: &Packet) -> Result<Packet, Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        let mut buffer = [0u8; MAX_PACKET_SIZE];

        for attempt in 1..=MAX_ATTEMPTS {
            self.socket.send_to(&data, self.server_addr).await?;

            match timeout(REQUEST_TIMEOUT, self.socket.recv_from(&mut buffer)).await {
                Ok(Ok((len, _))) => return Ok(deserialize(&buffer[0..len])?),
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => warn!(
                    "No response from {} (attempt {}/{})",
                    self.server_addr, attempt, MAX_ATTEMPTS
                ),
            }
        }

        Err("no response from server".into())
    }
}

fn server_error(
    kind: shared::ErrorKind,
    message: String,
) -> Box<dyn std::error::Error> {
    format!("{:?}: {}", kind, message).into()
}

fn unexpected(packet: Packet) -> Box<dyn std::error::Error> {
    format!("unexpected response packet: {:?}", packet).into()
}

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Largest datagram either side will send or accept.
///
/// A whole-table response must fit in one datagram, so this is the
/// maximum UDP payload rather than a typical game-packet size.
pub const MAX_PACKET_SIZE: usize = 65_507;

/// Messages exchanged between client and server.
///
/// The first three variants are requests, the rest are responses. Every
/// request receives exactly one response datagram.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    ListTables,
    GetLeaderboard {
        table: String,
    },
    SubmitScore {
        table: String,
        name: String,
        score: i64,
        proof: Option<String>,
    },

    Tables {
        tables: Vec<String>,
    },
    Leaderboard {
        table: String,
        entries: Vec<ScoreEntry>,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

/// Failure categories carried on the wire.
///
/// `NotFound` and `Forbidden` are client errors; `CorruptData` and
/// `StorageUnavailable` are server-side faults.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    CorruptData,
    StorageUnavailable,
}

/// One retained leaderboard row.
///
/// `time` is the unix-seconds submission timestamp; it is `None` for rows
/// recorded by a deployment that does not track submission times.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: i64,
    pub time: Option<u64>,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
            time: None,
        }
    }

    pub fn with_time(name: impl Into<String>, score: i64, time: u64) -> Self {
        Self {
            name: name.into(),
            score,
            time: Some(time),
        }
    }
}

/// Computes the proof value binding a name/score pair to a shared salt.
///
/// The digest is `hex(sha256(name || salt || score))` with the score in
/// decimal form. It is deterministic and guessable by anyone who knows the
/// salt: a tamper discouragement, not authentication.
pub fn binding_proof(name: &str, score: i64, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(score.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Current wall-clock time in unix seconds.
pub fn unix_time_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs()
}

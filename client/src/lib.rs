//! # Leaderboard Client Library
//!
//! This library provides the client side of the networked leaderboard:
//! a small request/response layer that lists tables, fetches rankings
//! and submits scores over UDP.
//!
//! ## Architecture Overview
//!
//! Every operation is one datagram out and one datagram back. UDP can
//! drop either side of that exchange, so each request is retried a
//! bounded number of times with a receive timeout before giving up.
//! Reads are idempotent; a submission retried because its response was
//! lost can be recorded twice if it qualified, which this tool accepts
//! as the cost of a connectionless protocol.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! Manages the socket, serialization, timeouts and retries, and turns
//! server error responses into typed failures.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("127.0.0.1:8080").await?;
//!
//!     for table in client.list_tables().await? {
//!         let entries = client.fetch_leaderboard(&table).await?;
//!         println!("{}: {} entries", table, entries.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod network;

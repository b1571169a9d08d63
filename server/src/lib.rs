//! # Leaderboard Server Library
//!
//! This library provides the service side of the networked leaderboard:
//! it owns every table's state, decides which submissions are retained,
//! and keeps the durable files and in-memory views consistent across
//! concurrent requests.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Ranking
//! The server holds the definitive copy of every table. A submission is
//! admitted only if the table has room or the candidate beats the
//! current minimum; accepted entries are merged, re-ranked and truncated
//! to the configured capacity before anything is sent back.
//!
//! ### Durable Storage
//! Each table persists as one delimited text file that is rewritten in
//! full on every accepted submission, through a temporary file and an
//! atomic rename. A reader never observes a table spanning old and new
//! data.
//!
//! ### Consistency Under Concurrency
//! All mutation of a table runs inside that table's critical section:
//! the load/merge/sort/truncate/persist sequence of two concurrent
//! submissions can never interleave, so capacity enforcement and
//! ranking order hold no matter how requests race. Tables are
//! independent — traffic on one never blocks another.
//!
//! ## Module Organization
//!
//! ### Engine Module (`engine`)
//! The orchestrator tying registry, store, cache and proof policy
//! together; implements the admission policy and the per-table critical
//! section.
//!
//! ### Store Module (`store`)
//! Reads and atomically rewrites the per-table files, creating them
//! lazily on first access. Parse failures surface as corruption errors
//! rather than silently dropped rows.
//!
//! ### Cache Module (`cache`)
//! Memoized sorted snapshots, one per table, invalidated on every write
//! and rebuilt lazily on the next read. The file is always the source
//! of truth.
//!
//! ### Network Module (`network`)
//! UDP request/response plumbing: a receiver task feeds the main loop,
//! each request is handled on its own task, and a sender task drains
//! the outbound queue.
//!
//! ### Supporting Modules
//! `registry` fixes the set of valid tables at startup, `proof` checks
//! the optional submission binding digest, `config` carries the frozen
//! process-wide settings and `error` defines the failure taxonomy.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::Config;
//! use server::engine::LeaderboardEngine;
//! use server::network::Server;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config {
//!         tables: vec!["highscores".to_string()],
//!         capacity: 100,
//!         data_dir: ".".into(),
//!         record_time: false,
//!         require_proof: false,
//!         proof_salt: String::new(),
//!     });
//!
//!     let engine = Arc::new(LeaderboardEngine::new(config));
//!     let mut server = Server::new("127.0.0.1:8080", engine).await?;
//!
//!     // Runs the receive/handle/respond loop until shutdown
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod network;
pub mod proof;
pub mod registry;
pub mod store;

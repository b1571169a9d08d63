//! Process-wide service configuration.
//!
//! Built once at startup from the parsed command line and shared by
//! reference afterwards; nothing mutates it while the server runs.

use std::path::PathBuf;

/// Immutable settings shared by every component.
#[derive(Debug, Clone)]
pub struct Config {
    /// Raw table identifiers as configured (normalized by the registry).
    pub tables: Vec<String>,
    /// Maximum retained entries per table; always at least 1.
    pub capacity: usize,
    /// Directory holding one delimited file per table.
    pub data_dir: PathBuf,
    /// Whether accepted entries are stamped with a submission time.
    pub record_time: bool,
    /// Whether submissions must carry a binding proof.
    pub require_proof: bool,
    /// Salt mixed into the binding proof digest.
    pub proof_salt: String,
}

impl Config {
    /// Splits a comma-separated table list as given on the command line.
    pub fn split_tables(raw: &str) -> Vec<String> {
        raw.split(',').map(str::to_string).collect()
    }
}

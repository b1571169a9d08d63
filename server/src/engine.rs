//! Leaderboard orchestration: admission, ranking, persistence.
//!
//! The engine owns every shared mutable resource — the per-table files
//! (through the store) and their cached snapshots — and funnels all
//! mutation through a per-table critical section so concurrent
//! submissions can never interleave their load/merge/persist sequence.

use crate::cache::RankingCache;
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::proof::ProofPolicy;
use crate::registry::TableRegistry;
use crate::store::TableStore;
use log::{debug, info};
use shared::{unix_time_secs, ScoreEntry};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Applies the admission policy and keeps tables sorted, bounded and
/// durable.
pub struct LeaderboardEngine {
    config: Arc<Config>,
    registry: TableRegistry,
    store: TableStore,
    cache: RankingCache,
    proof: ProofPolicy,
    /// One lock per registered table; held across the whole
    /// read-modify-write of a submission. Different tables never
    /// contend.
    table_locks: HashMap<String, Mutex<()>>,
}

impl LeaderboardEngine {
    pub fn new(config: Arc<Config>) -> Self {
        let registry = TableRegistry::new(&config.tables);
        let store = TableStore::new(&config.data_dir, config.record_time);
        let proof = ProofPolicy::from_config(config.require_proof, &config.proof_salt);

        let table_locks = registry
            .names()
            .iter()
            .map(|name| (name.clone(), Mutex::new(())))
            .collect();

        Self {
            config,
            registry,
            store,
            cache: RankingCache::new(),
            proof,
            table_locks,
        }
    }

    /// All registered table identifiers in configured order.
    pub fn tables(&self) -> Vec<String> {
        self.registry.names().to_vec()
    }

    fn resolve(&self, table_id: &str) -> Result<String> {
        let normalized = table_id.trim().to_lowercase();
        if self.registry.contains(&normalized) {
            Ok(normalized)
        } else {
            Err(EngineError::NotFound { table: normalized })
        }
    }

    /// The current leaderboard for `table_id`, highest score first.
    ///
    /// No side effects beyond creating the table file on first access.
    pub async fn list(&self, table_id: &str) -> Result<Vec<ScoreEntry>> {
        let table = self.resolve(table_id)?;
        let Some(lock) = self.table_locks.get(&table) else {
            return Err(EngineError::NotFound { table });
        };

        let _guard = lock.lock().await;
        self.cache.get_or_load(&table, &self.store).await
    }

    /// Submits a candidate score and returns the resulting leaderboard.
    ///
    /// A candidate that does not qualify (table full and score at or
    /// below the current minimum) is not an error: the unchanged
    /// leaderboard comes back and nothing is written. Equal scores keep
    /// submission order, so at full capacity a tie never displaces an
    /// incumbent.
    pub async fn submit(
        &self,
        table_id: &str,
        name: &str,
        score: i64,
        proof: Option<&str>,
    ) -> Result<Vec<ScoreEntry>> {
        let table = self.resolve(table_id)?;

        if !self.proof.verify(name, score, proof) {
            debug!("Rejected submission to '{}' with bad proof", table);
            return Err(EngineError::Forbidden);
        }

        let Some(lock) = self.table_locks.get(&table) else {
            return Err(EngineError::NotFound { table });
        };

        let _guard = lock.lock().await;
        let mut entries = self.cache.get_or_load(&table, &self.store).await?;

        // The minimum is always taken from the list itself; the 0
        // default is only read when the table is empty, and an empty
        // table can never satisfy the full-capacity condition.
        let lowest = entries.last().map(|e| e.score).unwrap_or(0);
        if entries.len() >= self.config.capacity && score <= lowest {
            debug!(
                "Table '{}' full, {} at {} does not beat minimum {}",
                table, name, score, lowest
            );
            return Ok(entries);
        }

        let mut entry = ScoreEntry::new(name, score);
        if self.config.record_time {
            entry.time = Some(unix_time_secs());
        }

        entries.push(entry);
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(self.config.capacity);

        self.store.save(&table, &entries).await?;
        self.cache.replace(&table, entries.clone()).await;

        info!("Table '{}': retained {} at score {}", table, name, score);
        Ok(entries)
    }
}

//! In-memory sorted views of tables.
//!
//! One snapshot per table identifier, rebuilt lazily from the store after
//! an invalidation. The snapshot is a disposable optimization; the file
//! on disk remains the source of truth. Nothing is evicted by size or
//! age — the table universe is small and fixed by the registry.

use crate::error::Result;
use crate::store::TableStore;
use shared::ScoreEntry;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Memoized, descending-sorted snapshots keyed by table identifier.
#[derive(Default)]
pub struct RankingCache {
    snapshots: RwLock<HashMap<String, Vec<ScoreEntry>>>,
}

impl RankingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized snapshot for `table_id`, rebuilding it from
    /// the store when absent.
    ///
    /// A rebuild stable-sorts by score descending, so equal scores keep
    /// their file order.
    pub async fn get_or_load(
        &self,
        table_id: &str,
        store: &TableStore,
    ) -> Result<Vec<ScoreEntry>> {
        if let Some(entries) = self.snapshots.read().await.get(table_id) {
            return Ok(entries.clone());
        }

        let mut entries = store.load(table_id).await?;
        entries.sort_by(|a, b| b.score.cmp(&a.score));

        self.snapshots
            .write()
            .await
            .insert(table_id.to_string(), entries.clone());

        Ok(entries)
    }

    /// Installs a fresh snapshot after a successful write.
    pub async fn replace(&self, table_id: &str, entries: Vec<ScoreEntry>) {
        self.snapshots
            .write()
            .await
            .insert(table_id.to_string(), entries);
    }

    /// Drops the snapshot so the next read goes back to the store.
    pub async fn invalidate(&self, table_id: &str) {
        self.snapshots.write().await.remove(table_id);
    }

    /// Whether a snapshot is currently memoized for `table_id`.
    pub async fn is_cached(&self, table_id: &str) -> bool {
        self.snapshots.read().await.contains_key(table_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_or_load_memoizes() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path(), false);
        let cache = RankingCache::new();

        store
            .save("scores", &[ScoreEntry::new("alice", 10)])
            .await
            .unwrap();

        assert!(!cache.is_cached("scores").await);
        let first = cache.get_or_load("scores", &store).await.unwrap();
        assert!(cache.is_cached("scores").await);

        // A store rewrite is invisible until the snapshot is invalidated
        store
            .save("scores", &[ScoreEntry::new("bob", 99)])
            .await
            .unwrap();
        let second = cache.get_or_load("scores", &store).await.unwrap();
        assert_eq!(first, second);

        cache.invalidate("scores").await;
        let third = cache.get_or_load("scores", &store).await.unwrap();
        assert_eq!(third, vec![ScoreEntry::new("bob", 99)]);
    }

    #[tokio::test]
    async fn test_rebuild_sorts_descending() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path(), false);
        let cache = RankingCache::new();

        // File order is not ranking order
        std::fs::write(
            dir.path().join("scores.csv"),
            "name,score\nbob,5\nalice,20\ncarol,10\n",
        )
        .unwrap();

        let entries = cache.get_or_load("scores", &store).await.unwrap();
        let scores: Vec<i64> = entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![20, 10, 5]);
    }

    #[tokio::test]
    async fn test_stable_sort_keeps_file_order_on_ties() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path(), false);
        let cache = RankingCache::new();

        std::fs::write(
            dir.path().join("scores.csv"),
            "name,score\nfirst,10\nsecond,10\nthird,10\n",
        )
        .unwrap();

        let entries = cache.get_or_load("scores", &store).await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_replace_installs_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path(), false);
        let cache = RankingCache::new();

        cache
            .replace("scores", vec![ScoreEntry::new("alice", 1)])
            .await;

        // Served from memory without any file present
        let entries = cache.get_or_load("scores", &store).await.unwrap();
        assert_eq!(entries, vec![ScoreEntry::new("alice", 1)]);
        assert!(!dir.path().join("scores.csv").exists());
    }

    #[tokio::test]
    async fn test_snapshots_are_per_table() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path(), false);
        let cache = RankingCache::new();

        cache
            .replace("arcade", vec![ScoreEntry::new("alice", 1)])
            .await;
        cache
            .replace("racing", vec![ScoreEntry::new("bob", 2)])
            .await;

        cache.invalidate("arcade").await;
        assert!(!cache.is_cached("arcade").await);
        assert!(cache.is_cached("racing").await);
    }
}

//! Durable table storage: one delimited text file per table.
//!
//! Files live under a configured directory as `<table_id>.csv` with a
//! header row (`name,score` or `name,score,time`), comma delimiters and
//! `\n` terminators. A save always rewrites the whole file through a
//! temporary sibling and an atomic rename, so a concurrent reader sees
//! either the old table or the new one, never a mix.

use crate::error::{EngineError, Result};
use log::debug;
use shared::ScoreEntry;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

const HEADER_BASIC: [&str; 2] = ["name", "score"];
const HEADER_TIMED: [&str; 3] = ["name", "score", "time"];

/// Reads and atomically rewrites the durable form of each table.
pub struct TableStore {
    data_dir: PathBuf,
    record_time: bool,
}

impl TableStore {
    /// Creates a store rooted at `data_dir`.
    ///
    /// `record_time` selects the column schema written on save; on load
    /// the file's own header row decides how rows are decoded.
    pub fn new(data_dir: impl AsRef<Path>, record_time: bool) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            record_time,
        }
    }

    fn table_path(&self, table_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", table_id))
    }

    /// Loads all entries for `table_id` in file order.
    ///
    /// A missing file is created empty as a side effect and yields an
    /// empty list. A file that does not parse fails with `CorruptData`;
    /// rows are never dropped or coerced.
    pub async fn load(&self, table_id: &str) -> Result<Vec<ScoreEntry>> {
        let path = self.table_path(table_id);

        match fs::read_to_string(&path).await {
            Ok(contents) => decode_table(table_id, &contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Table file {:?} missing, creating empty table", path);
                self.save(table_id, &[]).await?;
                Ok(Vec::new())
            }
            Err(e) => Err(EngineError::StorageUnavailable(e)),
        }
    }

    /// Replaces the durable file for `table_id` with `entries`.
    ///
    /// Ensures the data directory exists, then writes the full encoding
    /// to `<table_id>.csv.tmp` and renames it over the target.
    pub async fn save(&self, table_id: &str, entries: &[ScoreEntry]) -> Result<()> {
        fs::create_dir_all(&self.data_dir).await?;

        let encoded = encode_table(entries, self.record_time)?;
        let path = self.table_path(table_id);
        let tmp = path.with_extension("csv.tmp");

        fs::write(&tmp, &encoded).await?;
        fs::rename(&tmp, &path).await?;

        debug!("Wrote {} entries to {:?}", entries.len(), path);
        Ok(())
    }
}

fn corrupt(table_id: &str, reason: impl ToString) -> EngineError {
    EngineError::CorruptData {
        table: table_id.to_string(),
        reason: reason.to_string(),
    }
}

fn decode_table(table_id: &str, contents: &str) -> Result<Vec<ScoreEntry>> {
    let mut reader = csv::Reader::from_reader(contents.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| corrupt(table_id, &e))?
        .clone();

    let timed = if headers.iter().eq(HEADER_BASIC) {
        false
    } else if headers.iter().eq(HEADER_TIMED) {
        true
    } else {
        return Err(corrupt(
            table_id,
            format!("unrecognized header row '{}'", headers.iter().collect::<Vec<_>>().join(",")),
        ));
    };

    let mut entries = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| corrupt(table_id, &e))?;

        let name = record[0].to_string();
        let score: i64 = record[1]
            .parse()
            .map_err(|_| corrupt(table_id, format!("non-integer score '{}'", &record[1])))?;

        // A None time round-trips as an empty field.
        let time = if timed && !record[2].is_empty() {
            Some(record[2].parse::<u64>().map_err(|_| {
                corrupt(table_id, format!("non-integer time '{}'", &record[2]))
            })?)
        } else {
            None
        };

        entries.push(ScoreEntry { name, score, time });
    }

    Ok(entries)
}

fn encode_table(entries: &[ScoreEntry], record_time: bool) -> Result<Vec<u8>> {
    let to_io = |e: csv::Error| io::Error::new(io::ErrorKind::Other, e);

    let mut writer = csv::Writer::from_writer(Vec::new());

    if record_time {
        writer.write_record(HEADER_TIMED).map_err(to_io)?;
        for entry in entries {
            let time = entry.time.map(|t| t.to_string()).unwrap_or_default();
            writer
                .write_record([entry.name.as_str(), &entry.score.to_string(), &time])
                .map_err(to_io)?;
        }
    } else {
        writer.write_record(HEADER_BASIC).map_err(to_io)?;
        for entry in entries {
            writer
                .write_record([entry.name.as_str(), &entry.score.to_string()])
                .map_err(to_io)?;
        }
    }

    let encoded = writer
        .into_inner()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(name: &str, score: i64) -> ScoreEntry {
        ScoreEntry::new(name, score)
    }

    #[tokio::test]
    async fn test_load_creates_missing_table() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path(), false);

        let entries = store.load("scores").await.unwrap();
        assert!(entries.is_empty());

        // The empty table is durable after the first access
        let contents = std::fs::read_to_string(dir.path().join("scores.csv")).unwrap();
        assert_eq!(contents, "name,score\n");
    }

    #[tokio::test]
    async fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path(), false);

        let written = vec![entry("alice", 30), entry("bob", 20), entry("carol", -5)];
        store.save("scores", &written).await.unwrap();

        let loaded = store.load("scores").await.unwrap();
        assert_eq!(loaded, written);
    }

    #[tokio::test]
    async fn test_save_load_roundtrip_with_time() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path(), true);

        let written = vec![
            ScoreEntry::with_time("alice", 30, 1_700_000_001),
            ScoreEntry::new("legacy", 20),
        ];
        store.save("scores", &written).await.unwrap();

        let contents = std::fs::read_to_string(dir.path().join("scores.csv")).unwrap();
        assert_eq!(
            contents,
            "name,score,time\nalice,30,1700000001\nlegacy,20,\n"
        );

        let loaded = store.load("scores").await.unwrap();
        assert_eq!(loaded, written);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_file() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path(), false);

        store
            .save("scores", &[entry("alice", 1), entry("bob", 2)])
            .await
            .unwrap();
        store.save("scores", &[entry("carol", 3)]).await.unwrap();

        let loaded = store.load("scores").await.unwrap();
        assert_eq!(loaded, vec![entry("carol", 3)]);

        // No leftover temporary file
        assert!(!dir.path().join("scores.csv.tmp").exists());
    }

    #[tokio::test]
    async fn test_header_decides_schema_on_load() {
        let dir = TempDir::new().unwrap();

        // File written by a timed deployment, read by an untimed one
        std::fs::write(
            dir.path().join("scores.csv"),
            "name,score,time\nalice,10,1700000000\n",
        )
        .unwrap();

        let store = TableStore::new(dir.path(), false);
        let loaded = store.load("scores").await.unwrap();
        assert_eq!(
            loaded,
            vec![ScoreEntry::with_time("alice", 10, 1_700_000_000)]
        );
    }

    #[tokio::test]
    async fn test_corrupt_header_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scores.csv"), "player,points\nalice,10\n").unwrap();

        let store = TableStore::new(dir.path(), false);
        match store.load("scores").await {
            Err(EngineError::CorruptData { table, reason }) => {
                assert_eq!(table, "scores");
                assert!(reason.contains("header"));
            }
            other => panic!("Expected CorruptData, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_integer_score_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("scores.csv"),
            "name,score\nalice,10\nbob,ten\n",
        )
        .unwrap();

        let store = TableStore::new(dir.path(), false);
        match store.load("scores").await {
            Err(EngineError::CorruptData { reason, .. }) => {
                assert!(reason.contains("non-integer score"));
            }
            other => panic!("Expected CorruptData, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wrong_field_count_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("scores.csv"),
            "name,score\nalice,10,extra\n",
        )
        .unwrap();

        let store = TableStore::new(dir.path(), false);
        assert!(matches!(
            store.load("scores").await,
            Err(EngineError::CorruptData { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_file_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("scores.csv"), "").unwrap();

        let store = TableStore::new(dir.path(), false);
        assert!(matches!(
            store.load("scores").await,
            Err(EngineError::CorruptData { .. })
        ));
    }

    #[tokio::test]
    async fn test_names_with_delimiters_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = TableStore::new(dir.path(), false);

        let written = vec![entry("last, first", 10), entry("quote\"inside", 5)];
        store.save("scores", &written).await.unwrap();

        let loaded = store.load("scores").await.unwrap();
        assert_eq!(loaded, written);
    }
}

//! High score leaderboard system
//!
//! Persisted as JSON through a `KeyValueStore`, tracks top 10 scores.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Storage key for the leaderboard
pub const STORAGE_KEY: &str = "winterPlatformerHighScores";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's name
    pub name: String,
    /// Player's score
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub date: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a score, re-sort and trim to the top 10.
    /// Returns the rank achieved (1-indexed) or None if it fell off the table.
    pub fn add_score(&mut self, name: &str, score: u64, date: f64) -> Option<usize> {
        self.entries.push(HighScoreEntry {
            name: name.to_string(),
            score,
            date,
        });
        self.sort();

        let rank = self
            .entries
            .iter()
            .position(|e| e.score == score && e.date == date && e.name == name)
            .map(|i| i + 1);

        self.entries.truncate(MAX_HIGH_SCORES);
        rank.filter(|&r| r <= MAX_HIGH_SCORES)
    }

    /// Score descending, ties broken by most recent date
    fn sort(&mut self) {
        self.entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.date.total_cmp(&a.date))
        });
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Read the table from a store. Stored tables are re-sorted and trimmed.
    pub fn read(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        let Some(json) = store.get(STORAGE_KEY)? else {
            return Ok(Self::new());
        };
        let mut scores: HighScores = serde_json::from_str(&json)?;
        scores.sort();
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    /// Write the table to a store
    pub fn write(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(STORAGE_KEY, &json)
    }
}

/// Persistence collaborator the game calls at game-over and victory
pub trait HighScoreStore {
    /// Ordered leaderboard; storage failures yield an empty list
    fn load_high_scores(&mut self) -> Vec<HighScoreEntry>;
    /// Record a finished run; storage failures are logged and ignored
    fn save_high_score(&mut self, name: &str, score: u64);
}

/// `HighScoreStore` over any key-value backend
pub struct StoredHighScores<S: KeyValueStore> {
    store: S,
    clock: fn() -> f64,
}

impl<S: KeyValueStore> StoredHighScores<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: crate::platform::now_ms,
        }
    }

    /// Use a custom clock for entry dates
    pub fn with_clock(store: S, clock: fn() -> f64) -> Self {
        Self { store, clock }
    }
}

impl<S: KeyValueStore> HighScoreStore for StoredHighScores<S> {
    fn load_high_scores(&mut self) -> Vec<HighScoreEntry> {
        match HighScores::read(&self.store) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores.entries
            }
            Err(e) => {
                log::warn!("High scores unavailable ({e}), starting fresh");
                Vec::new()
            }
        }
    }

    fn save_high_score(&mut self, name: &str, score: u64) {
        let mut scores = HighScores {
            entries: self.load_high_scores(),
        };
        let rank = scores.add_score(name, score, (self.clock)());

        match scores.write(&mut self.store) {
            Ok(()) => log::info!(
                "High score saved: {name} {score} (rank {rank:?}, {} entries)",
                scores.entries.len()
            ),
            Err(e) => log::error!("Failed to save high scores: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn fixed_clock() -> f64 {
        1_700_000_000_000.0
    }

    #[test]
    fn test_sorted_descending_and_trimmed() {
        let mut scores = HighScores::new();
        for i in 0..15u64 {
            scores.add_score("P", i * 10, i as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(140));
        assert!(scores.entries.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_prefer_most_recent() {
        let mut scores = HighScores::new();
        scores.add_score("OLD", 500, 1.0);
        let rank = scores.add_score("NEW", 500, 2.0);
        assert_eq!(rank, Some(1));
        assert_eq!(scores.entries[0].name, "NEW");
        assert_eq!(scores.entries[1].name, "OLD");
    }

    #[test]
    fn test_low_score_falls_off_full_table() {
        let mut scores = HighScores::new();
        for i in 0..MAX_HIGH_SCORES as u64 {
            scores.add_score("P", 1000 + i, 0.0);
        }
        assert_eq!(scores.add_score("LOW", 1, 5.0), None);
        assert!(scores.entries.iter().all(|e| e.name != "LOW"));
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let mut board = StoredHighScores::with_clock(MemoryStore::new(), fixed_clock);
        for (i, score) in [300u64, 900, 100, 900, 50, 700, 20, 10, 5, 2, 1, 400].iter().enumerate() {
            board.save_high_score(&format!("P{i}"), *score);
        }

        let loaded = board.load_high_scores();
        assert!(loaded.len() <= MAX_HIGH_SCORES);
        assert_eq!(loaded[0].score, 900);
        assert!(loaded.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{ definitely not a table").unwrap();
        let mut board = StoredHighScores::new(store);
        assert!(board.load_high_scores().is_empty());
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_failed_save_is_ignored() {
        let mut board = StoredHighScores::new(ReadOnlyStore);
        board.save_high_score("ANNA", 250);
        assert!(board.load_high_scores().is_empty());
    }
}

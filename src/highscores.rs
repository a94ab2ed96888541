//! Best-score persistence seam
//!
//! The simulation owns the comparison (a run's final score beats the stored
//! best or it doesn't); where the value lives is the embedding layer's
//! business. Load at startup, save on game over if beaten.

use std::fs;
use std::path::PathBuf;

/// Storage backend for the persisted best score
pub trait ScoreStore {
    /// Best score on record, if any
    fn load(&mut self) -> Option<u64>;
    /// Persist a new best score
    fn save(&mut self, score: u64);
}

/// Volatile store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub value: Option<u64>,
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Option<u64> {
        self.value
    }

    fn save(&mut self, score: u64) {
        self.value = Some(score);
    }
}

/// JSON file store for native runs
///
/// Storage failures are absorbed with a log line; losing a high score must
/// never take the game down.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ScoreStore for FileStore {
    fn load(&mut self) -> Option<u64> {
        let json = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&json) {
            Ok(score) => Some(score),
            Err(e) => {
                log::warn!("ignoring corrupt high-score file {:?}: {e}", self.path);
                None
            }
        }
    }

    fn save(&mut self, score: u64) {
        match serde_json::to_string(&score) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    log::warn!("failed to save high score to {:?}: {e}", self.path);
                }
            }
            Err(e) => log::warn!("failed to encode high score: {e}"),
        }
    }
}

/// Write `score` through the store if it beats `best`; returns the new best
pub fn record_if_beaten(store: &mut dyn ScoreStore, best: u64, score: u64) -> u64 {
    if score > best {
        store.save(score);
        score
    } else {
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load(), None);
        store.save(500);
        assert_eq!(store.load(), Some(500));
    }

    #[test]
    fn record_only_on_improvement() {
        let mut store = MemoryStore::default();
        store.save(300);

        assert_eq!(record_if_beaten(&mut store, 300, 200), 300);
        assert_eq!(store.load(), Some(300));

        assert_eq!(record_if_beaten(&mut store, 300, 450), 450);
        assert_eq!(store.load(), Some(450));
    }

    #[test]
    fn equal_score_is_not_an_improvement() {
        let mut store = MemoryStore::default();
        store.save(300);
        assert_eq!(record_if_beaten(&mut store, 300, 300), 300);
        assert_eq!(store.load(), Some(300));
    }

    #[test]
    fn file_store_survives_missing_file() {
        let mut store = FileStore::new(PathBuf::from("/nonexistent/dir/highscore.json"));
        assert_eq!(store.load(), None);
    }
}

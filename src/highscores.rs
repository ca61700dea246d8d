//! Best score record
//!
//! A single integer persisted as decimal text under the `highScore` key.

use crate::platform::{KeyValueStore, StorageError};

/// Storage key for the best score
pub const STORAGE_KEY: &str = "highScore";

/// Parse a stored best score
///
/// Reads the leading decimal digits after optional whitespace and an optional
/// `+`, so `"42"`, `"+42"` and `"42 points"` all give 42. Missing, empty,
/// negative or non-numeric values give 0.
pub fn parse_high_score(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else { return 0 };
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().unwrap_or(0)
}

/// The persisted best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Load from storage, falling back to 0 on any problem
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(STORAGE_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Could not load high score: {}", e);
                None
            }
        };
        let best = parse_high_score(raw.as_deref());
        log::info!("Loaded high score: {}", best);
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Offer a score. Stores it and returns true if it beats the best.
    ///
    /// The in-memory best is raised even when the write fails so the rest of
    /// the session stays consistent.
    pub fn submit(&mut self, score: u64, store: &dyn KeyValueStore) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Err(e) = self.save(store) {
            log::warn!("Could not save high score: {}", e);
        }
        true
    }

    /// Write the current best to storage
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(STORAGE_KEY, &self.best.to_string())
    }
}

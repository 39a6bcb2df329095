//! High score
//!
//! A single numeric slot, loaded at startup and written only when beaten.

use crate::persistence::Storage;

/// Best score across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Storage key for the high score slot
    pub const STORAGE_KEY: &'static str = "breakout_high_score";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Load the stored high score, falling back to zero on any failure
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(best) => {
                    log::info!("Loaded high score {}", best);
                    Self { best }
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt high score {:?}: {}", raw, e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("High score unavailable: {}", e);
                Self::default()
            }
        }
    }

    /// Check if a score beats the stored one
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record `score` if it beats the stored value.
    /// Returns true when a new high score was set.
    pub fn submit(&mut self, score: u64, storage: &mut dyn Storage) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &score.to_string()) {
            log::warn!("Failed to save high score: {}", e);
        }
        true
    }
}

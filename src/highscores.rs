//! Best score record
//!
//! A single number persisted under `bestScore`, the key the web build has
//! always used, so existing browser saves carry over.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::persistence::KvStore;

/// Highest rounded score ever reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "bestScore";

    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Raise the best to `score` if higher. Returns true if it improved.
    pub fn observe(&mut self, score: u64) -> bool {
        if score > self.value {
            self.value = score;
            true
        } else {
            false
        }
    }

    /// Load from a store, starting from zero if anything goes wrong
    pub fn load<S: KvStore + ?Sized>(store: &S) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) if raw.is_finite() && raw > 0.0 => {
                let best = Self::new(raw.round() as u64);
                log::info!("Loaded best score {}", best.value);
                best
            }
            Ok(_) => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read best score: {}", e);
                Self::default()
            }
        }
    }

    /// Write to a store
    pub fn save<S: KvStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.set(Self::STORAGE_KEY, self.value as f64)?;
        log::debug!("Best score saved ({})", self.value);
        Ok(())
    }
}

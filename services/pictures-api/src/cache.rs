//! In-memory picture cache keyed by rover and Earth date.
//!
//! Entries are encoded data-URI strings, stored whole after a successful
//! fetch-and-encode cycle. The cache is volatile: it starts empty, lives
//! for the process lifetime, and is never evicted or expired.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use pictures_common::Rover;

/// Process-wide picture cache.
///
/// Storing a date replaces the rover's entire date map, so a rover holds at
/// most one cached date at a time; writing a new date drops the previous
/// one. Callers must not assume multi-date retention per rover.
#[derive(Default)]
pub struct PictureCache {
    entries: RwLock<HashMap<Rover, HashMap<String, Vec<String>>>>,
}

impl PictureCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the encoded images for a rover and canonical date.
    pub async fn lookup(&self, rover: Rover, date: &str) -> Option<Vec<String>> {
        let guard = self.entries.read().await;
        let images = guard.get(&rover).and_then(|dates| dates.get(date));
        if images.is_some() {
            debug!(rover = %rover, date = %date, "Picture cache hit");
        }
        images.cloned()
    }

    /// Store the complete encoded image list for a rover and date.
    pub async fn store(&self, rover: Rover, date: &str, images: Vec<String>) {
        let mut guard = self.entries.write().await;
        let mut dates = HashMap::new();
        dates.insert(date.to_string(), images);
        guard.insert(rover, dates);
        debug!(rover = %rover, date = %date, "Pictures cached");
    }

    /// Number of rovers with at least one cached date.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

//! Startup cache preloading from a human-entered date list.
//!
//! The date list is loosely formatted, so each entry is normalized to the
//! canonical form before it is fetched and cached for the configured
//! default rover. Dates load independently: one failure never aborts the
//! rest, and the request path never waits on preloading.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{info, warn};

use pictures_common::normalize_date;

use crate::handlers;
use crate::state::AppState;

/// Outcome of one preload batch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PreloadSummary {
    /// Dates fetched, encoded, and cached.
    pub loaded: usize,
    /// Dates whose fetch-and-encode cycle failed.
    pub failed: usize,
    /// Entries that matched no supported date format.
    pub skipped: usize,
}

/// Cache preloader for warming pictures at startup.
pub struct CachePreloader {
    state: Arc<AppState>,
}

impl CachePreloader {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Normalize and load every date in the list.
    pub async fn preload(&self, raw_dates: &[String]) -> PreloadSummary {
        let start = Instant::now();
        let rover = self.state.config.preload_rover;

        let mut summary = PreloadSummary::default();
        let mut dates = Vec::new();
        for raw in raw_dates {
            if raw.trim().is_empty() {
                continue;
            }
            match normalize_date(raw) {
                Ok(date) => dates.push(date),
                Err(err) => {
                    warn!(input = %raw, error = %err, "Skipping unparseable preload date");
                    summary.skipped += 1;
                }
            }
        }

        info!(rover = %rover, dates = dates.len(), "Starting cache preload");

        let semaphore = Arc::new(Semaphore::new(self.state.config.preload_concurrency));
        let mut handles = Vec::new();

        for date in dates {
            let permit = semaphore.clone().acquire_owned().await.unwrap();
            let state = self.state.clone();

            handles.push(tokio::spawn(async move {
                let result = handlers::fetch_and_cache(&state, rover, &date).await;
                drop(permit);
                (date, result)
            }));
        }

        for handle in handles {
            match handle.await {
                Ok((date, Ok(images))) => {
                    info!(date = %date, images = images.len(), "Preloaded pictures");
                    self.state
                        .metrics
                        .preloaded_dates
                        .fetch_add(1, Ordering::Relaxed);
                    summary.loaded += 1;
                }
                Ok((date, Err(err))) => {
                    warn!(date = %date, error = %err, "Failed to preload date");
                    self.state
                        .metrics
                        .preload_failures
                        .fetch_add(1, Ordering::Relaxed);
                    summary.failed += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Preload task panicked");
                    summary.failed += 1;
                }
            }
        }

        info!(
            loaded = summary.loaded,
            failed = summary.failed,
            skipped = summary.skipped,
            duration_ms = start.elapsed().as_millis() as u64,
            "Cache preload complete"
        );

        summary
    }
}

//! Application metrics collection and reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Metrics collector for the pictures API.
#[derive(Debug)]
pub struct MetricsCollector {
    /// Request counts
    pub picture_requests: AtomicU64,
    pub validation_failures: AtomicU64,
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub upstream_failures: AtomicU64,

    /// Preload stats
    pub preloaded_dates: AtomicU64,
    pub preload_failures: AtomicU64,

    /// Start time for uptime calculation
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            picture_requests: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            upstream_failures: AtomicU64::new(0),
            preloaded_dates: AtomicU64::new(0),
            preload_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Render all counters in Prometheus text exposition format.
    pub fn render_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# HELP picture_requests_total Total picture requests\n# TYPE picture_requests_total counter\npicture_requests_total {}\n",
            self.picture_requests.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "# HELP validation_failures_total Requests rejected by validation\n# TYPE validation_failures_total counter\nvalidation_failures_total {}\n",
            self.validation_failures.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "# HELP picture_cache_hits_total Picture cache hits\n# TYPE picture_cache_hits_total counter\npicture_cache_hits_total {}\n",
            self.cache_hits.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "# HELP picture_cache_misses_total Picture cache misses\n# TYPE picture_cache_misses_total counter\npicture_cache_misses_total {}\n",
            self.cache_misses.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "# HELP upstream_failures_total Failed upstream fetch cycles\n# TYPE upstream_failures_total counter\nupstream_failures_total {}\n",
            self.upstream_failures.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "# HELP preloaded_dates_total Dates preloaded into the cache at startup\n# TYPE preloaded_dates_total counter\npreloaded_dates_total {}\n",
            self.preloaded_dates.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "# HELP preload_failures_total Preload dates that failed to load\n# TYPE preload_failures_total counter\npreload_failures_total {}\n",
            self.preload_failures.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "# HELP uptime_seconds Service uptime in seconds\n# TYPE uptime_seconds gauge\nuptime_seconds {}\n",
            self.uptime_secs()
        ));

        output
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

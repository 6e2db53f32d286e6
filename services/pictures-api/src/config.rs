//! Service configuration loaded from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use pictures_common::Rover;

/// Configuration for the pictures API service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API key appended to every upstream URL.
    pub api_key: String,
    /// Base URL of the upstream imagery API, without a trailing slash.
    pub api_base_url: String,
    /// Newline-delimited list of dates to preload at startup.
    pub preload_dates_file: PathBuf,
    /// Rover whose pictures the preloader fetches.
    pub preload_rover: Rover,
    /// Number of preload dates fetched concurrently.
    pub preload_concurrency: usize,
    /// Optional upstream request timeout. Unset means requests wait
    /// indefinitely, matching the long-standing service behavior.
    pub request_timeout: Option<Duration>,
}

impl ApiConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let api_key = env::var("NASA_API_KEY").unwrap_or_else(|_| "DEMO_KEY".to_string());

        let api_base_url = env::var("NASA_API_BASE_URL")
            .unwrap_or_else(|_| "https://api.nasa.gov/mars-photos/api/v1".to_string());
        let api_base_url = api_base_url.trim_end_matches('/').to_string();

        let preload_dates_file = env::var("PRELOAD_DATES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./config/dates.txt"));

        let preload_concurrency = env::var("PRELOAD_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(4);

        let request_timeout = env::var("NASA_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs);

        Self {
            api_key,
            api_base_url,
            preload_dates_file,
            preload_rover: Rover::Curiosity,
            preload_concurrency,
            request_timeout,
        }
    }
}

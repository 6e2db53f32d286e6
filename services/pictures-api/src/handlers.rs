//! HTTP handlers for the pictures API.

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use pictures_common::{ApiError, ApiResult, Rover};

use crate::encoder;
use crate::state::AppState;
use crate::validation;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PicturesQuery {
    pub rover: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "Error")]
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /pictures?rover=..&date=.. - Fetch pictures for a rover and date
#[instrument(skip(state))]
pub async fn pictures_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<PicturesQuery>,
) -> Response {
    match get_pictures(&state, query.rover.as_deref(), query.date.as_deref()).await {
        Ok(images) => (StatusCode::OK, Json(ImagesResponse { images })).into_response(),
        Err(err) => {
            let status = StatusCode::from_u16(err.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health - Basic health check
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics - Prometheus metrics endpoint
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render_prometheus(),
    )
        .into_response()
}

// ============================================================================
// Core Request Path
// ============================================================================

/// Resolve a picture request: validate, consult the cache, and on a miss
/// fetch, encode, and cache the result.
pub async fn get_pictures(
    state: &AppState,
    rover: Option<&str>,
    date: Option<&str>,
) -> ApiResult<Vec<String>> {
    state.metrics.picture_requests.fetch_add(1, Ordering::Relaxed);

    let validation = validation::validate_request(rover, date);
    if !validation.valid {
        state
            .metrics
            .validation_failures
            .fetch_add(1, Ordering::Relaxed);
        let reason = validation
            .reason
            .unwrap_or_else(|| "Invalid Request".to_string());
        return Err(ApiError::InvalidRequest(reason));
    }

    // Both parameters are present and well-formed once validation passes.
    let rover = Rover::from_str(rover.unwrap_or_default())
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let date = date.unwrap_or_default();

    if let Some(images) = state.cache.lookup(rover, date).await {
        state.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
        info!(rover = %rover, date = %date, images = images.len(), "Serving pictures from cache");
        return Ok(images);
    }
    state.metrics.cache_misses.fetch_add(1, Ordering::Relaxed);

    match fetch_and_cache(state, rover, date).await {
        Ok(images) => Ok(images),
        Err(err) => {
            state
                .metrics
                .upstream_failures
                .fetch_add(1, Ordering::Relaxed);
            warn!(rover = %rover, date = %date, error = %err, "Upstream fetch failed");
            Err(err)
        }
    }
}

/// Fetch the photo list, encode every image, and store the result.
///
/// Shared by the request path and the startup preloader. The cache is only
/// written after the entire encode succeeds, so an entry is never partial.
pub async fn fetch_and_cache(state: &AppState, rover: Rover, date: &str) -> ApiResult<Vec<String>> {
    info!(rover = %rover, date = %date, "Fetching pictures from upstream");

    let photos = state.source.fetch_photos(rover, date).await?;
    let images = encoder::encode_images(state.source.as_ref(), &photos).await?;
    state.cache.store(rover, date, images.clone()).await;

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::nasa::{PhotoRef, PhotoSource};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicUsize;

    fn test_config() -> ApiConfig {
        ApiConfig {
            api_key: "TEST_KEY".to_string(),
            api_base_url: "http://localhost:9000/api/v1".to_string(),
            preload_dates_file: PathBuf::from("./config/dates.txt"),
            preload_rover: Rover::Curiosity,
            preload_concurrency: 4,
            request_timeout: None,
        }
    }

    struct CountingSource {
        photos: Vec<PhotoRef>,
        fail_photos: bool,
        photo_calls: AtomicUsize,
        image_calls: AtomicUsize,
    }

    impl CountingSource {
        fn with_photos(urls: &[&str]) -> Self {
            Self {
                photos: urls
                    .iter()
                    .map(|u| PhotoRef {
                        img_src: u.to_string(),
                    })
                    .collect(),
                fail_photos: false,
                photo_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                photos: Vec::new(),
                fail_photos: true,
                photo_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PhotoSource for CountingSource {
        async fn fetch_photos(&self, _rover: Rover, _date: &str) -> ApiResult<Vec<PhotoRef>> {
            self.photo_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_photos {
                return Err(ApiError::Upstream("503 Service Unavailable".to_string()));
            }
            Ok(self.photos.clone())
        }

        async fn fetch_image(&self, _url: &str) -> ApiResult<Bytes> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from_static(b"data"))
        }
    }

    fn state_with(source: Arc<CountingSource>) -> AppState {
        AppState::with_source(test_config(), source)
    }

    #[tokio::test]
    async fn test_miss_fetches_then_hit_serves_from_cache() {
        let source = Arc::new(CountingSource::with_photos(&["http://img/1.jpg"]));
        let state = state_with(source.clone());

        let first = get_pictures(&state, Some("curiosity"), Some("2015-12-30"))
            .await
            .unwrap();
        assert_eq!(first, vec!["data:image/jpeg;base64,ZGF0YQ==".to_string()]);
        assert_eq!(source.photo_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.image_calls.load(Ordering::SeqCst), 1);

        let second = get_pictures(&state, Some("curiosity"), Some("2015-12-30"))
            .await
            .unwrap();
        assert_eq!(second, first);
        // No further upstream traffic on the cache hit.
        assert_eq!(source.photo_calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.image_calls.load(Ordering::SeqCst), 1);

        assert_eq!(state.metrics.cache_misses.load(Ordering::Relaxed), 1);
        assert_eq!(state.metrics.cache_hits.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_rover_casing_shares_one_cache_entry() {
        let source = Arc::new(CountingSource::with_photos(&["http://img/1.jpg"]));
        let state = state_with(source.clone());

        get_pictures(&state, Some("Curiosity"), Some("2015-12-30"))
            .await
            .unwrap();
        get_pictures(&state, Some("CURIOSITY"), Some("2015-12-30"))
            .await
            .unwrap();

        assert_eq!(source.photo_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_rover_is_rejected_without_upstream_or_cache_access() {
        let source = Arc::new(CountingSource::with_photos(&[]));
        let state = state_with(source.clone());

        let err = get_pictures(&state, Some("Zhurong"), Some("2015-12-30"))
            .await
            .unwrap_err();

        assert_eq!(err.http_status_code(), 400);
        assert!(err.to_string().contains("Zhurong"));
        assert_eq!(source.photo_calls.load(Ordering::SeqCst), 0);
        assert!(state.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_date_is_rejected() {
        let source = Arc::new(CountingSource::with_photos(&[]));
        let state = state_with(source);

        let err = get_pictures(&state, Some("curiosity"), None)
            .await
            .unwrap_err();

        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.to_string(), "No Date Provided");
    }

    #[tokio::test]
    async fn test_upstream_failure_maps_to_500_and_caches_nothing() {
        let source = Arc::new(CountingSource::failing());
        let state = state_with(source.clone());

        let err = get_pictures(&state, Some("spirit"), Some("2008-03-15"))
            .await
            .unwrap_err();

        assert_eq!(err.http_status_code(), 500);
        assert!(err.to_string().contains("503"));
        assert!(state.cache.is_empty().await);
        assert_eq!(state.metrics.upstream_failures.load(Ordering::Relaxed), 1);

        // The failure is not cached, so a retry goes upstream again.
        let _ = get_pictures(&state, Some("spirit"), Some("2008-03-15")).await;
        assert_eq!(source.photo_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_photo_list_caches_empty_response() {
        let source = Arc::new(CountingSource::with_photos(&[]));
        let state = state_with(source.clone());

        let images = get_pictures(&state, Some("opportunity"), Some("2010-06-01"))
            .await
            .unwrap();
        assert!(images.is_empty());

        // The empty result is still a complete, cacheable answer.
        let again = get_pictures(&state, Some("opportunity"), Some("2010-06-01"))
            .await
            .unwrap();
        assert!(again.is_empty());
        assert_eq!(source.photo_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pictures_handler_status_codes() {
        let source = Arc::new(CountingSource::with_photos(&["http://img/1.jpg"]));
        let state = Arc::new(state_with(source));

        let ok = pictures_handler(
            Extension(state.clone()),
            Query(PicturesQuery {
                rover: Some("curiosity".to_string()),
                date: Some("2015-12-30".to_string()),
            }),
        )
        .await;
        assert_eq!(ok.status(), StatusCode::OK);

        let bad = pictures_handler(
            Extension(state.clone()),
            Query(PicturesQuery {
                rover: None,
                date: Some("2015-12-30".to_string()),
            }),
        )
        .await;
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_error_body_uses_capitalized_error_field() {
        let body = serde_json::to_value(ErrorResponse {
            error: "No Rover Provided".to_string(),
        })
        .unwrap();
        assert_eq!(body["Error"], "No Rover Provided");
    }
}

//! Upstream imagery API client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::debug;

use pictures_common::{ApiError, ApiResult, Rover};

use crate::config::ApiConfig;

/// One photo record from the upstream metadata payload.
///
/// The upstream response carries more fields (camera, sol, rover details);
/// only the image source URL is needed here, the rest is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoRef {
    pub img_src: String,
}

#[derive(Debug, Deserialize)]
struct PhotosPayload {
    photos: Vec<PhotoRef>,
}

/// Source of photo metadata and raw image bytes.
///
/// The production implementation talks to the upstream HTTP API; tests
/// substitute in-memory stubs.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// List the photos taken by `rover` on the given canonical date.
    async fn fetch_photos(&self, rover: Rover, date: &str) -> ApiResult<Vec<PhotoRef>>;

    /// Fetch the raw bytes of a single image.
    async fn fetch_image(&self, url: &str) -> ApiResult<Bytes>;
}

/// HTTP client for the NASA Mars Rover Photos API.
pub struct NasaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    /// Create a client from service configuration.
    ///
    /// No timeout is applied unless one is configured.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the photo metadata URL for a rover and canonical date.
    pub fn photos_url(&self, rover: Rover, date: &str) -> String {
        format!(
            "{}/rovers/{}/photos?earth_date={}&api_key={}",
            self.base_url,
            rover.as_str(),
            date,
            self.api_key
        )
    }
}

#[async_trait]
impl PhotoSource for NasaClient {
    async fn fetch_photos(&self, rover: Rover, date: &str) -> ApiResult<Vec<PhotoRef>> {
        let url = self.photos_url(rover, date);
        debug!(rover = %rover, date = %date, "Fetching photo list");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?
            .error_for_status()
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        let payload: PhotosPayload = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(e.to_string()))?;

        debug!(rover = %rover, date = %date, photos = payload.photos.len(), "Photo list fetched");
        Ok(payload.photos)
    }

    async fn fetch_image(&self, url: &str) -> ApiResult<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::ImageFetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| ApiError::ImageFetch(e.to_string()))?;

        response
            .bytes()
            .await
            .map_err(|e| ApiError::ImageFetch(e.to_string()))
    }
}

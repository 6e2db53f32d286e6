//! Error types for the mars-pictures services.

use thiserror::Error;

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

/// Primary error type for picture retrieval operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request parameters failed validation. Surfaced to the caller as-is.
    #[error("{0}")]
    InvalidRequest(String),

    /// The upstream photo metadata call failed.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// A per-image fetch failed. The whole batch is discarded.
    #[error("Image fetch failed: {0}")]
    ImageFetch(String),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::Upstream(_) | ApiError::ImageFetch(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidRequest("No Rover Provided".into()).http_status_code(),
            400
        );
        assert_eq!(ApiError::Upstream("boom".into()).http_status_code(), 500);
        assert_eq!(ApiError::ImageFetch("boom".into()).http_status_code(), 500);
    }

    #[test]
    fn test_validation_message_passes_through_unchanged() {
        let err = ApiError::InvalidRequest("No Date Provided".into());
        assert_eq!(err.to_string(), "No Date Provided");
    }
}

//! Concurrent image fetching and data-URI encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::stream::{self, StreamExt};

use pictures_common::ApiResult;

use crate::nasa::{PhotoRef, PhotoSource};

/// Fetch every referenced image and encode it as a base64 data URI.
///
/// All fetches run concurrently and every one is driven to completion
/// before the call returns; a failed fetch does not cancel its siblings.
/// The returned order is completion order, not input order. Any failure
/// fails the whole call, so either every image is delivered or none are.
pub async fn encode_images(
    source: &dyn PhotoSource,
    refs: &[PhotoRef],
) -> ApiResult<Vec<String>> {
    let urls: Vec<String> = refs.iter().map(|p| p.img_src.clone()).collect();
    let results: Vec<ApiResult<String>> = stream::iter(urls)
        .map(|url| async move { source.fetch_image(&url).await })
        .buffer_unordered(refs.len().max(1))
        .map(|body| body.map(|bytes| to_data_uri(&bytes)))
        .collect()
        .await;

    results.into_iter().collect()
}

/// Wrap raw image bytes as a self-contained JPEG data URI.
fn to_data_uri(body: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(body))
}

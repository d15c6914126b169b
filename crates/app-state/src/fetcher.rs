//! Content fetchers
//!
//! A [`MediaFetcher`] turns one content request into a flat list of
//! [`MediaItem`]s. Failures are reported as [`FetchError`] and are never
//! fatal: callers fall back to an empty or stale listing.

use crate::catalog::MediaItem;
use crate::paging::{PageWindow, VIDEO_PAGE_SIZE};
use async_trait::async_trait;
use sanity_client::{ContentError, SanityClient};
use thiserror::Error;

/// Fetch errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not complete or was rejected
    #[error("Content request failed: {0}")]
    Request(String),

    /// The response arrived but could not be decoded
    #[error("Malformed content: {0}")]
    Malformed(String),
}

impl From<ContentError> for FetchError {
    fn from(err: ContentError) -> Self {
        if err.is_decode_error() {
            FetchError::Malformed(err.message().to_string())
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

/// Result type for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Source of media items
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch items, optionally restricted to a window of the listing
    async fn fetch(&self, window: Option<PageWindow>) -> Result<Vec<MediaItem>>;
}

/// Loads every photo; windows are ignored
#[derive(Debug, Clone)]
pub struct PhotoFetcher {
    client: SanityClient,
}

impl PhotoFetcher {
    /// Create a photo fetcher
    pub fn new(client: SanityClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaFetcher for PhotoFetcher {
    async fn fetch(&self, _window: Option<PageWindow>) -> Result<Vec<MediaItem>> {
        let docs = self.client.photos().await.map_err(|e| {
            tracing::warn!("Failed to fetch photos: {}", e);
            FetchError::from(e)
        })?;
        Ok(docs.into_iter().map(MediaItem::from).collect())
    }
}

/// Loads deep-linkable videos one window at a time
#[derive(Debug, Clone)]
pub struct VideoFetcher {
    client: SanityClient,
}

impl VideoFetcher {
    /// Create a video fetcher
    pub fn new(client: SanityClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaFetcher for VideoFetcher {
    async fn fetch(&self, window: Option<PageWindow>) -> Result<Vec<MediaItem>> {
        let window = window.unwrap_or_else(|| PageWindow::new(0, VIDEO_PAGE_SIZE));
        let docs = self
            .client
            .videos_page(window.start, window.len)
            .await
            .map_err(|e| {
                tracing::warn!(start = window.start, "Failed to fetch videos: {}", e);
                FetchError::from(e)
            })?;
        Ok(docs.into_iter().map(MediaItem::from).collect())
    }
}

//! Sanity Content Client Library
//!
//! This crate provides a small Rust client for the Sanity content API used by
//! the portfolio site: GROQ queries over HTTP, retry with backoff, typed
//! document records, asset references, and image/video URL helpers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod documents;
pub mod image_url;
pub mod types;
pub mod vimeo;

#[cfg(test)]
pub mod test_utils;

pub use client::{ContentError, ContentRequest, ContentResponse, SanityClient, SanityConfig};
pub use image_url::{ImageAsset, ImageFormat, ImageUrlBuilder};
pub use types::{AssetReference, ImageField, Slug, SlugField};

/// Result type for content client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for content client operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Content API error
    #[error("Content API error: {0}")]
    Content(#[from] ContentError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Asset reference could not be parsed
    #[error("Invalid asset reference: {0}")]
    InvalidAsset(String),
}

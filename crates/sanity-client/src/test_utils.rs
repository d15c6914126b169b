//! Test utilities and fixtures for content client testing
//!
//! This module provides document fixtures and response-body builders shared
//! by the unit tests in this crate.

#![allow(dead_code)] // Test utilities may not all be used yet

use crate::documents::{PhotoDocument, VideoDocument};
use crate::types::{AssetReference, ImageField, SlugField};

/// Photo fixtures
pub mod photos {
    use super::*;

    /// Photo with slug, category and image
    pub fn photo(id: &str, slug: &str, category: &str) -> PhotoDocument {
        PhotoDocument {
            id: id.to_string(),
            title: Some(format!("Photo {}", id)),
            category: Some(category.to_string()),
            slug: Some(SlugField {
                current: Some(slug.to_string()),
            }),
            image: Some(image(id)),
        }
    }

    /// Photo as stored by older studio versions: no slug, no category
    pub fn legacy(id: &str) -> PhotoDocument {
        PhotoDocument {
            id: id.to_string(),
            title: Some(format!("Legacy {}", id)),
            category: None,
            slug: None,
            image: Some(image(id)),
        }
    }

    /// Image field pointing at a 1200x800 jpg named after `id`
    pub fn image(id: &str) -> ImageField {
        ImageField {
            asset: Some(AssetReference {
                id: Some(format!("image-{}-1200x800-jpg", id)),
                url: None,
            }),
        }
    }
}

/// Video fixtures
pub mod videos {
    use super::*;

    /// Video eligible for the homepage
    pub fn featured(id: &str, vimeo_id: &str) -> VideoDocument {
        VideoDocument {
            id: id.to_string(),
            title: Some(format!("Video {}", id)),
            vimeo_id: Some(vimeo_id.to_string()),
            slug: Some(SlugField {
                current: Some(format!("video-{}", id)),
            }),
            exclude_from_homepage: Some(false),
        }
    }

    /// Video excluded from the homepage
    pub fn excluded(id: &str) -> VideoDocument {
        VideoDocument {
            exclude_from_homepage: Some(true),
            ..featured(id, "0")
        }
    }
}

/// Wrap a result in the query endpoint envelope
pub fn envelope(result: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "ms": 3, "query": "*", "result": result })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_fixture() {
        let p = photos::photo("a", "a1", "Landscape");
        assert_eq!(p.slug.unwrap().slug().unwrap().as_str(), "a1");
    }

    #[test]
    fn test_envelope_shape() {
        let body = envelope(serde_json::json!([1, 2]));
        assert_eq!(body["result"][1], 2);
    }
}

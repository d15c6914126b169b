//! Image URL building
//!
//! Turns asset references into CDN URLs with width, height and format
//! transforms. Asset ids follow the `image-<hash>-<width>x<height>-<ext>`
//! convention.

use crate::client::SanityConfig;
use crate::types::{AssetReference, ImageField};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// CDN host serving image assets
pub const IMAGE_CDN: &str = "https://cdn.sanity.io/images";

/// Output formats the image pipeline can transcode to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG
    Jpg,
    /// PNG
    Png,
    /// WebP
    Webp,
}

impl ImageFormat {
    /// Value of the `fm` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }
}

/// Parsed image asset id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Content hash
    pub hash: String,
    /// Original width in pixels
    pub width: u32,
    /// Original height in pixels
    pub height: u32,
    /// Original file extension
    pub extension: String,
}

impl ImageAsset {
    /// Parse an `image-<hash>-<w>x<h>-<ext>` asset id
    pub fn parse(id: &str) -> Result<Self> {
        let invalid = || Error::InvalidAsset(id.to_string());

        let rest = id.strip_prefix("image-").ok_or_else(invalid)?;
        let mut parts = rest.rsplitn(3, '-');
        let extension = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let dims = parts.next().ok_or_else(invalid)?;
        let hash = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;

        let (w, h) = dims.split_once('x').ok_or_else(invalid)?;
        let width = w.parse().map_err(|_| invalid())?;
        let height = h.parse().map_err(|_| invalid())?;

        Ok(Self {
            hash: hash.to_string(),
            width,
            height,
            extension: extension.to_string(),
        })
    }

    /// Aspect ratio of the original upload
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Builds transform URLs for one project/dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    /// Create a builder for a project and dataset
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    /// Create a builder matching a client configuration
    pub fn from_config(config: &SanityConfig) -> Self {
        Self::new(config.project_id.clone(), config.dataset.clone())
    }

    /// Start a URL for an image field
    pub fn image(&self, field: &ImageField) -> Result<ImageUrl> {
        let asset = field
            .asset
            .as_ref()
            .ok_or_else(|| Error::InvalidAsset("image has no asset".to_string()))?;
        self.asset(asset)
    }

    /// Start a URL for an asset reference
    pub fn asset(&self, asset: &AssetReference) -> Result<ImageUrl> {
        let base = match (&asset.id, &asset.url) {
            (Some(id), _) => {
                let parsed = ImageAsset::parse(id)?;
                format!(
                    "{}/{}/{}/{}-{}x{}.{}",
                    IMAGE_CDN,
                    self.project_id,
                    self.dataset,
                    parsed.hash,
                    parsed.width,
                    parsed.height,
                    parsed.extension
                )
            }
            (None, Some(url)) => url.clone(),
            (None, None) => {
                return Err(Error::InvalidAsset("asset has neither id nor url".to_string()))
            }
        };

        Ok(ImageUrl {
            base,
            width: None,
            height: None,
            format: None,
        })
    }
}

/// Transform options for a single image URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl {
    base: String,
    width: Option<u32>,
    height: Option<u32>,
    format: Option<ImageFormat>,
}

impl ImageUrl {
    /// Target width
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Target height
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Output format
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Render the final URL
    pub fn url(&self) -> String {
        let mut params = Vec::new();
        if let Some(w) = self.width {
            params.push(format!("w={}", w));
        }
        if let Some(h) = self.height {
            params.push(format!("h={}", h));
        }
        if let Some(fm) = self.format {
            params.push(format!("fm={}", fm.as_str()));
        }

        if params.is_empty() {
            return self.base.clone();
        }
        let separator = if self.base.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.base, separator, params.join("&"))
    }
}

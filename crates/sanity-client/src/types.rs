//! Core content types shared by document records

use serde::{Deserialize, Serialize};
use std::fmt;

/// URL-safe identifier used for deep links
///
/// A slug is a single path segment: non-empty, no slashes, no whitespace,
/// no query or fragment delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and wrap a slug
    pub fn new(value: impl Into<String>) -> crate::Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(crate::Error::InvalidInput("slug is empty".to_string()));
        }
        if value
            .chars()
            .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace())
        {
            return Err(crate::Error::InvalidInput(format!(
                "slug is not a single path segment: {:?}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Borrow the slug text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Slug::new(value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

/// Slug object as stored on documents (`slug.current`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugField {
    /// Current slug value, absent on legacy records
    #[serde(default)]
    pub current: Option<String>,
}

impl SlugField {
    /// Validated slug, `None` when missing or malformed
    pub fn slug(&self) -> Option<Slug> {
        self.current.as_deref().and_then(|s| Slug::new(s).ok())
    }
}

/// Asset pointer, either a raw `_ref` or a dereferenced asset document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetReference {
    /// Asset document id (`image-<hash>-<w>x<h>-<ext>`)
    #[serde(rename = "_id", alias = "_ref", default)]
    pub id: Option<String>,
    /// Direct CDN URL when the asset was dereferenced
    #[serde(default)]
    pub url: Option<String>,
}

/// Image field as stored on documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageField {
    /// Underlying asset
    #[serde(default)]
    pub asset: Option<AssetReference>,
}

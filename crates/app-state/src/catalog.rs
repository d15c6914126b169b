//! Media items and category grouping
//!
//! A [`GroupedCatalog`] is a snapshot: it is built wholesale from a fetched
//! list and replaced, never edited, when new content arrives.

use sanity_client::documents::{PhotoDocument, VideoDocument};
use sanity_client::{ImageField, Slug};
use serde::{Deserialize, Serialize};

/// Group used for items whose category is missing or blank
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Displayable asset behind a media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaRef {
    /// Image asset, resolved through the image URL builder
    Image(ImageField),
    /// Hosted video
    Video {
        /// Hosting provider id
        vimeo_id: String,
    },
    /// Record without a usable asset
    Missing,
}

/// Immutable media record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Stable document id
    pub id: String,
    /// Display title
    pub title: String,
    /// Grouping label as stored; see [`MediaItem::group_key`]
    pub category: Option<String>,
    /// Deep-link slug, absent on legacy records
    pub slug: Option<Slug>,
    /// Underlying asset
    pub media_ref: MediaRef,
}

impl MediaItem {
    /// Group this item belongs to
    pub fn group_key(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => UNCATEGORIZED,
        }
    }

    /// Whether the item can be addressed by URL
    pub fn is_deep_linkable(&self) -> bool {
        self.slug.is_some()
    }
}

impl From<PhotoDocument> for MediaItem {
    fn from(doc: PhotoDocument) -> Self {
        let slug = doc.slug.as_ref().and_then(|s| s.slug());
        let media_ref = match doc.image {
            Some(image) if image.asset.is_some() => MediaRef::Image(image),
            _ => MediaRef::Missing,
        };
        Self {
            id: doc.id,
            title: doc.title.unwrap_or_default(),
            category: doc.category,
            slug,
            media_ref,
        }
    }
}

impl From<VideoDocument> for MediaItem {
    fn from(doc: VideoDocument) -> Self {
        let slug = doc.slug.as_ref().and_then(|s| s.slug());
        let media_ref = match doc.vimeo_id {
            Some(vimeo_id) if !vimeo_id.is_empty() => MediaRef::Video { vimeo_id },
            _ => MediaRef::Missing,
        };
        Self {
            id: doc.id,
            title: doc.title.unwrap_or_default(),
            category: None,
            slug,
            media_ref,
        }
    }
}

/// Items partitioned by category, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedCatalog {
    groups: Vec<(String, Vec<MediaItem>)>,
}

/// Partition `items` by [`MediaItem::group_key`]
///
/// Categories appear in the order they are first seen; items keep their
/// source order within a category. Nothing is sorted or de-duplicated.
pub fn group_items(items: Vec<MediaItem>) -> GroupedCatalog {
    let mut groups: Vec<(String, Vec<MediaItem>)> = Vec::new();
    for item in items {
        let key = item.group_key().to_string();
        match groups.iter_mut().find(|(name, _)| *name == key) {
            Some((_, bucket)) => bucket.push(item),
            None => groups.push((key, vec![item])),
        }
    }
    GroupedCatalog { groups }
}

impl GroupedCatalog {
    /// Build a snapshot from a flat list
    pub fn from_items(items: Vec<MediaItem>) -> Self {
        group_items(items)
    }

    /// Groups in iteration order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[MediaItem])> {
        self.groups.iter().map(|(n, items)| (n.as_str(), items.as_slice()))
    }

    /// Group names in iteration order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(n, _)| n.as_str())
    }

    /// Items of one group
    pub fn group(&self, name: &str) -> Option<&[MediaItem]> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, items)| items.as_slice())
    }

    /// Number of items in a group, 0 when the group does not exist
    pub fn group_len(&self, name: &str) -> usize {
        self.group(name).map_or(0, <[MediaItem]>::len)
    }

    /// Item at `index` of `group`
    pub fn item(&self, group: &str, index: usize) -> Option<&MediaItem> {
        self.group(group).and_then(|items| items.get(index))
    }

    /// Locate a slug across all groups
    pub fn find_slug(&self, slug: &str) -> Option<(&str, usize)> {
        self.groups.iter().find_map(|(name, items)| {
            items
                .iter()
                .position(|item| item.slug.as_ref().is_some_and(|s| s.as_str() == slug))
                .map(|idx| (name.as_str(), idx))
        })
    }

    /// Total number of items
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, items)| items.len()).sum()
    }

    /// Whether the catalog holds no items
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All items, group by group
    pub fn flatten(&self) -> impl Iterator<Item = &MediaItem> {
        self.groups.iter().flat_map(|(_, items)| items.iter())
    }
}

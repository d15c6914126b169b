//! Modal viewer presentation
//!
//! [`present`] turns the navigator state and the catalog into a
//! [`ModalView`]: the item to show, its full-size asset address, animation
//! flags, position in the group and page metadata. It performs no fetching
//! and owns no state; the affordances it exposes map back to navigator
//! operations through [`GalleryCommand`](crate::keyboard::GalleryCommand).

use crate::gallery::GalleryNavigator;
use crate::navigation::{Route, Section};
use crate::tokens::thumbnail;
use app_state::{GroupedCatalog, MediaItem, MediaRef};
use sanity_client::vimeo::{self, PlayerOptions};
use sanity_client::{ImageFormat, ImageUrlBuilder, SanityConfig};
use serde::{Deserialize, Serialize};

// =============================================================================
// Asset Resolution
// =============================================================================

/// Turns asset references into displayable addresses
pub trait AssetResolver {
    /// Address of the full-size asset
    fn full_size(&self, media: &MediaRef) -> Option<String>;

    /// Address of the grid thumbnail
    fn thumbnail(&self, media: &MediaRef) -> Option<String>;
}

/// Resolves images through the image CDN and videos through the player host
#[derive(Debug, Clone)]
pub struct SanityAssetResolver {
    images: ImageUrlBuilder,
}

impl SanityAssetResolver {
    /// Create a resolver for an image builder
    pub fn new(images: ImageUrlBuilder) -> Self {
        Self { images }
    }

    /// Create a resolver matching a client configuration
    pub fn from_config(config: &SanityConfig) -> Self {
        Self::new(ImageUrlBuilder::from_config(config))
    }
}

impl AssetResolver for SanityAssetResolver {
    fn full_size(&self, media: &MediaRef) -> Option<String> {
        match media {
            MediaRef::Image(field) => match self.images.image(field) {
                Ok(url) => Some(url.format(ImageFormat::Webp).url()),
                Err(e) => {
                    tracing::warn!("Unusable image asset: {}", e);
                    None
                }
            },
            MediaRef::Video { vimeo_id } => Some(vimeo::player_url(vimeo_id, PlayerOptions::modal())),
            MediaRef::Missing => None,
        }
    }

    fn thumbnail(&self, media: &MediaRef) -> Option<String> {
        match media {
            MediaRef::Image(field) => self.images.image(field).ok().map(|url| {
                url.width(thumbnail::WIDTH)
                    .height(thumbnail::HEIGHT)
                    .format(ImageFormat::Webp)
                    .url()
            }),
            MediaRef::Video { vimeo_id } => Some(vimeo::thumbnail_url(vimeo_id)),
            MediaRef::Missing => None,
        }
    }
}

// =============================================================================
// Page Metadata
// =============================================================================

/// Who the site belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteIdentity {
    /// Public origin, without trailing slash
    pub site_url: String,
    /// Brand shown in titles
    pub brand: String,
    /// Owner's name
    pub owner: String,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            site_url: "https://redmalanga.com".to_string(),
            brand: "Red Malanga".to_string(),
            owner: "Aaron ALAYO".to_string(),
        }
    }
}

impl SiteIdentity {
    /// Absolute address of a path
    pub fn canonical(&self, path: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), path)
    }
}

/// Document title, description and canonical address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Document title
    pub title: String,
    /// Meta description
    pub description: String,
    /// Canonical address
    pub canonical: String,
}

impl PageMeta {
    /// Metadata for an open item
    ///
    /// Items without a slug fall back to the section's canonical address.
    pub fn for_item(item: &MediaItem, section: Section, site: &SiteIdentity) -> Self {
        let path = match &item.slug {
            Some(slug) => section.item_path(slug.as_str()),
            None => section.root_path().to_string(),
        };
        Self {
            title: format!("{} - {} by {}", item.title, section.noun(), site.brand),
            description: format!(
                "{} the {} titled \"{}\" from the creative portfolio of {}.",
                section.verb(),
                section.noun().to_lowercase(),
                item.title,
                site.brand
            ),
            canonical: site.canonical(&path),
        }
    }

    /// Metadata for a page without an open item
    pub fn for_route(route: &Route, site: &SiteIdentity) -> Self {
        let (title, description) = match route {
            Route::Home => (
                format!("{} - {} - Creative Portfolio", site.brand, site.owner),
                "Welcome to the creative portfolio. Explore a curated collection of professional work in photography, video production, and software development.".to_string(),
            ),
            Route::Photos { .. } => (
                format!("Photography Portfolio - {} - {}", site.brand, site.owner),
                "Explore a collection of high-quality photographs covering various subjects. View my complete photography portfolio.".to_string(),
            ),
            Route::Videos { .. } => (
                format!("Video & Editorial Work - {} - {}", site.brand, site.owner),
                "A collection of professional video and editorial work. View my portfolio of creative video projects.".to_string(),
            ),
            Route::Developer => (
                format!("Developer Work - {}", site.brand),
                "Software projects and experiments.".to_string(),
            ),
            Route::About => (
                format!("About Me - {}", site.brand),
                "Learn more about my background, skills, and creative journey in development, video production, and photography.".to_string(),
            ),
            Route::Contact => (
                format!("Contact Me - {}", site.brand),
                "Get in touch for collaborations, questions, or project inquiries.".to_string(),
            ),
            Route::NotFound => (format!("Page Not Found - {}", site.brand), String::new()),
        };

        let path = match route.gallery() {
            Some((section, _)) => section.root_path().to_string(),
            None => route.to_path(),
        };
        Self {
            title,
            description,
            canonical: site.canonical(&path),
        }
    }
}

/// Metadata for a gallery section page
pub fn section_meta(section: Section, site: &SiteIdentity) -> PageMeta {
    let route = match section {
        Section::Photos => Route::Photos { slug: None },
        Section::Videos => Route::Videos { slug: None },
    };
    PageMeta::for_route(&route, site)
}

// =============================================================================
// View Model
// =============================================================================

/// Everything needed to render the open viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalView {
    /// Item shown
    pub item: MediaItem,
    /// Full-size asset address, `None` when the item has no usable asset
    pub asset_url: Option<String>,
    /// Enter animation has started
    pub animating_in: bool,
    /// Exit animation is playing
    pub closing: bool,
    /// Zero-based index within the group
    pub index: usize,
    /// Number of items in the group
    pub group_len: usize,
    /// Whether previous/next affordances are shown
    pub can_navigate: bool,
    /// Page metadata while the viewer is open
    pub meta: PageMeta,
}

impl ModalView {
    /// One-based position label, e.g. `2 / 5`
    pub fn position(&self) -> String {
        format!("{} / {}", self.index + 1, self.group_len)
    }
}

/// Build the view model for the open viewer, `None` when nothing is shown
pub fn present<R: AssetResolver + ?Sized>(
    nav: &GalleryNavigator,
    catalog: &GroupedCatalog,
    section: Section,
    resolver: &R,
    site: &SiteIdentity,
) -> Option<ModalView> {
    let open = nav.open_item_state()?;
    let item = catalog.item(&open.group, open.index)?;
    let group_len = catalog.group_len(&open.group);

    Some(ModalView {
        item: item.clone(),
        asset_url: resolver.full_size(&item.media_ref),
        animating_in: open.animating_in,
        closing: nav.is_closing(),
        index: open.index,
        group_len,
        can_navigate: group_len > 1,
        meta: PageMeta::for_item(item, section, site),
    })
}

//! Loaders for the non-gallery pages
//!
//! Every loader degrades to an empty page on failure; the failure is logged
//! and never reaches the visitor.

use app_ui::Section;
use sanity_client::documents::{pick_featured, DeveloperProject};
use sanity_client::vimeo::{self, PlayerOptions};
use sanity_client::{ImageFormat, ImageUrlBuilder, SanityClient};
use serde::{Deserialize, Serialize};

/// Video shown in the landing page background
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedVideo {
    /// Display title
    pub title: String,
    /// Muted looping player address
    pub background_url: String,
    /// Gallery address of the video, when it has a slug
    pub link: Option<String>,
}

/// About page content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutContent {
    /// Biography as plain paragraphs
    pub bio: String,
    /// Portrait address
    pub portrait_url: Option<String>,
}

/// Pick the landing page video
///
/// `roll` selects among eligible videos; callers pass a random number.
pub async fn load_featured_video(client: &SanityClient, roll: u64) -> Option<FeaturedVideo> {
    let videos = match client.featured_videos().await {
        Ok(videos) => videos,
        Err(e) => {
            tracing::warn!("Failed to fetch featured videos: {}", e);
            return None;
        }
    };

    let video = pick_featured(&videos, roll)?;
    let vimeo_id = video.vimeo_id.as_deref()?;
    Some(FeaturedVideo {
        title: video.title.clone().unwrap_or_default(),
        background_url: vimeo::player_url(vimeo_id, PlayerOptions::background()),
        link: video
            .slug
            .as_ref()
            .and_then(|s| s.slug())
            .map(|slug| Section::Videos.item_path(slug.as_str())),
    })
}

/// Developer projects, newest first
pub async fn load_developer_projects(client: &SanityClient) -> Vec<DeveloperProject> {
    client.developer_projects().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch developer projects: {}", e);
        Vec::new()
    })
}

/// About page biography and portrait
pub async fn load_about(client: &SanityClient) -> AboutContent {
    let page = match client.about_page().await {
        Ok(Some(page)) => page,
        Ok(None) => return AboutContent::default(),
        Err(e) => {
            tracing::warn!("Failed to fetch about page: {}", e);
            return AboutContent::default();
        }
    };

    let images = ImageUrlBuilder::from_config(client.config());
    let portrait_url = page
        .image
        .as_ref()
        .and_then(|image| images.image(image).ok())
        .map(|url| url.format(ImageFormat::Webp).url());

    AboutContent {
        bio: page.plain_bio(),
        portrait_url,
    }
}

//! Document records and the queries that load them
//!
//! Each document type the site reads (photo, video, developer project, about
//! page) has a record type mirroring the projection its query returns, plus a
//! convenience method on [`SanityClient`].

use crate::client::{ContentError, ContentRequest, SanityClient};
use crate::types::{ImageField, SlugField};
use serde::{Deserialize, Serialize};

/// All photos with their slug, category and dereferenced image asset
pub const PHOTOS_QUERY: &str = r#"*[_type == "photo"]{
  _id,
  title,
  slug,
  category,
  image { asset -> { _id, url } }
}"#;

/// One page of deep-linkable videos, newest first (`$end` is exclusive)
pub const VIDEOS_PAGE_QUERY: &str = r#"*[_type == "video" && defined(slug.current)] | order(_createdAt desc) [$start...$end] {
  _id, title, vimeoId, slug
}"#;

/// Videos allowed on the homepage background
pub const FEATURED_VIDEOS_QUERY: &str =
    r#"*[_type == "video" && excludeFromHomepage != true]{ _id, title, vimeoId, slug }"#;

/// Developer projects, newest first
pub const DEVELOPER_PROJECTS_QUERY: &str = r#"*[_type == "developer"] | order(_createdAt desc) {
  _id,
  title,
  description,
  githubUrl
}"#;

/// The singleton about page
pub const ABOUT_QUERY: &str = r#"*[_type == "about"][0]{ bio, image { asset -> { _id, url } } }"#;

/// Photo document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoDocument {
    /// Document id
    #[serde(rename = "_id")]
    pub id: String,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Grouping label
    #[serde(default)]
    pub category: Option<String>,
    /// Deep-link slug
    #[serde(default)]
    pub slug: Option<SlugField>,
    /// Image asset
    #[serde(default)]
    pub image: Option<ImageField>,
}

/// Video document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDocument {
    /// Document id
    #[serde(rename = "_id")]
    pub id: String,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Hosted video id
    #[serde(default)]
    pub vimeo_id: Option<String>,
    /// Deep-link slug
    #[serde(default)]
    pub slug: Option<SlugField>,
    /// Keep this video off the homepage background
    #[serde(default)]
    pub exclude_from_homepage: Option<bool>,
}

impl VideoDocument {
    /// Whether the homepage may feature this video
    pub fn is_featurable(&self) -> bool {
        self.exclude_from_homepage != Some(true) && self.vimeo_id.is_some()
    }
}

/// Developer project document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperProject {
    /// Document id
    #[serde(rename = "_id")]
    pub id: String,
    /// Project title
    pub title: String,
    /// Short description
    #[serde(default)]
    pub description: String,
    /// Repository link
    #[serde(default)]
    pub github_url: Option<String>,
}

/// Inline run of text inside a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Text content
    #[serde(default)]
    pub text: String,
    /// Decorator and annotation keys
    #[serde(default)]
    pub marks: Vec<String>,
}

/// Rich text block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block type, `"block"` for text
    #[serde(rename = "_type")]
    pub kind: String,
    /// Paragraph style (normal, h2, h3)
    #[serde(default)]
    pub style: Option<String>,
    /// Inline children
    #[serde(default)]
    pub children: Vec<Span>,
}

impl Block {
    /// Concatenated text of all spans
    pub fn text(&self) -> String {
        self.children.iter().map(|s| s.text.as_str()).collect()
    }
}

/// About page document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutPage {
    /// Biography blocks
    #[serde(default)]
    pub bio: Vec<Block>,
    /// Portrait image
    #[serde(default)]
    pub image: Option<ImageField>,
}

impl AboutPage {
    /// Text-only biography, paragraphs separated by blank lines
    pub fn plain_bio(&self) -> String {
        self.bio
            .iter()
            .filter(|b| b.kind == "block")
            .map(Block::text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl SanityClient {
    /// Load every photo
    pub async fn photos(&self) -> Result<Vec<PhotoDocument>, ContentError> {
        let request = ContentRequest::groq(PHOTOS_QUERY);
        Ok(self.fetch_with_retry(request).await?.data)
    }

    /// Load one page of videos starting at `start`
    pub async fn videos_page(
        &self,
        start: usize,
        len: usize,
    ) -> Result<Vec<VideoDocument>, ContentError> {
        let request = ContentRequest::groq(VIDEOS_PAGE_QUERY)
            .param("start", start)
            .param("end", start + len);
        Ok(self.fetch_with_retry(request).await?.data)
    }

    /// Load homepage background candidates
    pub async fn featured_videos(&self) -> Result<Vec<VideoDocument>, ContentError> {
        let request = ContentRequest::groq(FEATURED_VIDEOS_QUERY);
        Ok(self.fetch_with_retry(request).await?.data)
    }

    /// Load developer projects
    pub async fn developer_projects(&self) -> Result<Vec<DeveloperProject>, ContentError> {
        let request = ContentRequest::groq(DEVELOPER_PROJECTS_QUERY);
        Ok(self.fetch_with_retry(request).await?.data)
    }

    /// Load the about page, `None` when it was never published
    pub async fn about_page(&self) -> Result<Option<AboutPage>, ContentError> {
        let request = ContentRequest::groq(ABOUT_QUERY);
        Ok(self.fetch_with_retry(request).await?.data)
    }
}

/// Pick a homepage video from `candidates` using a caller-supplied roll
///
/// Excluded videos and videos without a hosted id are skipped. The roll is
/// reduced modulo the number of eligible videos.
pub fn pick_featured(candidates: &[VideoDocument], roll: u64) -> Option<&VideoDocument> {
    let eligible: Vec<&VideoDocument> = candidates.iter().filter(|v| v.is_featurable()).collect();
    if eligible.is_empty() {
        return None;
    }
    let idx = (roll % eligible.len() as u64) as usize;
    Some(eligible[idx])
}

//! Routing and browser history
//!
//! This module provides:
//! - Route definitions with deep linking for the gallery sections
//! - A pattern router that turns paths back into routes
//! - The [`History`] abstraction over the host's push/replace API
//! - An in-memory history used by tests and non-browser hosts
//! - Removal of campaign tracking parameters from the address

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// =============================================================================
// Route Parameters
// =============================================================================

/// Parameters for a route
pub type RouteParams = HashMap<String, String>;

// =============================================================================
// Sections
// =============================================================================

/// Gallery section that owns a modal viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Photography gallery
    Photos,
    /// Video gallery
    Videos,
}

impl Section {
    /// Path of the section's listing
    pub fn root_path(&self) -> &'static str {
        match self {
            Section::Photos => "/photos",
            Section::Videos => "/videos",
        }
    }

    /// Path of one item of the section
    pub fn item_path(&self, slug: &str) -> String {
        format!("{}/{}", self.root_path(), urlencoding::encode(slug))
    }

    /// Display noun for a single item
    pub fn noun(&self) -> &'static str {
        match self {
            Section::Photos => "Photo",
            Section::Videos => "Video",
        }
    }

    /// Verb used when describing an item
    pub fn verb(&self) -> &'static str {
        match self {
            Section::Photos => "View",
            Section::Videos => "Watch",
        }
    }
}

// =============================================================================
// Route Definitions
// =============================================================================

/// All possible routes in the site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "route", content = "params")]
pub enum Route {
    /// Landing page with the featured video
    #[default]
    Home,
    /// Video gallery, optionally with one video open
    Videos {
        /// Deep-linked video
        #[serde(skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
    },
    /// Photo gallery, optionally with one photo open
    Photos {
        /// Deep-linked photo
        #[serde(skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
    },
    /// Developer projects
    Developer,
    /// About page
    About,
    /// Contact form
    Contact,
    /// Anything else
    NotFound,
}

impl Route {
    /// Get the URL path for this route
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Videos { slug: None } => Section::Videos.root_path().to_string(),
            Route::Videos { slug: Some(slug) } => Section::Videos.item_path(slug),
            Route::Photos { slug: None } => Section::Photos.root_path().to_string(),
            Route::Photos { slug: Some(slug) } => Section::Photos.item_path(slug),
            Route::Developer => "/developer".to_string(),
            Route::About => "/about".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Navigation label
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Videos { .. } => "Videos",
            Route::Photos { .. } => "Photos",
            Route::Developer => "Developer",
            Route::About => "About",
            Route::Contact => "Contact",
            Route::NotFound => "Not Found",
        }
    }

    /// Gallery section and deep-linked slug, if this is a gallery route
    pub fn gallery(&self) -> Option<(Section, Option<&str>)> {
        match self {
            Route::Videos { slug } => Some((Section::Videos, slug.as_deref())),
            Route::Photos { slug } => Some((Section::Photos, slug.as_deref())),
            _ => None,
        }
    }
}

// =============================================================================
// Router
// =============================================================================

/// Route pattern for matching
struct RoutePattern {
    /// Pattern segments
    segments: Vec<PatternSegment>,
    /// Route builder
    builder: fn(RouteParams) -> Option<Route>,
}

/// Segment type in a pattern
#[derive(Debug, Clone)]
enum PatternSegment {
    /// Literal segment
    Literal(String),
    /// Parameter segment
    Param(String),
}

/// URL Router for parsing paths to routes
pub struct Router {
    /// Route patterns
    patterns: Vec<RoutePattern>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("patterns", &self.patterns.len())
            .finish()
    }
}

impl Router {
    /// Create a new router with all routes
    pub fn new() -> Self {
        let mut router = Self {
            patterns: Vec::new(),
        };

        router.add_route("/", |_| Some(Route::Home));
        router.add_route("/videos", |_| Some(Route::Videos { slug: None }));
        router.add_route("/videos/:slug", |params| {
            Some(Route::Videos {
                slug: Some(params.get("slug")?.clone()),
            })
        });
        router.add_route("/photos", |_| Some(Route::Photos { slug: None }));
        router.add_route("/photos/:slug", |params| {
            Some(Route::Photos {
                slug: Some(params.get("slug")?.clone()),
            })
        });
        router.add_route("/developer", |_| Some(Route::Developer));
        router.add_route("/about", |_| Some(Route::About));
        router.add_route("/contact", |_| Some(Route::Contact));

        router
    }

    /// Add a route pattern
    fn add_route(&mut self, pattern: &str, builder: fn(RouteParams) -> Option<Route>) {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(name) = s.strip_prefix(':') {
                    PatternSegment::Param(name.to_string())
                } else {
                    PatternSegment::Literal(s.to_string())
                }
            })
            .collect();

        self.patterns.push(RoutePattern { segments, builder });
    }

    /// Match a path to a route
    ///
    /// Query strings and fragments are ignored; trailing slashes are not
    /// significant.
    pub fn match_path(&self, path: &str) -> Route {
        let pathname = path.split(['?', '#']).next().unwrap_or_default();
        let path_segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();

        for pattern in &self.patterns {
            if let Some(params) = Self::match_pattern(&pattern.segments, &path_segments) {
                if let Some(route) = (pattern.builder)(params) {
                    return route;
                }
            }
        }

        Route::NotFound
    }

    /// Match a pattern against path segments
    fn match_pattern(pattern: &[PatternSegment], path: &[&str]) -> Option<RouteParams> {
        if pattern.len() != path.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, actual) in pattern.iter().zip(path.iter()) {
            match segment {
                PatternSegment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                PatternSegment::Param(name) => {
                    params.insert(name.clone(), urlencoding::decode(actual).ok()?.into_owned());
                }
            }
        }

        Some(params)
    }
}

// =============================================================================
// History
// =============================================================================

/// Host history API
///
/// `push` adds an entry so back returns to the previous address; `replace`
/// overwrites the current entry. Neither notifies the application; location
/// change notifications come from the host (back/forward, deep link load).
#[cfg_attr(test, mockall::automock)]
pub trait History {
    /// Current address, path plus optional query string
    fn location(&self) -> String;

    /// Add a history entry
    fn push(&mut self, path: &str);

    /// Overwrite the current history entry
    fn replace(&mut self, path: &str);
}

/// One entry of [`MemoryHistory`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Address of the entry
    pub path: String,
    /// Unique key for this entry
    pub key: String,
}

impl HistoryEntry {
    /// Create a new entry
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Rejected [`MemoryHistory`] contents
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    /// No entries at all
    #[error("history has no entries")]
    Empty,

    /// Cursor points past the last entry
    #[error("cursor {cursor} out of range for {len} entries")]
    CursorOutOfRange {
        /// Stored cursor
        cursor: usize,
        /// Number of entries
        len: usize,
    },
}

/// In-memory history with back/forward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HistorySnapshot")]
pub struct MemoryHistory {
    /// Entries (oldest first), never empty
    entries: Vec<HistoryEntry>,
    /// Index of the current entry
    cursor: usize,
}

/// Unchecked serialized form of [`MemoryHistory`]
#[derive(Deserialize)]
struct HistorySnapshot {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl TryFrom<HistorySnapshot> for MemoryHistory {
    type Error = HistoryError;

    fn try_from(snapshot: HistorySnapshot) -> Result<Self, HistoryError> {
        let len = snapshot.entries.len();
        if len == 0 {
            return Err(HistoryError::Empty);
        }
        if snapshot.cursor >= len {
            return Err(HistoryError::CursorOutOfRange {
                cursor: snapshot.cursor,
                len,
            });
        }
        Ok(Self {
            entries: snapshot.entries,
            cursor: snapshot.cursor,
        })
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl MemoryHistory {
    /// Create a history whose only entry is `initial`
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry::new(initial)],
            cursor: 0,
        }
    }

    /// Step back one entry, returning the new location
    pub fn back(&mut self) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].path.clone())
    }

    /// Step forward one entry, returning the new location
    pub fn forward(&mut self) -> Option<String> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].path.clone())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a history has at least one entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current entry
    pub fn current_entry(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    /// All entries
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        self.entries[self.cursor].path.clone()
    }

    fn push(&mut self, path: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry::new(path));
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, path: &str) {
        self.entries[self.cursor] = HistoryEntry::new(path);
    }
}

// =============================================================================
// Tracking Parameters
// =============================================================================

/// Prefix of campaign tracking query parameters
pub const TRACKING_PARAM_PREFIX: &str = "utm_";

/// Remove tracking parameters from an address
///
/// Returns `None` when the address carries none.
pub fn strip_tracking_params(location: &str) -> Option<String> {
    let (rest, fragment) = match location.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (location, None),
    };
    let (path, query) = rest.split_once('?')?;

    let pairs: Vec<&str> = query.split('&').filter(|p| !p.is_empty()).collect();
    let kept: Vec<&str> = pairs
        .iter()
        .copied()
        .filter(|pair| !pair.starts_with(TRACKING_PARAM_PREFIX))
        .collect();
    if kept.len() == pairs.len() {
        return None;
    }

    let mut cleaned = path.to_string();
    if !kept.is_empty() {
        cleaned.push('?');
        cleaned.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        cleaned.push('#');
        cleaned.push_str(fragment);
    }
    Some(cleaned)
}

/// Replace the current address without its tracking parameters
///
/// Returns true when the address was rewritten.
pub fn scrub_tracking_params<H: History + ?Sized>(history: &mut H) -> bool {
    match strip_tracking_params(&history.location()) {
        Some(cleaned) => {
            tracing::debug!(location = %cleaned, "removing tracking parameters");
            history.replace(&cleaned);
            true
        }
        None => false,
    }
}

// =============================================================================
// Tests
// =============================================================================

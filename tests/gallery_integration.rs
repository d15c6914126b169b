//! Gallery Integration Tests
//!
//! End-to-end tests of the gallery page: loading, grouping, the viewer state
//! machine, address synchronization and keyboard bindings working together.

use app_state::{FetchError, MediaFetcher, MediaItem, MediaRef, PageWindow, QueryState};
use app_ui::{
    GalleryCommand, GalleryState, History, Key, KeyboardHost, ListenerId, MemoryHistory, Section,
    SyncAction,
};
use async_trait::async_trait;
use portfolio::{GalleryPage, SiteConfig};
use sanity_client::Slug;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// =============================================================================
// Fakes
// =============================================================================

type Page = Result<Vec<MediaItem>, FetchError>;

/// Returns scripted responses in order and records requested windows
#[derive(Clone, Default)]
struct ScriptedFetcher {
    responses: Arc<Mutex<VecDeque<Page>>>,
    windows: Arc<Mutex<Vec<Option<PageWindow>>>>,
}

impl ScriptedFetcher {
    fn new(responses: Vec<Page>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            windows: Arc::default(),
        }
    }

    fn windows(&self) -> Vec<Option<PageWindow>> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaFetcher for ScriptedFetcher {
    async fn fetch(&self, window: Option<PageWindow>) -> Page {
        self.windows.lock().unwrap().push(window);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Keyboard registry that tracks live listeners
#[derive(Default)]
struct RecordingKeyboard {
    next_id: u64,
    live: HashSet<ListenerId>,
    added: usize,
}

impl KeyboardHost for RecordingKeyboard {
    fn add_listener(&mut self) -> ListenerId {
        self.next_id += 1;
        self.added += 1;
        let id = ListenerId(self.next_id);
        self.live.insert(id);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        assert!(self.live.remove(&id), "listener {:?} removed twice", id);
    }
}

/// Memory history that counts writes
#[derive(Default)]
struct CountingHistory {
    inner: MemoryHistory,
    pushes: usize,
    replaces: usize,
}

impl CountingHistory {
    fn at(location: &str) -> Self {
        Self {
            inner: MemoryHistory::new(location),
            ..Default::default()
        }
    }

    fn writes(&self) -> usize {
        self.pushes + self.replaces
    }
}

impl History for CountingHistory {
    fn location(&self) -> String {
        self.inner.location()
    }

    fn push(&mut self, path: &str) {
        self.pushes += 1;
        self.inner.push(path);
    }

    fn replace(&mut self, path: &str) {
        self.replaces += 1;
        self.inner.replace(path);
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn photo(id: &str, category: &str, slug: Option<&str>) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        title: id.to_uppercase(),
        category: Some(category.to_string()),
        slug: slug.map(|s| Slug::new(s).unwrap()),
        media_ref: MediaRef::Missing,
    }
}

fn video(id: &str) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        title: id.to_uppercase(),
        category: None,
        slug: Some(Slug::new(id).unwrap()),
        media_ref: MediaRef::Video {
            vimeo_id: "76979871".to_string(),
        },
    }
}

fn example_catalog() -> Vec<MediaItem> {
    vec![
        photo("a", "Landscape", Some("a1")),
        photo("b", "Landscape", Some("b2")),
        photo("c", "Portrait", Some("c3")),
    ]
}

type PhotoPage = GalleryPage<ScriptedFetcher, CountingHistory, RecordingKeyboard>;

fn photo_page(location: &str, responses: Vec<Page>) -> PhotoPage {
    GalleryPage::new(
        Section::Photos,
        ScriptedFetcher::new(responses),
        CountingHistory::at(location),
        RecordingKeyboard::default(),
        &SiteConfig::default(),
    )
}

fn open_position(page: &PhotoPage) -> Option<(String, usize)> {
    match page.navigator().state() {
        GalleryState::Open(open) => Some((open.group.clone(), open.index)),
        GalleryState::Closed => None,
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_example_scenario_end_to_end() {
    let mut page = photo_page("/photos", vec![Ok(example_catalog())]);
    assert!(page.load().await);

    page.click("Landscape", 1).unwrap();
    assert_eq!(open_position(&page), Some(("Landscape".to_string(), 1)));
    assert_eq!(page.history().location(), "/photos/b2");
    assert_eq!(page.history().inner.len(), 2);

    page.settle().await;
    assert!(page.view().unwrap().animating_in);

    assert_eq!(page.key(Key::ArrowRight), Some(GalleryCommand::Next));
    assert_eq!(open_position(&page), Some(("Landscape".to_string(), 0)));
    assert_eq!(page.history().location(), "/photos/a1");
    assert_eq!(page.history().inner.len(), 2);

    assert_eq!(page.key(Key::Escape), Some(GalleryCommand::Close));
    assert!(page.keyboard().live.is_empty());
    page.settle().await;

    assert_eq!(page.navigator().state(), &GalleryState::Closed);
    assert_eq!(page.history().location(), "/photos");
    assert_eq!(page.key(Key::ArrowLeft), None);
}

#[tokio::test(start_paused = true)]
async fn test_deep_link_opens_item_without_writing_history() {
    let mut page = photo_page("/photos/c3?utm_source=instagram", vec![Ok(example_catalog())]);
    assert_eq!(page.history().location(), "/photos/c3");
    assert_eq!(page.history().replaces, 1);

    page.load().await;
    assert_eq!(open_position(&page), Some(("Portrait".to_string(), 0)));
    assert_eq!(page.history().writes(), 1);
    assert_eq!(page.keyboard().live.len(), 1);

    page.settle().await;
    let meta = page.meta();
    assert_eq!(meta.title, "C - Photo by Red Malanga");
    assert_eq!(meta.canonical, "https://redmalanga.com/photos/c3");
}

#[tokio::test]
async fn test_address_changes_never_write_history() {
    let mut page = photo_page("/photos", vec![Ok(example_catalog())]);
    page.load().await;
    let writes = page.history().writes();

    assert!(matches!(
        page.location_changed("/photos/b2"),
        SyncAction::Opened { .. }
    ));
    assert!(matches!(
        page.location_changed("/photos/c3"),
        SyncAction::Opened { transition: None, .. }
    ));
    assert_eq!(page.location_changed("/photos/c3"), SyncAction::Unchanged);
    assert!(matches!(
        page.location_changed("/photos"),
        SyncAction::Closed { .. }
    ));

    assert_eq!(page.history().writes(), writes);
}

#[tokio::test]
async fn test_back_button_after_click_closes_viewer() {
    let mut page = photo_page("/photos", vec![Ok(example_catalog())]);
    page.load().await;
    page.click("Portrait", 0).unwrap();

    let location = page.history_mut().inner.back().unwrap();
    page.location_changed(&location);

    assert!(page.navigator().is_closing());
    assert_eq!(page.history().pushes, 1);
    assert!(page.keyboard().live.is_empty());
}

#[tokio::test]
async fn test_slugless_item_opens_ephemeral_viewer() {
    let mut page = photo_page(
        "/photos",
        vec![Ok(vec![photo("legacy", "Archive", None), photo("new", "Archive", Some("new"))])],
    );
    page.load().await;

    page.click("Archive", 0).unwrap();
    assert_eq!(page.history().writes(), 0);
    assert_eq!(page.history().location(), "/photos");

    let view = page.view().unwrap();
    assert_eq!(view.item.id, "legacy");
    assert_eq!(view.meta.canonical, "https://redmalanga.com/photos");

    assert_eq!(page.location_changed("/photos"), SyncAction::Unchanged);
    assert!(page.navigator().is_interactive());

    page.command(GalleryCommand::Next);
    assert_eq!(page.history().location(), "/photos/new");
    assert_eq!(page.history().replaces, 1);
}

#[tokio::test]
async fn test_failed_load_keeps_empty_state() {
    let mut page = photo_page(
        "/photos/a1",
        vec![
            Err(FetchError::Request("connection reset".to_string())),
            Ok(example_catalog()),
        ],
    );

    assert!(!page.load().await);
    assert_eq!(page.load_state(), QueryState::Error);
    assert!(page.catalog().is_empty());
    assert!(page.view().is_none());
    assert_eq!(page.meta().title, "Photography Portfolio - Red Malanga - Aaron ALAYO");

    assert!(page.load().await);
    assert_eq!(open_position(&page), Some(("Landscape".to_string(), 0)));
}

#[tokio::test]
async fn test_late_responses_are_discarded() {
    let mut page = photo_page("/photos", Vec::new());

    let first = page.begin_load().unwrap();
    let second = page.begin_load().unwrap();
    assert!(!page.apply_load(first, Ok(vec![photo("old", "Old", None)])));
    assert!(page.apply_load(second, Ok(example_catalog())));
    assert_eq!(page.catalog().len(), 3);

    let late = page.begin_load().unwrap();
    page.unmount();
    assert!(!page.apply_load(late, Ok(Vec::new())));
    assert_eq!(page.catalog().len(), 3);
    assert!(page.begin_load().is_none());
}

#[tokio::test]
async fn test_unmount_releases_key_listener() {
    let mut page = photo_page("/photos/a1", vec![Ok(example_catalog())]);
    page.load().await;
    assert_eq!(page.keyboard().live.len(), 1);

    page.unmount();
    assert!(page.keyboard().live.is_empty());
    assert_eq!(page.keyboard().added, 1);
    assert_eq!(page.navigator().state(), &GalleryState::Closed);
}

#[tokio::test]
async fn test_refetch_clamps_open_index() {
    let mut page = photo_page(
        "/photos",
        vec![
            Ok(example_catalog()),
            Ok(vec![photo("a", "Landscape", Some("a1"))]),
        ],
    );
    page.load().await;
    page.click("Landscape", 1).unwrap();

    page.load().await;
    assert_eq!(open_position(&page), Some(("Landscape".to_string(), 0)));
}

#[tokio::test]
async fn test_rapid_navigation_last_write_wins() {
    let items = (0..5)
        .map(|i| photo(&format!("p{}", i), "Street", Some(&format!("s{}", i))))
        .collect();
    let mut page = photo_page("/photos", vec![Ok(items)]);
    page.load().await;
    page.click("Street", 0).unwrap();

    for _ in 0..7 {
        page.key(Key::ArrowRight);
    }
    page.key(Key::ArrowLeft);

    assert_eq!(open_position(&page), Some(("Street".to_string(), 1)));
    assert_eq!(page.history().location(), "/photos/s1");
    assert_eq!(page.history().pushes, 1);
}

#[tokio::test]
async fn test_video_pages_accumulate_without_duplicates() {
    let first: Vec<MediaItem> = ["v1", "v2", "v3", "v4", "v5", "v6"]
        .into_iter()
        .map(video)
        .collect();
    let second: Vec<MediaItem> = ["v6", "v7"].into_iter().map(video).collect();
    let fetcher = ScriptedFetcher::new(vec![Ok(first), Ok(second), Ok(Vec::new())]);

    let mut page = GalleryPage::new(
        Section::Videos,
        fetcher.clone(),
        CountingHistory::at("/videos/v7"),
        RecordingKeyboard::default(),
        &SiteConfig::default(),
    );

    assert!(page.load().await);
    assert!(page.navigator().state() == &GalleryState::Closed);
    assert!(page.load_more().await);
    assert!(page.has_more());
    assert_eq!(page.catalog().len(), 7);
    assert!(page.navigator().is_open());

    assert!(page.load_more().await);
    assert!(!page.has_more());
    assert!(!page.load_more().await);

    assert_eq!(
        fetcher.windows(),
        vec![
            Some(PageWindow::new(0, 6)),
            Some(PageWindow::new(6, 6)),
            Some(PageWindow::new(12, 6)),
        ]
    );
    assert_eq!(page.meta().title, "V7 - Video by Red Malanga");
    assert!(page
        .view()
        .unwrap()
        .asset_url
        .unwrap()
        .starts_with("https://player.vimeo.com/video/"));
}

#[test]
fn test_site_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("site.json");
    std::fs::write(
        &path,
        r#"{"site": {"site_url": "https://staging.redmalanga.com"}, "sanity": {"dataset": "staging"}}"#,
    )
    .unwrap();

    let config = SiteConfig::from_json_file(&path).unwrap();
    assert_eq!(config.site.site_url, "https://staging.redmalanga.com");
    assert_eq!(config.site.brand, "Red Malanga");
    assert_eq!(config.sanity.dataset, "staging");

    let missing = SiteConfig::from_json_file(temp_dir.path().join("nope.json"));
    assert!(missing.unwrap_err().to_string().contains("failed to read site config"));
}

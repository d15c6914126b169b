//! Gallery page controller
//!
//! [`GalleryPage`] owns one gallery section for the lifetime of its view:
//! content loading, the grouped catalog snapshot, the viewer state machine,
//! address synchronization and keyboard bindings. Hosts feed it discrete
//! events (load completion, click, key press, address change, timer expiry)
//! and render from [`GalleryPage::view`] and [`GalleryPage::meta`].

use app_state::{
    group_items, FetchError, GroupedCatalog, LoadOutcome, LoadTicket, LoadTracker, MediaFetcher,
    MediaItem, PageWindow, PagedCatalog, QueryState, VIDEO_PAGE_SIZE,
};
use app_ui::{
    present, scrub_tracking_params, section_meta, AssetResolver, GalleryCommand,
    GalleryNavigator, History, Key, KeyBindings, KeyboardHost, ModalView, NavigationOrigin,
    PageMeta, SanityAssetResolver, Section, SiteIdentity, SyncAction, UrlSynchronizer,
};

use crate::config::SiteConfig;

/// How a section's listing is loaded
#[derive(Debug, Clone)]
enum Listing {
    /// One request returns everything
    Complete,
    /// Fixed-size windows accumulated on demand
    Paged(PagedCatalog),
}

/// A request handed out by [`GalleryPage::begin_load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    /// Ticket to settle the request with
    pub ticket: LoadTicket,
    /// Window to fetch, for paged listings
    pub window: Option<PageWindow>,
}

/// One gallery section and its modal viewer
pub struct GalleryPage<F, H, K>
where
    F: MediaFetcher,
    H: History,
    K: KeyboardHost,
{
    section: Section,
    fetcher: F,
    tracker: LoadTracker,
    listing: Listing,
    catalog: GroupedCatalog,
    nav: GalleryNavigator,
    sync: UrlSynchronizer<H>,
    keys: KeyBindings,
    keyboard: K,
    resolver: SanityAssetResolver,
    site: SiteIdentity,
}

impl<F, H, K> GalleryPage<F, H, K>
where
    F: MediaFetcher,
    H: History,
    K: KeyboardHost,
{
    /// Mount a section
    ///
    /// Photos load in one request; videos load [`VIDEO_PAGE_SIZE`] at a time.
    /// Tracking parameters are scrubbed from the address on mount.
    pub fn new(section: Section, fetcher: F, mut history: H, keyboard: K, config: &SiteConfig) -> Self {
        scrub_tracking_params(&mut history);
        let listing = match section {
            Section::Photos => Listing::Complete,
            Section::Videos => Listing::Paged(PagedCatalog::new(VIDEO_PAGE_SIZE)),
        };

        Self {
            section,
            fetcher,
            tracker: LoadTracker::new(),
            listing,
            catalog: GroupedCatalog::default(),
            nav: GalleryNavigator::new(),
            sync: UrlSynchronizer::new(section, history),
            keys: KeyBindings::new(),
            keyboard,
            resolver: SanityAssetResolver::from_config(&config.sanity),
            site: config.site.clone(),
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Start a request
    ///
    /// Returns `None` after unmount, while a page is in flight, or once a
    /// paged listing is exhausted.
    pub fn begin_load(&mut self) -> Option<LoadRequest> {
        if !self.tracker.is_active() {
            return None;
        }
        let window = match &mut self.listing {
            Listing::Complete => None,
            Listing::Paged(paged) => Some(paged.next_window()?),
        };
        Some(LoadRequest {
            ticket: self.tracker.begin(),
            window,
        })
    }

    /// Apply a completed request
    ///
    /// Returns true when new content was applied. Superseded responses and
    /// responses arriving after unmount are dropped; failures keep the
    /// current listing.
    pub fn apply_load(
        &mut self,
        request: LoadRequest,
        result: Result<Vec<MediaItem>, FetchError>,
    ) -> bool {
        match self.tracker.settle(request.ticket, result) {
            LoadOutcome::Fresh(items) => {
                self.catalog = match &mut self.listing {
                    Listing::Complete => group_items(items),
                    Listing::Paged(paged) => {
                        let added = paged.accept_page(items);
                        tracing::debug!(added, has_more = paged.has_more(), "page loaded");
                        paged.catalog()
                    }
                };
                tracing::info!(section = ?self.section, items = self.catalog.len(), "catalog updated");
                let action = self.sync.on_catalog_loaded(&mut self.nav, &self.catalog);
                tracing::debug!(?action, "resolved address against catalog");
                self.refresh_keys();
                true
            }
            LoadOutcome::Failed(_) => {
                if let Listing::Paged(paged) = &mut self.listing {
                    paged.fail_page();
                }
                false
            }
            LoadOutcome::Stale => false,
        }
    }

    /// Fetch and apply one request
    pub async fn load(&mut self) -> bool {
        let Some(request) = self.begin_load() else {
            return false;
        };
        let result = self.fetcher.fetch(request.window).await;
        self.apply_load(request, result)
    }

    /// Fetch the next page of a paged listing
    pub async fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.load().await
    }

    /// Whether a paged listing may have more items
    pub fn has_more(&self) -> bool {
        match &self.listing {
            Listing::Complete => false,
            Listing::Paged(paged) => paged.has_more(),
        }
    }

    /// Load state of the latest request
    pub fn load_state(&self) -> QueryState {
        self.tracker.state()
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Open the item a visitor clicked
    pub fn click(&mut self, group: &str, index: usize) -> app_ui::Result<()> {
        let result = self
            .sync
            .open_item(&mut self.nav, &self.catalog, group, index, NavigationOrigin::User)
            .map(|_| ());
        self.refresh_keys();
        result
    }

    /// Handle a key press
    pub fn key(&mut self, key: Key) -> Option<GalleryCommand> {
        let command = self.keys.dispatch(key)?;
        self.command(command);
        Some(command)
    }

    /// Run a viewer command
    pub fn command(&mut self, command: GalleryCommand) {
        match command {
            GalleryCommand::Previous => {
                self.sync.previous(&mut self.nav, &self.catalog);
            }
            GalleryCommand::Next => {
                self.sync.next(&mut self.nav, &self.catalog);
            }
            GalleryCommand::Close => {
                self.sync.close_item(&mut self.nav, NavigationOrigin::User);
            }
        }
        self.refresh_keys();
    }

    /// Handle an address reported by the host
    pub fn location_changed(&mut self, location: &str) -> SyncAction {
        let action = self
            .sync
            .on_location_changed(&mut self.nav, &self.catalog, location);
        self.refresh_keys();
        action
    }

    /// Wait out pending transitions and complete them
    pub async fn settle(&mut self) {
        while let Some(transition) = self.nav.pending() {
            tokio::time::sleep(transition.delay).await;
            self.nav.complete_transition(transition);
        }
        self.refresh_keys();
    }

    /// Tear the view down
    ///
    /// Responses still in flight are dropped and the key listener is
    /// released.
    pub fn unmount(&mut self) {
        self.tracker.deactivate();
        self.nav.reset();
        self.keys.release(&mut self.keyboard);
        tracing::debug!(section = ?self.section, "gallery unmounted");
    }

    fn refresh_keys(&mut self) {
        self.keys.sync(&mut self.keyboard, self.nav.is_interactive());
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Viewer view model, `None` when closed
    pub fn view(&self) -> Option<ModalView> {
        present(&self.nav, &self.catalog, self.section, &self.resolver, &self.site)
    }

    /// Page metadata for the current state
    pub fn meta(&self) -> PageMeta {
        match self.view() {
            Some(view) => view.meta,
            None => section_meta(self.section, &self.site),
        }
    }

    /// Grid thumbnail address of an item
    pub fn thumbnail(&self, item: &MediaItem) -> Option<String> {
        self.resolver.thumbnail(&item.media_ref)
    }

    /// Current catalog snapshot
    pub fn catalog(&self) -> &GroupedCatalog {
        &self.catalog
    }

    /// Viewer state machine
    pub fn navigator(&self) -> &GalleryNavigator {
        &self.nav
    }

    /// Host history
    pub fn history(&self) -> &H {
        self.sync.history()
    }

    /// Mutable host history, for simulating back/forward
    pub fn history_mut(&mut self) -> &mut H {
        self.sync.history_mut()
    }

    /// Host keyboard registry
    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    /// Section shown
    pub fn section(&self) -> Section {
        self.section
    }
}

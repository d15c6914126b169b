//! Address synchronization for the gallery viewer
//!
//! Keeps the open item and the address in agreement in both directions.
//! User actions write the address (push when opening or closing, replace
//! when stepping). Address changes coming from the host (deep link load,
//! back/forward) drive the navigator with [`NavigationOrigin::Url`], which
//! never writes the address back, so a change cannot echo into another one.

use crate::gallery::{GalleryNavigator, NavigationError, PendingTransition, Result};
use crate::navigation::{History, Router, Section};
use app_state::GroupedCatalog;

/// Where a navigation request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOrigin {
    /// Click, key press or other direct interaction
    User,
    /// The host reported a new address
    Url,
}

/// Effect of an address change on the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// A viewer was opened or switched to the slug's item
    Opened {
        /// Group of the item
        group: String,
        /// Index of the item in its group
        index: usize,
        /// Enter animation to complete, when the viewer was just mounted
        transition: Option<PendingTransition>,
    },
    /// The viewer started closing
    Closed {
        /// Exit animation to complete
        transition: PendingTransition,
    },
    /// The slug is not loaded yet; it is retried on the next catalog
    Deferred {
        /// Slug waiting for a catalog that contains it
        slug: String,
    },
    /// Nothing to do
    Unchanged,
}

/// Binds one gallery section's viewer to the host history
#[derive(Debug)]
pub struct UrlSynchronizer<H: History> {
    section: Section,
    history: H,
    router: Router,
    pending_slug: Option<String>,
}

impl<H: History> UrlSynchronizer<H> {
    /// Create a synchronizer for `section`
    pub fn new(section: Section, history: H) -> Self {
        Self {
            section,
            history,
            router: Router::new(),
            pending_slug: None,
        }
    }

    /// Section this synchronizer writes addresses for
    pub fn section(&self) -> Section {
        self.section
    }

    /// The host history
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access to the host history
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    /// Slug from the address that the loaded catalog does not contain yet
    pub fn pending_slug(&self) -> Option<&str> {
        self.pending_slug.as_deref()
    }

    /// Open an item
    ///
    /// A user-originated open of a deep-linkable item pushes its address.
    /// Items without a slug open an ephemeral viewer and leave the address
    /// alone.
    pub fn open_item(
        &mut self,
        nav: &mut GalleryNavigator,
        catalog: &GroupedCatalog,
        group: &str,
        index: usize,
        origin: NavigationOrigin,
    ) -> Result<Option<PendingTransition>> {
        let transition = nav.open_item(catalog, group, index)?;
        if origin == NavigationOrigin::Url {
            return Ok(transition);
        }

        self.pending_slug = None;
        match nav.current(catalog).and_then(|item| item.slug.as_ref()) {
            Some(slug) => {
                let path = self.section.item_path(slug.as_str());
                tracing::debug!(%path, "push");
                self.history.push(&path);
            }
            None => tracing::debug!(group, index, "opened item without slug, address unchanged"),
        }
        Ok(transition)
    }

    /// Close the viewer
    ///
    /// A user-originated close of a synced viewer pushes the section address.
    pub fn close_item(
        &mut self,
        nav: &mut GalleryNavigator,
        origin: NavigationOrigin,
    ) -> Option<PendingTransition> {
        let synced = nav.open_item_state().is_some_and(|open| open.url_synced);
        let transition = nav.close_item()?;

        if origin == NavigationOrigin::User && synced {
            let path = self.section.root_path();
            tracing::debug!(path, "push");
            self.history.push(path);
        }
        Some(transition)
    }

    /// Step to the next item, replacing the address
    pub fn next(&mut self, nav: &mut GalleryNavigator, catalog: &GroupedCatalog) -> bool {
        let moved = nav.next(catalog);
        if moved {
            self.replace_current(nav, catalog);
        }
        moved
    }

    /// Step to the previous item, replacing the address
    pub fn previous(&mut self, nav: &mut GalleryNavigator, catalog: &GroupedCatalog) -> bool {
        let moved = nav.previous(catalog);
        if moved {
            self.replace_current(nav, catalog);
        }
        moved
    }

    fn replace_current(&mut self, nav: &GalleryNavigator, catalog: &GroupedCatalog) {
        let path = match nav.current(catalog).and_then(|item| item.slug.as_ref()) {
            Some(slug) => self.section.item_path(slug.as_str()),
            None => self.section.root_path().to_string(),
        };
        tracing::debug!(%path, "replace");
        self.history.replace(&path);
    }

    /// Locate a slug across every group of the catalog
    pub fn resolve_slug(catalog: &GroupedCatalog, slug: &str) -> Result<(String, usize)> {
        catalog
            .find_slug(slug)
            .map(|(group, index)| (group.to_string(), index))
            .ok_or_else(|| NavigationError::SlugNotFound(slug.to_string()))
    }

    /// React to an address reported by the host
    ///
    /// Never writes to the history.
    pub fn on_location_changed(
        &mut self,
        nav: &mut GalleryNavigator,
        catalog: &GroupedCatalog,
        location: &str,
    ) -> SyncAction {
        let route = self.router.match_path(location);
        let slug = match route.gallery() {
            Some((section, slug)) if section == self.section => slug,
            _ => None,
        };

        let Some(slug) = slug else {
            self.pending_slug = None;
            let bound = nav.open_item_state().is_some_and(|open| open.address_bound);
            if !bound {
                return SyncAction::Unchanged;
            }
            return match self.close_item(nav, NavigationOrigin::Url) {
                Some(transition) => SyncAction::Closed { transition },
                None => SyncAction::Unchanged,
            };
        };

        let showing = nav.is_interactive()
            && nav
                .current(catalog)
                .and_then(|item| item.slug.as_ref())
                .is_some_and(|current| current.as_str() == slug);
        if showing {
            self.pending_slug = None;
            return SyncAction::Unchanged;
        }

        match Self::resolve_slug(catalog, slug) {
            Ok((group, index)) => {
                self.pending_slug = None;
                match self.open_item(nav, catalog, &group, index, NavigationOrigin::Url) {
                    Ok(transition) => SyncAction::Opened {
                        group,
                        index,
                        transition,
                    },
                    Err(err) => {
                        tracing::warn!("{}", err);
                        SyncAction::Unchanged
                    }
                }
            }
            Err(err) => {
                tracing::debug!("{}, waiting for content", err);
                self.pending_slug = Some(slug.to_string());
                SyncAction::Deferred {
                    slug: slug.to_string(),
                }
            }
        }
    }

    /// React to a new catalog snapshot
    ///
    /// Brings the open item back in range, then resolves a slug in the
    /// current address against the new content. An address without a slug
    /// leaves the viewer alone; only a host-reported change closes it.
    pub fn on_catalog_loaded(
        &mut self,
        nav: &mut GalleryNavigator,
        catalog: &GroupedCatalog,
    ) -> SyncAction {
        nav.reconcile(catalog);
        let location = self.history.location();
        let has_slug = matches!(
            self.router.match_path(&location).gallery(),
            Some((section, Some(_))) if section == self.section
        );
        if !has_slug {
            self.pending_slug = None;
            return SyncAction::Unchanged;
        }
        self.on_location_changed(nav, catalog, &location)
    }
}

//! Gallery navigation state machine
//!
//! The modal viewer is either [`GalleryState::Closed`] or
//! [`GalleryState::Open`] on one item of one group. Enter and exit animations
//! are modelled as a [`PendingTransition`] that the host completes once the
//! transition's delay has elapsed; until then the viewer is mounted but not
//! yet animated in, or animated out but not yet unmounted.

use crate::tokens::duration;
use app_state::{GroupedCatalog, MediaItem};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Navigation errors
///
/// None of these are surfaced to visitors; callers log and fall back to a
/// closed viewer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// The requested group does not exist in the current catalog
    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    /// The requested index is outside the group
    #[error("Index {index} out of range for group {group} of length {len}")]
    IndexOutOfRange {
        /// Group name
        group: String,
        /// Requested index
        index: usize,
        /// Group length
        len: usize,
    },

    /// The address names a slug the loaded catalog does not contain
    #[error("Slug not found: {0}")]
    SlugNotFound(String),
}

/// Result type for navigation operations
pub type Result<T> = std::result::Result<T, NavigationError>;

// =============================================================================
// State
// =============================================================================

/// The item shown by an open viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenItem {
    /// Group name
    pub group: String,
    /// Index into the group
    pub index: usize,
    /// Enter animation has started
    pub animating_in: bool,
    /// The viewer's item is reflected in the address
    pub url_synced: bool,
    /// Some item of this viewer session was reflected in the address, so an
    /// address without a slug closes the viewer
    pub address_bound: bool,
}

/// Viewer state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum GalleryState {
    /// No viewer mounted
    #[default]
    Closed,
    /// Viewer mounted on an item
    Open(OpenItem),
}

/// Kind of a scheduled transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Start the enter animation after mount
    Enter,
    /// Unmount after the exit animation
    Exit,
}

/// A transition the host completes after `delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    /// What completing the transition does
    pub kind: TransitionKind,
    /// How long the host waits before completing it
    pub delay: Duration,
    id: u64,
}

/// Result of reconciling the state with a new catalog snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// State still points at a valid item
    Unchanged,
    /// Index was clamped to the last item of the group
    Clamped(usize),
    /// Group vanished or emptied; the viewer was closed
    Closed,
}

// =============================================================================
// Navigator
// =============================================================================

/// Owns which item of which group the viewer shows
#[derive(Debug, Clone, Default)]
pub struct GalleryNavigator {
    state: GalleryState,
    pending: Option<PendingTransition>,
    closing: bool,
    next_transition: u64,
}

impl GalleryNavigator {
    /// Create a closed navigator
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// The open item, if any
    pub fn open_item_state(&self) -> Option<&OpenItem> {
        match &self.state {
            GalleryState::Open(open) => Some(open),
            GalleryState::Closed => None,
        }
    }

    /// Whether a viewer is mounted, including while it animates out
    pub fn is_open(&self) -> bool {
        matches!(self.state, GalleryState::Open(_))
    }

    /// Whether the viewer is animating out
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Whether the viewer is open and accepting navigation
    pub fn is_interactive(&self) -> bool {
        self.is_open() && !self.closing
    }

    /// Transition waiting for the host timer
    pub fn pending(&self) -> Option<PendingTransition> {
        self.pending
    }

    /// Item the viewer shows
    pub fn current<'a>(&self, catalog: &'a GroupedCatalog) -> Option<&'a MediaItem> {
        let open = self.open_item_state()?;
        catalog.item(&open.group, open.index)
    }

    /// Open the viewer on `index` of `group`
    ///
    /// From the closed state (or while animating out) this mounts the viewer
    /// and schedules the enter animation. On an already open viewer it swaps
    /// the item in place and schedules nothing.
    pub fn open_item(
        &mut self,
        catalog: &GroupedCatalog,
        group: &str,
        index: usize,
    ) -> Result<Option<PendingTransition>> {
        let items = catalog
            .group(group)
            .ok_or_else(|| NavigationError::UnknownGroup(group.to_string()))?;
        let item = items.get(index).ok_or_else(|| NavigationError::IndexOutOfRange {
            group: group.to_string(),
            index,
            len: items.len(),
        })?;
        let url_synced = item.is_deep_linkable();

        if let GalleryState::Open(open) = &mut self.state {
            if !self.closing {
                tracing::debug!(group, index, "switching open item");
                open.group = group.to_string();
                open.index = index;
                open.url_synced = url_synced;
                open.address_bound |= url_synced;
                return Ok(None);
            }
        }

        tracing::debug!(group, index, url_synced, "opening item");
        self.closing = false;
        self.state = GalleryState::Open(OpenItem {
            group: group.to_string(),
            index,
            animating_in: false,
            url_synced,
            address_bound: url_synced,
        });
        Ok(Some(self.schedule(TransitionKind::Enter, duration::SLOW)))
    }

    /// Start closing the viewer
    ///
    /// The state is cleared when the returned exit transition completes.
    /// Returns `None` when there is nothing to close.
    pub fn close_item(&mut self) -> Option<PendingTransition> {
        let open = match &mut self.state {
            GalleryState::Open(open) if !self.closing => open,
            _ => return None,
        };
        tracing::debug!(group = %open.group, index = open.index, "closing item");
        open.animating_in = false;
        self.closing = true;
        Some(self.schedule(TransitionKind::Exit, duration::MODERATE))
    }

    /// Complete a transition once its delay has elapsed
    ///
    /// Superseded transitions are ignored. Returns true when the state changed.
    pub fn complete_transition(&mut self, transition: PendingTransition) -> bool {
        if self.pending != Some(transition) {
            tracing::trace!(id = transition.id, "ignoring superseded transition");
            return false;
        }
        self.pending = None;

        match transition.kind {
            TransitionKind::Enter => match &mut self.state {
                GalleryState::Open(open) if !self.closing => {
                    open.animating_in = true;
                    true
                }
                _ => false,
            },
            TransitionKind::Exit => {
                if !self.closing {
                    return false;
                }
                self.closing = false;
                self.state = GalleryState::Closed;
                true
            }
        }
    }

    /// Show the next item of the group, wrapping to the first
    pub fn next(&mut self, catalog: &GroupedCatalog) -> bool {
        self.step(catalog, true)
    }

    /// Show the previous item of the group, wrapping to the last
    pub fn previous(&mut self, catalog: &GroupedCatalog) -> bool {
        self.step(catalog, false)
    }

    fn step(&mut self, catalog: &GroupedCatalog, forward: bool) -> bool {
        let open = match &mut self.state {
            GalleryState::Open(open) if !self.closing => open,
            _ => return false,
        };
        let len = catalog.group_len(&open.group);
        if len == 0 {
            return false;
        }

        let index = open.index.min(len - 1);
        let target = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        if target == open.index {
            return false;
        }

        open.index = target;
        open.url_synced = catalog
            .item(&open.group, target)
            .is_some_and(MediaItem::is_deep_linkable);
        open.address_bound |= open.url_synced;
        tracing::debug!(group = %open.group, index = target, "stepped to item");
        true
    }

    /// Bring the state back in range after a new catalog snapshot
    pub fn reconcile(&mut self, catalog: &GroupedCatalog) -> Reconciled {
        let open = match &mut self.state {
            GalleryState::Open(open) => open,
            GalleryState::Closed => return Reconciled::Unchanged,
        };

        let len = catalog.group_len(&open.group);
        if len == 0 {
            tracing::warn!(group = %open.group, "open group vanished, closing viewer");
            self.reset();
            return Reconciled::Closed;
        }
        if open.index < len {
            return Reconciled::Unchanged;
        }

        let err = NavigationError::IndexOutOfRange {
            group: open.group.clone(),
            index: open.index,
            len,
        };
        tracing::warn!("{}, clamping", err);
        open.index = len - 1;
        open.url_synced = catalog
            .item(&open.group, open.index)
            .is_some_and(MediaItem::is_deep_linkable);
        open.address_bound |= open.url_synced;
        Reconciled::Clamped(open.index)
    }

    /// Drop all state immediately, without an exit animation
    pub fn reset(&mut self) {
        self.state = GalleryState::Closed;
        self.pending = None;
        self.closing = false;
    }

    fn schedule(&mut self, kind: TransitionKind, delay_ms: u32) -> PendingTransition {
        self.next_transition += 1;
        let transition = PendingTransition {
            kind,
            delay: duration::as_duration(delay_ms),
            id: self.next_transition,
        };
        self.pending = Some(transition);
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_state::{MediaRef, UNCATEGORIZED};
    use sanity_client::Slug;

    fn item(id: &str, category: &str, slug: Option<&str>) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            title: id.to_uppercase(),
            category: Some(category.to_string()),
            slug: slug.map(|s| Slug::new(s).unwrap()),
            media_ref: MediaRef::Missing,
        }
    }

    fn catalog() -> GroupedCatalog {
        GroupedCatalog::from_items(vec![
            item("a", "Landscape", Some("a1")),
            item("b", "Landscape", Some("b2")),
            item("c", "Portrait", Some("c3")),
        ])
    }

    fn open_at(nav: &mut GalleryNavigator, catalog: &GroupedCatalog, group: &str, index: usize) {
        let pending = nav.open_item(catalog, group, index).unwrap().unwrap();
        nav.complete_transition(pending);
    }

    fn index(nav: &GalleryNavigator) -> usize {
        nav.open_item_state().unwrap().index
    }

    #[test]
    fn test_open_schedules_enter_animation() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        let pending = nav.open_item(&catalog, "Landscape", 1).unwrap().unwrap();

        assert_eq!(pending.kind, TransitionKind::Enter);
        assert_eq!(pending.delay, Duration::from_millis(300));
        assert!(!nav.open_item_state().unwrap().animating_in);

        assert!(nav.complete_transition(pending));
        assert!(nav.open_item_state().unwrap().animating_in);
        assert_eq!(nav.current(&catalog).unwrap().id, "b");
    }

    #[test]
    fn test_open_rejects_unknown_group_and_index() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        assert_eq!(
            nav.open_item(&catalog, "Street", 0),
            Err(NavigationError::UnknownGroup("Street".to_string()))
        );
        assert!(matches!(
            nav.open_item(&catalog, "Portrait", 4),
            Err(NavigationError::IndexOutOfRange { len: 1, .. })
        ));
        assert_eq!(nav.state(), &GalleryState::Closed);
    }

    #[test]
    fn test_close_waits_for_exit_transition() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Portrait", 0);

        let exit = nav.close_item().unwrap();
        assert_eq!(exit.kind, TransitionKind::Exit);
        assert_eq!(exit.delay, Duration::from_millis(200));
        assert!(nav.is_open());
        assert!(nav.is_closing());
        assert!(nav.close_item().is_none());

        assert!(nav.complete_transition(exit));
        assert_eq!(nav.state(), &GalleryState::Closed);
        assert!(nav.close_item().is_none());
    }

    #[test]
    fn test_reopen_while_closing_supersedes_exit() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Landscape", 0);
        let exit = nav.close_item().unwrap();

        let enter = nav.open_item(&catalog, "Portrait", 0).unwrap().unwrap();
        assert!(!nav.complete_transition(exit));
        assert!(nav.is_open());
        assert!(nav.complete_transition(enter));
        assert_eq!(nav.current(&catalog).unwrap().id, "c");
    }

    #[test]
    fn test_open_on_open_viewer_swaps_item() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Landscape", 0);

        assert_eq!(nav.open_item(&catalog, "Portrait", 0), Ok(None));
        let open = nav.open_item_state().unwrap();
        assert_eq!(open.group, "Portrait");
        assert!(open.animating_in);
    }

    #[test]
    fn test_next_wraps_after_group_length_steps() {
        let catalog = GroupedCatalog::from_items(
            (0..5)
                .map(|i| item(&format!("p{}", i), "Street", None))
                .collect(),
        );
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Street", 0);

        for _ in 0..5 {
            assert!(nav.next(&catalog));
        }
        assert_eq!(index(&nav), 0);
    }

    #[test]
    fn test_previous_from_first_goes_to_last() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Landscape", 0);

        assert!(nav.previous(&catalog));
        assert_eq!(index(&nav), 1);
    }

    #[test]
    fn test_step_is_noop_when_closed_or_single() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        assert!(!nav.next(&catalog));
        assert_eq!(nav.state(), &GalleryState::Closed);

        open_at(&mut nav, &catalog, "Portrait", 0);
        assert!(!nav.next(&catalog));
        assert!(!nav.previous(&catalog));
        assert_eq!(index(&nav), 0);
    }

    #[test]
    fn test_step_is_noop_on_emptied_group() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Landscape", 1);
        let before = nav.state().clone();

        let empty = GroupedCatalog::default();
        assert!(!nav.next(&empty));
        assert!(!nav.previous(&empty));
        assert_eq!(nav.state(), &before);
    }

    #[test]
    fn test_step_ignored_while_closing() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Landscape", 0);
        nav.close_item();

        assert!(!nav.next(&catalog));
        assert_eq!(index(&nav), 0);
    }

    #[test]
    fn test_rapid_steps_last_write_wins() {
        let catalog = GroupedCatalog::from_items(
            (0..4)
                .map(|i| item(&format!("p{}", i), "Street", None))
                .collect(),
        );
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Street", 0);

        nav.next(&catalog);
        nav.next(&catalog);
        nav.previous(&catalog);
        nav.next(&catalog);
        assert_eq!(index(&nav), 2);
    }

    #[test]
    fn test_step_onto_slugless_item_clears_url_sync() {
        let catalog = GroupedCatalog::from_items(vec![
            item("a", "Mixed", Some("a1")),
            item("b", "Mixed", None),
        ]);
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Mixed", 0);
        assert!(nav.open_item_state().unwrap().url_synced);

        nav.next(&catalog);
        let open = nav.open_item_state().unwrap();
        assert!(!open.url_synced);
        assert!(open.address_bound);
    }

    #[test]
    fn test_slugless_session_binds_once_a_slug_is_shown() {
        let catalog = GroupedCatalog::from_items(vec![
            item("a", "Mixed", None),
            item("b", "Mixed", Some("b2")),
        ]);
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Mixed", 0);
        assert!(!nav.open_item_state().unwrap().address_bound);

        nav.next(&catalog);
        nav.previous(&catalog);
        let open = nav.open_item_state().unwrap();
        assert!(!open.url_synced);
        assert!(open.address_bound);
    }

    #[test]
    fn test_reconcile_clamps_shrunk_group() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Landscape", 1);

        let shrunk = GroupedCatalog::from_items(vec![item("a", "Landscape", Some("a1"))]);
        assert_eq!(nav.reconcile(&shrunk), Reconciled::Clamped(0));
        assert_eq!(nav.current(&shrunk).unwrap().id, "a");
    }

    #[test]
    fn test_reconcile_closes_vanished_group() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        open_at(&mut nav, &catalog, "Portrait", 0);

        let other = GroupedCatalog::from_items(vec![item("z", UNCATEGORIZED, None)]);
        assert_eq!(nav.reconcile(&other), Reconciled::Closed);
        assert_eq!(nav.state(), &GalleryState::Closed);
        assert!(nav.pending().is_none());
    }

    #[test]
    fn test_reconcile_keeps_valid_state() {
        let catalog = catalog();
        let mut nav = GalleryNavigator::new();
        assert_eq!(nav.reconcile(&catalog), Reconciled::Unchanged);
        open_at(&mut nav, &catalog, "Landscape", 1);
        assert_eq!(nav.reconcile(&catalog), Reconciled::Unchanged);
    }
}

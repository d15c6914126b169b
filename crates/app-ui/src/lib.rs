//! Gallery user interface for the portfolio site
//!
//! This crate provides the interaction layer of the photo and video
//! galleries: routing, the history abstraction, the modal viewer's state
//! machine, address synchronization, keyboard bindings and the view model
//! the renderer draws from.
//!
//! # Modules
//!
//! - [`navigation`] - Routes, router, history and tracking-parameter scrubbing
//! - [`gallery`] - Viewer state machine (`Closed | Open`) with animated transitions
//! - [`sync`] - Two-way binding between the open item and the address
//! - [`keyboard`] - Arrow/Escape bindings, registered only while the viewer is open
//! - [`modal`] - View model, asset resolution and page metadata
//! - [`tokens`] - Motion and thumbnail tokens
//!
//! # Example
//!
//! ```rust
//! use app_state::{GroupedCatalog, MediaItem, MediaRef};
//! use app_ui::{GalleryNavigator, History, MemoryHistory, NavigationOrigin, Section, UrlSynchronizer};
//! use sanity_client::Slug;
//!
//! let catalog = GroupedCatalog::from_items(vec![MediaItem {
//!     id: "p1".to_string(),
//!     title: "Dunes".to_string(),
//!     category: Some("Landscape".to_string()),
//!     slug: Some(Slug::new("dunes").unwrap()),
//!     media_ref: MediaRef::Missing,
//! }]);
//!
//! let mut nav = GalleryNavigator::new();
//! let mut sync = UrlSynchronizer::new(Section::Photos, MemoryHistory::new("/photos"));
//! sync.open_item(&mut nav, &catalog, "Landscape", 0, NavigationOrigin::User).unwrap();
//! assert_eq!(sync.history().location(), "/photos/dunes");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gallery;
pub mod keyboard;
pub mod modal;
pub mod navigation;
pub mod sync;
pub mod tokens;

pub use gallery::{
    GalleryNavigator, GalleryState, NavigationError, OpenItem, PendingTransition, Reconciled,
    Result, TransitionKind,
};

pub use keyboard::{GalleryCommand, Key, KeyBindings, KeyboardHost, ListenerId};

pub use modal::{
    present, section_meta, AssetResolver, ModalView, PageMeta, SanityAssetResolver, SiteIdentity,
};

pub use navigation::{
    scrub_tracking_params, strip_tracking_params, History, HistoryEntry, HistoryError,
    MemoryHistory, Route, RouteParams, Router, Section,
};

pub use sync::{NavigationOrigin, SyncAction, UrlSynchronizer};

pub use tokens::{duration, thumbnail};

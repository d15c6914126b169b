//! Application state for the portfolio galleries
//!
//! This crate provides the media model, grouping of fetched content into
//! categories, paginated accumulation with de-duplication, the content
//! fetchers, and load tracking that discards late responses.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod fetcher;
pub mod paging;
pub mod query;

pub use catalog::{group_items, GroupedCatalog, MediaItem, MediaRef, UNCATEGORIZED};
pub use fetcher::{FetchError, MediaFetcher, PhotoFetcher, VideoFetcher};
pub use paging::{PageWindow, PagedCatalog, VIDEO_PAGE_SIZE};
pub use query::{LoadOutcome, LoadTicket, LoadTracker, QueryState};

//! Paginated accumulation
//!
//! The video listing loads in fixed-size windows. Windows can overlap when
//! content is published between requests, so items are de-duplicated by id
//! at the accumulation boundary, keeping the first occurrence.

use crate::catalog::{group_items, GroupedCatalog, MediaItem};
use std::collections::HashSet;

/// Items per page of the video listing
pub const VIDEO_PAGE_SIZE: usize = 6;

/// Half-open range `[start, start + len)` of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// First offset
    pub start: usize,
    /// Number of items requested
    pub len: usize,
}

impl PageWindow {
    /// Create a window
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Accumulates pages into one growing list
#[derive(Debug, Clone)]
pub struct PagedCatalog {
    items: Vec<MediaItem>,
    seen: HashSet<String>,
    next_start: usize,
    page_size: usize,
    has_more: bool,
    loading: bool,
}

impl Default for PagedCatalog {
    fn default() -> Self {
        Self::new(VIDEO_PAGE_SIZE)
    }
}

impl PagedCatalog {
    /// Create an empty accumulator
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            next_start: 0,
            page_size: page_size.max(1),
            has_more: true,
            loading: false,
        }
    }

    /// Reserve the next window to load
    ///
    /// Returns `None` while a page is in flight or once the listing is
    /// exhausted; otherwise marks the accumulator as loading.
    pub fn next_window(&mut self) -> Option<PageWindow> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(PageWindow::new(self.next_start, self.page_size))
    }

    /// Append a loaded page, returning how many new items were kept
    ///
    /// An empty page marks the listing as exhausted.
    pub fn accept_page(&mut self, page: Vec<MediaItem>) -> usize {
        self.loading = false;
        if page.is_empty() {
            self.has_more = false;
            return 0;
        }
        self.next_start += self.page_size;

        let before = self.items.len();
        for item in page {
            if self.seen.insert(item.id.clone()) {
                self.items.push(item);
            } else {
                tracing::debug!(id = %item.id, "dropping duplicate item from overlapping page");
            }
        }
        self.items.len() - before
    }

    /// Release the in-flight reservation after a failed load
    pub fn fail_page(&mut self) {
        self.loading = false;
    }

    /// Accumulated items in load order
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Whether another page may exist
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Whether a page is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Grouped snapshot of everything loaded so far
    pub fn catalog(&self) -> GroupedCatalog {
        group_items(self.items.clone())
    }
}

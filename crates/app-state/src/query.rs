//! Load tracking
//!
//! Content loads are fire-and-forget relative to rendering. A [`LoadTracker`]
//! hands out a [`LoadTicket`] per request and only accepts the response that
//! matches the most recent ticket while the owning view is active, so late
//! responses never update a defunct or superseded view.

use crate::fetcher::FetchError;

/// Load state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryState {
    /// Nothing requested yet
    #[default]
    Idle,

    /// A request is in flight
    Fetching,

    /// The latest request succeeded
    Success,

    /// The latest request failed
    Error,
}

/// Token identifying one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// What to do with a completed request
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// Latest request succeeded; apply the data
    Fresh(T),

    /// Latest request failed; keep showing the empty or previous listing
    Failed(FetchError),

    /// Superseded request or inactive view; discard
    Stale,
}

/// Tracks the latest request of one view
#[derive(Debug, Clone)]
pub struct LoadTracker {
    state: QueryState,
    generation: u64,
    active: bool,
}

impl Default for LoadTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadTracker {
    /// Create an active tracker
    pub fn new() -> Self {
        Self {
            state: QueryState::Idle,
            generation: 0,
            active: true,
        }
    }

    /// Start a request, superseding any in flight
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = QueryState::Fetching;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Settle a request
    pub fn settle<T>(&mut self, ticket: LoadTicket, result: Result<T, FetchError>) -> LoadOutcome<T> {
        if !self.active || ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                latest = self.generation,
                active = self.active,
                "discarding late content response"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(data) => {
                self.state = QueryState::Success;
                LoadOutcome::Fresh(data)
            }
            Err(err) => {
                tracing::warn!("content load failed, keeping previous listing: {}", err);
                self.state = QueryState::Error;
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Mark the owning view as gone; every pending response becomes stale
    pub fn deactivate(&mut self) {
        self.active = false;
        if self.state == QueryState::Fetching {
            self.state = QueryState::Idle;
        }
    }

    /// Current state
    pub fn state(&self) -> QueryState {
        self.state
    }

    /// Whether the owning view is still active
    pub fn is_active(&self) -> bool {
        self.active
    }
}

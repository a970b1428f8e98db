//! Incremental, cursor-driven feed pagination.
//!
//! [`FeedPaginator`] owns the accumulated [`FeedState`] and hands out cloned
//! snapshots. Both operations take `&self`: the state sits behind a mutex
//! that is never held across an await, and `Loading` is set before a fetch
//! starts, so a second `load_more` issued while one is in flight sees
//! `Loading` and returns without fetching.
//!
//! Every fetch remembers the generation it was launched under. `initialize`
//! bumps the generation, so a page that arrives for a superseded filter is
//! dropped instead of merged.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{FeedPage, FeedState, FeedStatus};
use crate::fetcher::Fetcher;

pub struct FeedPaginator {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    state: FeedState,
    seen: HashSet<String>,
    generation: u64,
    page_size: u32,
    filter: Option<String>,
}

impl Inner {
    /// Append the page's unseen items and take over its cursor.
    fn merge(&mut self, page: FeedPage) -> usize {
        let mut added = 0;
        for item in page.items {
            if self.seen.insert(item.id.clone()) {
                self.state.items.push(item);
                added += 1;
            } else {
                tracing::debug!("Skipping duplicate item {}", item.id);
            }
        }

        // without a cursor the next request would restart from the top
        self.state.has_more = page.has_more && page.next_cursor.is_some();
        self.state.cursor = page.next_cursor;
        self.state.status = FeedStatus::Idle;
        added
    }
}

impl FeedPaginator {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            fetcher,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn state(&self) -> FeedState {
        self.lock().state.clone()
    }

    pub fn filter(&self) -> Option<String> {
        self.lock().filter.clone()
    }

    /// Drop everything and load the first page for `filter`.
    ///
    /// Any fetch still in flight for the previous filter is abandoned.
    pub async fn initialize(&self, page_size: u32, filter: Option<&str>) -> FeedState {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());

        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.page_size = page_size;
            inner.filter = filter.map(String::from);
            inner.seen.clear();
            inner.state = FeedState::default();

            if page_size == 0 {
                inner.state.status = FeedStatus::Error("page size must be positive".into());
                return inner.state.clone();
            }

            inner.state.status = FeedStatus::Loading;
            inner.generation
        };

        let mut in_flight = InFlight::new(self, generation);
        let result = self.fetcher.fetch_page(None, page_size, filter).await;
        in_flight.finish();

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!("Discarding first page of a superseded query");
            return inner.state.clone();
        }

        match result {
            Ok(page) => {
                let added = inner.merge(page);
                tracing::info!(
                    "Loaded first page: {} items (has_more: {})",
                    added,
                    inner.state.has_more
                );
            }
            Err(e) => {
                tracing::warn!("Failed to load first page: {}", e);
                inner.state.has_more = false;
                inner.state.status = FeedStatus::Error(e.to_string());
            }
        }

        inner.state.clone()
    }

    /// Fetch the next page and append it.
    ///
    /// Returns the current snapshot untouched when there is nothing more to
    /// load or a load is already running. A failed fetch keeps the items and
    /// cursor as they were, so calling again retries the same page.
    pub async fn load_more(&self) -> FeedState {
        let (generation, cursor, page_size, filter) = {
            let mut inner = self.lock();
            if !inner.state.has_more || inner.state.is_loading() {
                return inner.state.clone();
            }
            inner.state.status = FeedStatus::Loading;
            (
                inner.generation,
                inner.state.cursor.clone(),
                inner.page_size,
                inner.filter.clone(),
            )
        };

        let mut in_flight = InFlight::new(self, generation);
        let result = self
            .fetcher
            .fetch_page(cursor.as_deref(), page_size, filter.as_deref())
            .await;
        in_flight.finish();

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!("Discarding page fetched for a superseded query");
            return inner.state.clone();
        }

        match result {
            Ok(page) => {
                let added = inner.merge(page);
                tracing::info!(
                    "Appended {} items, {} total (has_more: {})",
                    added,
                    inner.state.items.len(),
                    inner.state.has_more
                );
            }
            Err(e) => {
                tracing::warn!("Failed to load more items: {}", e);
                inner.state.status = FeedStatus::Error(e.to_string());
            }
        }

        inner.state.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears `Loading` if a fetch future is dropped before it resolves.
struct InFlight<'a> {
    paginator: &'a FeedPaginator,
    generation: u64,
    done: bool,
}

impl<'a> InFlight<'a> {
    fn new(paginator: &'a FeedPaginator, generation: u64) -> Self {
        Self {
            paginator,
            generation,
            done: false,
        }
    }

    fn finish(&mut self) {
        self.done = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let mut inner = self.paginator.lock();
        if inner.generation == self.generation && inner.state.is_loading() {
            tracing::debug!("Page fetch cancelled");
            inner.state.status = FeedStatus::Idle;
        }
    }
}

//! Observable stores mirroring server collections
//!
//! A store owns one collection plus `loading` and `error` flags. The whole
//! state is published as an immutable `StoreState` snapshot through a
//! `tokio::sync::watch` channel; every mutation builds a new collection and
//! swaps it in, so a snapshot held by an observer never changes under it.
//!
//! Operations take `&mut self`, which keeps mutations of one store strictly
//! one at a time. Failures never escape an operation: they end up in
//! `error` and the operation returns `None`/`false`.

pub mod bookmarks;
pub mod folders;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use crate::error::ApiError;
use crate::models::Identified;

pub use bookmarks::BookmarkStore;
pub use folders::FolderStore;

/// Published state of a store
#[derive(Debug, Clone)]
pub struct StoreState<T> {
    /// Collection in server order (plus local insertions)
    pub items: Arc<[T]>,
    /// A fetch/search/import is in flight
    pub loading: bool,
    /// Message of the last failed operation; cleared when the next one starts
    pub error: Option<String>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Arc::from(Vec::new()),
            loading: false,
            error: None,
        }
    }
}

/// Snapshot holder shared by the concrete stores
pub(crate) struct StateCell<T> {
    state: watch::Sender<StoreState<T>>,
}

impl<T: Clone + Identified> StateCell<T> {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self { state }
    }

    pub(crate) fn snapshot(&self) -> StoreState<T> {
        self.state.borrow().clone()
    }

    pub(crate) fn items(&self) -> Arc<[T]> {
        self.state.borrow().items.clone()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub(crate) fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub(crate) fn find(&self, id: &str) -> Option<T> {
        self.state
            .borrow()
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.state.subscribe()
    }

    /// Start an operation: clear the error, optionally raise `loading`
    pub(crate) fn begin(&self, loading: bool) {
        self.state.send_modify(|state| {
            state.error = None;
            if loading {
                state.loading = true;
            }
        });
    }

    /// Lower `loading`
    pub(crate) fn finish(&self) {
        self.state.send_modify(|state| state.loading = false);
    }

    /// Replace the whole collection
    pub(crate) fn replace(&self, items: Vec<T>) {
        self.state.send_modify(|state| state.items = Arc::from(items));
    }

    /// Derive a new collection from the current one; `None` keeps it
    pub(crate) fn rebuild(&self, f: impl FnOnce(&[T]) -> Option<Vec<T>>) {
        self.state.send_if_modified(|state| match f(&state.items) {
            Some(items) => {
                state.items = Arc::from(items);
                true
            }
            None => false,
        });
    }

    /// Record a failure, preferring the server's own message
    pub(crate) fn fail(&self, error: &ApiError, fallback: &str) {
        warn!("{}: {}", fallback, error);
        let message = error.user_message(fallback);
        self.state.send_modify(|state| state.error = Some(message));
    }
}

/// New collection with `item` in front
pub(crate) fn prepend<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.push(item);
    next.extend_from_slice(items);
    next
}

/// New collection with `item` at the back
pub(crate) fn append<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    next
}

/// New collection with the entry matching `id` swapped for `item` at the
/// same position; `None` when nothing matches
pub(crate) fn replace_by_id<T: Clone + Identified>(items: &[T], id: &str, item: T) -> Option<Vec<T>> {
    let index = items.iter().position(|existing| existing.id() == id)?;
    let mut next = items.to_vec();
    next[index] = item;
    Some(next)
}

/// New collection without entries matching `id`
pub(crate) fn remove_by_id<T: Clone + Identified>(items: &[T], id: &str) -> Vec<T> {
    items
        .iter()
        .filter(|existing| existing.id() != id)
        .cloned()
        .collect()
}

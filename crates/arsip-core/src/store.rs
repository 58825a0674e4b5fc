//! Archive synchronization store
//!
//! The `ArchiveStore` owns the client-side view of the archive list and
//! mediates every change between the presentation layer and the backend:
//!
//! - `refresh`: replace the list with the backend's; failures are recorded,
//!   never returned
//! - `create` / `update`: call the backend, then refetch so server-assigned
//!   ids and ordering are reflected
//! - `delete`: call the backend, then drop the record locally
//!
//! Mutation failures are recorded in `last_error` *and* returned, so the
//! caller can keep a form open or show a notification.
//!
//! ## Publishing
//!
//! State lives in a `tokio::sync::watch` channel. Consumers either read a
//! snapshot (`state()`) or `subscribe()` and redraw on change.
//!
//! ## Overlapping refreshes
//!
//! Each refresh takes a generation number. A response is dropped when a
//! newer refresh has already been applied, so a slow older response never
//! overwrites a newer list. A newer refresh that is cancelled before it
//! completes does not hide the older one's result.
//!
//! ## Loading
//!
//! `is_loading` is held by a guard for each in-flight refresh, create or
//! update. It goes back to `false` when the last guard is dropped, which
//! also happens when a caller drops the operation's future early.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::{ArchiveApi, ListQuery, TransportError};
use crate::models::{ArchiveId, ArchiveInput, ArchiveRecord};

/// The store operation that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

/// Last recorded failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub operation: Operation,
    pub message: String,
}

impl ErrorInfo {
    /// True if the failure came from loading the list
    pub fn is_fetch(&self) -> bool {
        self.operation == Operation::Fetch
    }
}

/// Snapshot of the store's published state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Records in backend response order
    pub records: Vec<ArchiveRecord>,
    /// A blocking operation is in flight
    pub is_loading: bool,
    /// Most recent failure, cleared by the next refresh
    pub last_error: Option<ErrorInfo>,
}

impl StoreState {
    /// Find a record by id
    pub fn find(&self, id: ArchiveId) -> Option<&ArchiveRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Client-side synchronization store for archive records
pub struct ArchiveStore<A> {
    api: A,
    state: watch::Sender<StoreState>,
    /// Last refresh generation handed out
    issued: AtomicU64,
    /// Newest refresh generation whose response was applied
    applied: AtomicU64,
    /// Operations currently holding `is_loading`
    in_flight: AtomicUsize,
}

impl<A: ArchiveApi> ArchiveStore<A> {
    /// Create an empty store on top of an archive client
    ///
    /// Nothing is fetched until `refresh` is called.
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            api,
            state,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    // ==================== State ====================

    /// Current state snapshot
    pub fn state(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    /// Current records, in backend order
    pub fn records(&self) -> Vec<ArchiveRecord> {
        self.state.borrow().records.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn last_error(&self) -> Option<ErrorInfo> {
        self.state.borrow().last_error.clone()
    }

    /// Find a record by id in the current list
    pub fn find(&self, id: ArchiveId) -> Option<ArchiveRecord> {
        self.state.borrow().find(id).cloned()
    }

    // ==================== Operations ====================

    /// Re-synchronize the list from the backend
    ///
    /// On failure the previous list is kept and `last_error` is set.
    pub async fn refresh(&self) {
        self.refresh_with(&ListQuery::default()).await
    }

    /// Re-synchronize using query parameters understood by the backend
    pub async fn refresh_with(&self, query: &ListQuery) {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = self.begin_loading();
        self.state
            .send_if_modified(|state| state.last_error.take().is_some());

        let result = self.api.list_all(query).await;

        let applied = &self.applied;
        self.state.send_if_modified(|state| {
            // Runs under the channel lock, so the check and the write are atomic
            if applied.fetch_max(generation, Ordering::SeqCst) > generation {
                debug!("Discarding stale list response (generation {})", generation);
                return false;
            }

            match result {
                Ok(records) => {
                    debug!("Fetched {} arsip records", records.len());
                    state.records = records;
                }
                Err(e) => {
                    warn!("Failed to fetch arsip data: {}", e);
                    state.last_error = Some(ErrorInfo {
                        operation: Operation::Fetch,
                        message: format!("Failed to fetch arsip data: {}", e),
                    });
                }
            }
            true
        });
    }

    /// Create a record, then refetch the list
    ///
    /// Returns the record as created by the backend.
    pub async fn create(&self, input: &ArchiveInput) -> Result<ArchiveRecord, TransportError> {
        let _loading = self.begin_loading();

        match self.api.create(input).await {
            Ok(created) => {
                info!("Created arsip {}", created.id);
                self.refresh().await;
                Ok(created)
            }
            Err(e) => {
                self.record_error(Operation::Create, format!("Failed to create arsip: {}", e));
                Err(e)
            }
        }
    }

    /// Replace a record, then refetch the list
    pub async fn update(
        &self,
        id: ArchiveId,
        input: &ArchiveInput,
    ) -> Result<ArchiveRecord, TransportError> {
        let _loading = self.begin_loading();

        match self.api.update(id, input).await {
            Ok(updated) => {
                info!("Updated arsip {}", id);
                self.refresh().await;
                Ok(updated)
            }
            Err(e) => {
                self.record_error(
                    Operation::Update,
                    format!("Failed to update arsip with ID {}: {}", id, e),
                );
                Err(e)
            }
        }
    }

    /// Delete a record and remove it from the local list
    ///
    /// Does not refetch and does not toggle `is_loading`.
    pub async fn delete(&self, id: ArchiveId) -> Result<(), TransportError> {
        match self.api.delete(id).await {
            Ok(()) => {
                info!("Deleted arsip {}", id);
                self.state
                    .send_modify(|state| state.records.retain(|record| record.id != id));
                Ok(())
            }
            Err(e) => {
                self.record_error(
                    Operation::Delete,
                    format!("Failed to delete arsip with ID {}: {}", id, e),
                );
                Err(e)
            }
        }
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        LoadingGuard::new(&self.state, &self.in_flight)
    }

    fn record_error(&self, operation: Operation, message: String) {
        warn!("{}", message);
        self.state.send_modify(|state| {
            state.last_error = Some(ErrorInfo { operation, message });
        });
    }
}

/// Keeps `is_loading` set until dropped
struct LoadingGuard<'a> {
    state: &'a watch::Sender<StoreState>,
    in_flight: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<StoreState>, in_flight: &'a AtomicUsize) -> Self {
        state.send_if_modified(|state| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            !std::mem::replace(&mut state.is_loading, true)
        });
        Self { state, in_flight }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let in_flight = self.in_flight;
        self.state.send_if_modified(|state| {
            let remaining = in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            if remaining == 0 && state.is_loading {
                state.is_loading = false;
                true
            } else {
                false
            }
        });
    }
}

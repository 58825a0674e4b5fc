//! Remote archive client
//!
//! The `ArchiveApi` trait is the seam between the synchronization store and
//! the backend. `HttpArchiveClient` is the production implementation; tests
//! substitute an in-memory one.
//!
//! The client is a pass-through adapter: no retries, no caching, and no
//! timeout beyond what the HTTP transport applies by default.

mod error;
mod http;

use std::future::Future;

pub use error::TransportError;
pub use http::HttpArchiveClient;

use crate::models::{ArchiveId, ArchiveInput, ArchiveRecord};

/// CRUD operations against the `/arsip/` resource collection
pub trait ArchiveApi: Send + Sync {
    /// Retrieve the record collection, optionally with query parameters
    fn list_all(
        &self,
        query: &ListQuery,
    ) -> impl Future<Output = Result<Vec<ArchiveRecord>, TransportError>> + Send;

    /// Create a record; the backend assigns its id
    fn create(
        &self,
        input: &ArchiveInput,
    ) -> impl Future<Output = Result<ArchiveRecord, TransportError>> + Send;

    /// Replace the record with the given id
    fn update(
        &self,
        id: ArchiveId,
        input: &ArchiveInput,
    ) -> impl Future<Output = Result<ArchiveRecord, TransportError>> + Send;

    /// Delete the record with the given id
    fn delete(&self, id: ArchiveId) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Query parameters forwarded verbatim on list requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    params: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter (builder style)
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

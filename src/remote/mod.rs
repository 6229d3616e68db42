//! Remote table access.
//!
//! `RemoteTableClient` is the seam between the reconciliation engine and the
//! hosted table. `HttpTableClient` talks to the real service; `InMemoryTable`
//! stands in for it in tests and demos.

pub mod config;
pub mod http;
pub mod memory;

use crate::core::{ItemFields, ItemId, RawRecord, RecordUpdate, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

pub use config::RemoteConfig;
pub use http::HttpTableClient;
pub use memory::InMemoryTable;

/// Remote operations, used for logging and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    FetchAll,
    Create,
    Update,
    Destroy,
}

impl fmt::Display for RemoteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteOp::FetchAll => "fetch_all",
            RemoteOp::Create => "create",
            RemoteOp::Update => "update",
            RemoteOp::Destroy => "destroy",
        };
        f.write_str(name)
    }
}

/// CRUD against a named remote table.
///
/// Every write is all-or-nothing from the caller's point of view: an `Err`
/// means the caller must not apply any part of the change locally.
#[async_trait]
pub trait RemoteTableClient: Send + Sync {
    /// Every record in the table.
    async fn fetch_all(&self) -> Result<Vec<RawRecord>>;

    /// Create one record. The server assigns the id and defaults `paid`.
    async fn create(&self, fields: ItemFields) -> Result<RawRecord>;

    /// Batch update by id.
    async fn update(&self, updates: Vec<RecordUpdate>) -> Result<Vec<RawRecord>>;

    /// Batch delete by id.
    async fn destroy(&self, ids: Vec<ItemId>) -> Result<()>;
}

#[async_trait]
impl<T: RemoteTableClient + ?Sized> RemoteTableClient for Arc<T> {
    async fn fetch_all(&self) -> Result<Vec<RawRecord>> {
        (**self).fetch_all().await
    }

    async fn create(&self, fields: ItemFields) -> Result<RawRecord> {
        (**self).create(fields).await
    }

    async fn update(&self, updates: Vec<RecordUpdate>) -> Result<Vec<RawRecord>> {
        (**self).update(updates).await
    }

    async fn destroy(&self, ids: Vec<ItemId>) -> Result<()> {
        (**self).destroy(ids).await
    }
}

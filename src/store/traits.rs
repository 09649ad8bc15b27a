//! Storage trait definitions
//!
//! The listing engine only needs one capability from a backend: a combined
//! count-plus-window read over an equality-filtered, ordered collection.
//! Anything that can answer [`ListStore::find_and_count`] can sit behind the
//! engine; `MemoryStore` is the reference implementation.

use async_trait::async_trait;

use crate::domain::{ListResult, Listable};
use crate::shared::{FilterSet, SortOrder};

/// Ordering requested from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderBy {
    /// Explicit field ordering.
    Field(String, SortOrder),
    /// Default ordering: last-modified descending.
    LastModified,
}

/// One logical read: filters, ordering, and the page window.
#[derive(Debug, Clone)]
pub struct StoreQuery {
    pub filters: FilterSet,
    pub order: OrderBy,
    pub skip: u64,
    pub take: u64,
    /// Relation names to eager-load alongside each record. Backends that
    /// embed related data may ignore the hints.
    pub relations: Vec<String>,
}

/// Storage trait for paginated reads.
#[async_trait]
pub trait ListStore<T: Listable>: Send + Sync {
    /// Fetch the requested window together with the total count of matching
    /// rows, from one consistent snapshot. Cross-call consistency is not
    /// guaranteed if the collection mutates between calls.
    async fn find_and_count(&self, query: &StoreQuery) -> ListResult<(Vec<T>, u64)>;
}

//! Record trait for paginated listings

use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::shared::FieldValue;

/// A record type that can appear in a paginated listing.
///
/// The key doubles as the deterministic secondary sort key, so pagination
/// stays stable when several rows share a last-modified timestamp.
pub trait Listable: Clone + Send + Sync + 'static {
    type Key: Ord + Eq + Hash + Clone + Debug + Send + Sync + 'static;

    /// Entity name used in errors and logs.
    fn entity() -> &'static str;

    fn key(&self) -> Self::Key;

    /// Last-modified timestamp, the default ordering criterion.
    fn updated_at(&self) -> DateTime<Utc>;

    /// Named-field access for filtering and sorting. Returns `None` for
    /// unknown fields.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Fields accepted as an explicit `sort_by` target.
    fn sortable_fields() -> &'static [&'static str];

    /// Whether this record satisfies `field == value`.
    ///
    /// The default is plain equality on [`Listable::field`]; a record type
    /// may widen the semantics of specific keys (e.g. a `search` key that
    /// matches substrings across several fields).
    fn matches(&self, field: &str, value: &FieldValue) -> bool {
        self.field(field).is_some_and(|v| v == *value)
    }
}

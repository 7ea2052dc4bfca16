pub mod bucket;
pub mod snapshot;
pub mod radix;
pub mod suffix_tree;
pub mod common;
pub mod hash;
pub mod trie_index;
pub mod radix_index;
pub mod reversed;
pub mod suffix_index;
pub mod compound;

use crate::attribute::attribute::AttributeRef;
use crate::attribute::compound::CompoundAttribute;
use crate::core::error::Result;
use crate::core::stats::IndexStats;
use crate::core::types::IndexedObject;
use crate::query::ast::Query;
use crate::query::options::QueryOptions;
use crate::search::results::ResultSet;

/// What an index is built over
pub enum IndexedAttribute<O> {
    Single(AttributeRef<O>),
    Compound(CompoundAttribute<O>),
}

impl<O> IndexedAttribute<O> {
    pub fn name(&self) -> &str {
        match self {
            IndexedAttribute::Single(attribute) => attribute.name(),
            IndexedAttribute::Compound(attribute) => attribute.name(),
        }
    }
}

/// An attribute index.
///
/// Maintenance calls (`notify_*`, `init`) and `retrieve` may run concurrently
/// from any number of threads without external locking.
pub trait Index<O: IndexedObject>: Send + Sync {
    fn attribute(&self) -> IndexedAttribute<O>;

    /// Every index here accepts incremental maintenance
    fn is_mutable(&self) -> bool {
        true
    }

    fn supports_query(&self, query: &Query<O>) -> bool;

    /// Lazy view over the matching buckets.
    /// Fails with `UnsupportedQuery` when `supports_query` would return false.
    fn retrieve(&self, query: &Query<O>, options: &QueryOptions) -> Result<ResultSet<O>>;

    /// Returns true if any bucket changed
    fn notify_objects_added(&self, objects: &[O]) -> bool;

    fn notify_objects_removed(&self, objects: &[O]) -> bool;

    /// Drop every entry by swapping in a fresh structure
    fn notify_objects_cleared(&self);

    /// Bulk-load an initial collection
    fn init(&self, objects: &[O]);

    fn stats(&self) -> IndexStats;
}

/// Per-key view of an index's contents
pub trait KeyStatistics<K> {
    fn distinct_keys(&self) -> Vec<K>;

    fn count_for_key(&self, key: &K) -> usize;

    fn key_count(&self) -> usize;
}

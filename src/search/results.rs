use std::sync::Arc;
use crate::core::types::IndexedObject;
use crate::index::bucket::StoredBucket;
use crate::query::ast::Query;

/// Shape of a result view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Empty,
    Stored,     // One key, at most one bucket
    UnionAll,   // Concatenation, duplicates possible
    Union,      // Duplicates eliminated lazily
    Filtered,   // Bucket re-checked against the original query (quantized indexes)
}

/// Finds the bucket under one key, against the snapshot the view pinned
pub type KeyLookup<O> = Box<dyn Fn() -> Option<Arc<StoredBucket<O>>> + Send + Sync>;

/// Finds every bucket whose key satisfies a string predicate
pub type KeysLookup<O> = Box<dyn Fn() -> Vec<Arc<StoredBucket<O>>> + Send + Sync>;

enum Source<O: IndexedObject> {
    Empty,
    Stored(KeyLookup<O>),
    UnionAll(KeysLookup<O>),
    Union(KeysLookup<O>),
    Filtered { inner: Box<ResultSet<O>>, query: Query<O> },
}

/// Lazy, read-only view over what an index holds for one query.
///
/// Nothing is resolved at retrieval time. Every call to `iter`, `contains`,
/// `size` or `merge_cost` looks the key (or fragment) up again in the index
/// snapshot taken by `retrieve`, so the view follows later adds and removes,
/// including buckets created or collected after it was made. A clear swaps
/// the snapshot out from under the index, not the view: views taken before
/// it keep reading the old buckets.
pub struct ResultSet<O: IndexedObject> {
    source: Source<O>,
    retrieval_cost: usize,
}

impl<O: IndexedObject> ResultSet<O> {
    pub fn empty(retrieval_cost: usize) -> Self {
        ResultSet { source: Source::Empty, retrieval_cost }
    }

    pub fn stored<F>(lookup: F, retrieval_cost: usize) -> Self
    where
        F: Fn() -> Option<Arc<StoredBucket<O>>> + Send + Sync + 'static,
    {
        ResultSet { source: Source::Stored(Box::new(lookup)), retrieval_cost }
    }

    pub fn union_all<F>(lookup: F, retrieval_cost: usize) -> Self
    where
        F: Fn() -> Vec<Arc<StoredBucket<O>>> + Send + Sync + 'static,
    {
        ResultSet { source: Source::UnionAll(Box::new(lookup)), retrieval_cost }
    }

    pub fn union<F>(lookup: F, retrieval_cost: usize) -> Self
    where
        F: Fn() -> Vec<Arc<StoredBucket<O>>> + Send + Sync + 'static,
    {
        ResultSet { source: Source::Union(Box::new(lookup)), retrieval_cost }
    }

    /// Keep only the objects of `inner` that match `query`; costs are inherited
    pub fn filtered(inner: ResultSet<O>, query: Query<O>) -> Self {
        let retrieval_cost = inner.retrieval_cost;
        ResultSet {
            source: Source::Filtered { inner: Box::new(inner), query },
            retrieval_cost,
        }
    }

    pub fn kind(&self) -> ResultKind {
        match &self.source {
            Source::Empty => ResultKind::Empty,
            Source::Stored(_) => ResultKind::Stored,
            Source::UnionAll(_) => ResultKind::UnionAll,
            Source::Union(_) => ResultKind::Union,
            Source::Filtered { .. } => ResultKind::Filtered,
        }
    }

    /// Walks the members each bucket had when the walk reached it.
    /// No lock is held between items: the index may be modified from inside the loop.
    pub fn iter(&self) -> Box<dyn Iterator<Item = O> + '_> {
        match &self.source {
            Source::Empty => Box::new(std::iter::empty()),
            Source::Stored(lookup) => match lookup() {
                Some(bucket) => Box::new(bucket.iter()),
                None => Box::new(std::iter::empty()),
            },
            Source::UnionAll(lookup) => Box::new(lookup().into_iter().flat_map(|bucket| bucket.iter())),
            Source::Union(lookup) => {
                let buckets = Arc::new(lookup());
                Box::new((0..buckets.len()).flat_map(move |i| {
                    // Yield from bucket i only what no earlier bucket holds
                    let buckets = buckets.clone();
                    buckets[i]
                        .iter()
                        .filter(move |object| !buckets[..i].iter().any(|earlier| earlier.contains(object)))
                }))
            }
            Source::Filtered { inner, query } => {
                Box::new(inner.iter().filter(move |object| query.matches(object)))
            }
        }
    }

    pub fn contains(&self, object: &O) -> bool {
        match &self.source {
            Source::Empty => false,
            Source::Stored(lookup) => lookup().is_some_and(|bucket| bucket.contains(object)),
            Source::UnionAll(lookup) | Source::Union(lookup) => {
                lookup().iter().any(|bucket| bucket.contains(object))
            }
            Source::Filtered { inner, query } => inner.contains(object) && query.matches(object),
        }
    }

    /// Number of objects iteration would yield (duplicates included for UnionAll)
    pub fn size(&self) -> usize {
        match &self.source {
            Source::Empty => 0,
            Source::Stored(lookup) => lookup().map(|bucket| bucket.len()).unwrap_or(0),
            Source::UnionAll(lookup) => lookup().iter().map(|bucket| bucket.len()).sum(),
            Source::Union(_) | Source::Filtered { .. } => self.iter().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn retrieval_cost(&self) -> usize {
        self.retrieval_cost
    }

    /// Upper bound on the elements a merge would have to examine.
    /// Filtering and dedup are not credited: the raw bucket sizes count.
    pub fn merge_cost(&self) -> usize {
        match &self.source {
            Source::Empty => 0,
            Source::Stored(lookup) => lookup().map(|bucket| bucket.len()).unwrap_or(0),
            Source::UnionAll(lookup) | Source::Union(lookup) => {
                lookup().iter().map(|bucket| bucket.len()).sum()
            }
            Source::Filtered { inner, .. } => inner.merge_cost(),
        }
    }
}

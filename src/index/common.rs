use dashmap::DashMap;
use parking_lot::RwLock;
use rayon::prelude::*;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use crate::core::config::IndexConfig;
use crate::core::stats::IndexStats;
use crate::core::types::IndexedObject;
use crate::index::bucket::StoredBucket;
use crate::index::radix::StringTree;
use crate::query::options::{DeduplicationOption, QueryOptions};
use crate::search::results::ResultSet;

/// Key -> bucket map that tolerates concurrent writers.
///
/// Implemented for `DashMap` (sharded, no global lock) and for any
/// `StringTree` behind a `RwLock` (readers share, writers take turns).
pub trait BucketStore<K: ?Sized, O: IndexedObject>: Send + Sync {
    fn bucket(&self, key: &K) -> Option<Arc<StoredBucket<O>>>;

    /// Atomic insert-if-absent. Returns whichever bucket ended up in the map;
    /// if another writer got there first, `candidate` is dropped.
    fn bucket_or_insert(&self, key: &K, candidate: Arc<StoredBucket<O>>) -> Arc<StoredBucket<O>>;

    /// Drop the entry for `key` if its bucket is empty at this instant
    fn remove_if_empty(&self, key: &K) -> bool;

    fn key_count(&self) -> usize;

    fn buckets(&self) -> Vec<Arc<StoredBucket<O>>>;
}

impl<K, O> BucketStore<K, O> for DashMap<K, Arc<StoredBucket<O>>>
where
    K: Eq + Hash + Clone + Send + Sync,
    O: IndexedObject,
{
    fn bucket(&self, key: &K) -> Option<Arc<StoredBucket<O>>> {
        self.get(key).map(|entry| entry.value().clone())
    }

    fn bucket_or_insert(&self, key: &K, candidate: Arc<StoredBucket<O>>) -> Arc<StoredBucket<O>> {
        self.entry(key.clone()).or_insert(candidate).value().clone()
    }

    fn remove_if_empty(&self, key: &K) -> bool {
        self.remove_if(key, |_, bucket| bucket.is_empty()).is_some()
    }

    fn key_count(&self) -> usize {
        self.len()
    }

    fn buckets(&self) -> Vec<Arc<StoredBucket<O>>> {
        self.iter().map(|entry| entry.value().clone()).collect()
    }
}

impl<T, O> BucketStore<str, O> for RwLock<T>
where
    T: StringTree<Arc<StoredBucket<O>>>,
    O: IndexedObject,
{
    fn bucket(&self, key: &str) -> Option<Arc<StoredBucket<O>>> {
        self.read().get(key).cloned()
    }

    fn bucket_or_insert(&self, key: &str, candidate: Arc<StoredBucket<O>>) -> Arc<StoredBucket<O>> {
        self.write().get_or_insert_with(key, || candidate).clone()
    }

    fn remove_if_empty(&self, key: &str) -> bool {
        let mut tree = self.write();
        let empty = tree.get(key).map(|bucket| bucket.is_empty()).unwrap_or(false);
        empty && tree.remove(key).is_some()
    }

    fn key_count(&self) -> usize {
        self.read().len()
    }

    fn buckets(&self) -> Vec<Arc<StoredBucket<O>>> {
        self.read().values().into_iter().cloned().collect()
    }
}

/// Add `object` under `key`, creating the bucket on first use.
///
/// Lookup first; on a miss build a candidate and race to publish it.
/// The loser adopts the winner's bucket, so no object is ever written
/// into a bucket that is not in the map.
pub fn add_to_store<K, O, S>(store: &S, key: &K, object: O) -> bool
where
    K: fmt::Debug + ?Sized,
    O: IndexedObject,
    S: BucketStore<K, O> + ?Sized,
{
    let bucket = match store.bucket(key) {
        Some(bucket) => bucket,
        None => {
            let candidate = Arc::new(StoredBucket::new());
            let winner = store.bucket_or_insert(key, candidate.clone());
            if !Arc::ptr_eq(&winner, &candidate) {
                tracing::trace!("Lost bucket creation race for key {:?}, adopting existing bucket", key);
            }
            winner
        }
    };
    bucket.add(object)
}

/// Remove `object` from the bucket under `key` and collect the bucket if it emptied.
/// A concurrent add into a bucket that is being collected may be lost; callers accept this.
pub fn remove_from_store<K, O, S>(store: &S, key: &K, object: &O) -> bool
where
    K: fmt::Debug + ?Sized,
    O: IndexedObject,
    S: BucketStore<K, O> + ?Sized,
{
    let Some(bucket) = store.bucket(key) else {
        return false;
    };
    let removed = bucket.remove(object);
    if bucket.is_empty() && store.remove_if_empty(key) {
        tracing::trace!("Collected empty bucket for key {:?}", key);
    }
    removed
}

/// View over every bucket `lookup` finds for one query.
///
/// Duplicates are only eliminated when the caller asked for it and the
/// attribute can actually produce them (multi-valued).
pub fn union_results<O, F>(lookup: F, retrieval_cost: usize, single_valued: bool, options: &QueryOptions) -> ResultSet<O>
where
    O: IndexedObject,
    F: Fn() -> Vec<Arc<StoredBucket<O>>> + Send + Sync + 'static,
{
    if DeduplicationOption::is_logical_elimination(options) && !single_valued {
        ResultSet::union(lookup, retrieval_cost)
    } else {
        ResultSet::union_all(lookup, retrieval_cost)
    }
}

/// Bulk add for `init`. Large collections are split into batches and indexed
/// on a dedicated rayon pool; the add path is already safe for concurrent writers.
pub fn bulk_add<O, F>(config: &IndexConfig, index_name: &str, objects: &[O], add: F)
where
    O: IndexedObject,
    F: Fn(&[O]) + Send + Sync,
{
    if objects.len() < config.parallel_init_threshold {
        tracing::debug!("Initializing {} with {} objects", index_name, objects.len());
        add(objects);
        return;
    }

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.init_workers)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::debug!("Could not build init pool ({}), indexing {} sequentially", e, index_name);
            add(objects);
            return;
        }
    };

    let batch_size = config.init_batch_size.max(1);
    tracing::debug!(
        "Initializing {} with {} objects in parallel ({} workers, batches of {})",
        index_name,
        objects.len(),
        config.init_workers,
        batch_size
    );
    pool.install(|| {
        objects.par_chunks(batch_size).for_each(|batch| add(batch));
    });
}

/// Statistics shared by every index kind
pub fn collect_stats<K, O, S>(store: &S, index_type: &str, attribute: &str, retrieval_cost: usize) -> IndexStats
where
    K: ?Sized,
    O: IndexedObject,
    S: BucketStore<K, O> + ?Sized,
{
    let buckets = store.buckets();
    IndexStats {
        index_type: index_type.to_string(),
        attribute: attribute.to_string(),
        distinct_keys: buckets.len(),
        total_entries: buckets.iter().map(|bucket| bucket.len()).sum(),
        retrieval_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;
    use crate::index::radix::RadixTree;
    use crate::search::results::ResultKind;

    #[test]
    fn test_add_remove_round_trip_on_dashmap() {
        let store: DashMap<Value, Arc<StoredBucket<u32>>> = DashMap::new();
        let key = Value::from("Civic");

        assert!(add_to_store(&store, &key, 1));
        assert!(add_to_store(&store, &key, 2));
        assert!(!add_to_store(&store, &key, 2));
        assert_eq!(store.key_count(), 1);

        assert!(remove_from_store(&store, &key, &1));
        assert_eq!(store.key_count(), 1);
        assert!(remove_from_store(&store, &key, &2));
        assert_eq!(store.key_count(), 0);
        assert!(!remove_from_store(&store, &key, &2));
    }

    #[test]
    fn test_add_remove_round_trip_on_tree() {
        let store: RwLock<RadixTree<Arc<StoredBucket<u32>>>> = RwLock::new(RadixTree::new());

        add_to_store(&store, "Civic", 1);
        add_to_store(&store, "Civ", 2);
        assert_eq!(store.key_count(), 2);

        remove_from_store(&store, "Civic", &1);
        remove_from_store(&store, "Civ", &2);
        assert_eq!(store.key_count(), 0);
        assert!(store.buckets().is_empty());
    }

    #[test]
    fn test_losing_candidate_is_discarded() {
        let store: DashMap<Value, Arc<StoredBucket<u32>>> = DashMap::new();
        let key = Value::Integer(7);

        let first = Arc::new(StoredBucket::new());
        let second = Arc::new(StoredBucket::new());
        let winner = store.bucket_or_insert(&key, first.clone());
        let adopted = store.bucket_or_insert(&key, second.clone());

        assert!(Arc::ptr_eq(&winner, &first));
        assert!(Arc::ptr_eq(&adopted, &first));
        assert_eq!(Arc::strong_count(&second), 1);
    }

    #[test]
    fn test_remove_if_empty_keeps_populated_bucket() {
        let store: DashMap<Value, Arc<StoredBucket<u32>>> = DashMap::new();
        let key = Value::from("Focus");
        add_to_store(&store, &key, 1);
        assert!(!store.remove_if_empty(&key));
        assert_eq!(store.key_count(), 1);
    }

    #[test]
    fn test_union_selection() {
        let buckets: Vec<Arc<StoredBucket<u32>>> = (0..2)
            .map(|i| {
                let bucket = StoredBucket::new();
                bucket.add(i);
                bucket.add(10);
                Arc::new(bucket)
            })
            .collect();
        let lookup = move || buckets.clone();
        let dedup = QueryOptions::new().with(DeduplicationOption::logical_elimination());
        let none = QueryOptions::new();

        let distinct = union_results(lookup.clone(), 50, false, &dedup);
        assert_eq!(distinct.kind(), ResultKind::Union);
        assert_eq!(distinct.size(), 3);
        assert_eq!(distinct.merge_cost(), 4);

        assert_eq!(union_results(lookup.clone(), 50, true, &dedup).kind(), ResultKind::UnionAll);
        let all = union_results(lookup, 50, false, &none);
        assert_eq!(all.kind(), ResultKind::UnionAll);
        assert_eq!(all.size(), 4);
        assert_eq!(union_results(Vec::<Arc<StoredBucket<u32>>>::new, 50, false, &dedup).size(), 0);
    }

    #[test]
    fn test_union_follows_the_store() {
        let store: Arc<RwLock<RadixTree<Arc<StoredBucket<u32>>>>> = Arc::new(RwLock::new(RadixTree::new()));
        let view = {
            let store = store.clone();
            union_results(
                move || store.read().values_with_prefix("Ci").into_iter().cloned().collect(),
                50,
                true,
                &QueryOptions::new(),
            )
        };
        assert!(view.is_empty());

        add_to_store(&*store, "Civic", 1);
        add_to_store(&*store, "Cirrus", 2);
        add_to_store(&*store, "Focus", 3);
        assert_eq!(view.size(), 2);

        remove_from_store(&*store, "Civic", &1);
        assert_eq!(store.key_count(), 2);
        assert!(!view.contains(&1));
        assert_eq!(view.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_bulk_add_parallel_covers_every_object() {
        let store: DashMap<Value, Arc<StoredBucket<u32>>> = DashMap::new();
        let config = IndexConfig {
            parallel_init_threshold: 100,
            init_batch_size: 7,
            init_workers: 4,
            ..Default::default()
        };
        let objects: Vec<u32> = (0..1000).collect();

        bulk_add(&config, "test", &objects, |batch| {
            for object in batch {
                add_to_store(&store, &Value::Integer((*object % 10) as i64), *object);
            }
        });

        let stats = collect_stats(&store, "HashIndex", "n", 30);
        assert_eq!(stats.distinct_keys, 10);
        assert_eq!(stats.total_entries, 1000);
    }
}

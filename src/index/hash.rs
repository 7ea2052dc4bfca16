use dashmap::DashMap;
use std::sync::Arc;
use crate::attribute::attribute::{same_attribute, AttributeRef};
use crate::core::config::IndexConfig;
use crate::core::error::{Error, Result};
use crate::core::stats::IndexStats;
use crate::core::types::{IndexedObject, Value};
use crate::index::bucket::StoredBucket;
use crate::index::common::{add_to_store, bulk_add, collect_stats, remove_from_store, BucketStore};
use crate::index::snapshot::SnapshotHandle;
use crate::index::{Index, IndexedAttribute, KeyStatistics};
use crate::quantizer::QuantizerRef;
use crate::query::ast::Query;
use crate::query::options::QueryOptions;
use crate::search::results::ResultSet;

const INDEX_RETRIEVAL_COST: usize = 30;

type Store<O> = DashMap<Value, Arc<StoredBucket<O>>>;

/// Exact-match index: one bucket per (optionally quantized) attribute value
pub struct HashIndex<O: IndexedObject> {
    attribute: AttributeRef<O>,
    quantizer: Option<QuantizerRef<Value>>,
    buckets: SnapshotHandle<Store<O>>,
    config: IndexConfig,
}

impl<O: IndexedObject> HashIndex<O> {
    pub fn on_attribute(attribute: AttributeRef<O>) -> Self {
        Self::build(attribute, None, IndexConfig::default())
    }

    /// Values are quantized before they reach the map; retrieval re-checks
    /// the original query so results stay exact.
    pub fn with_quantizer_on_attribute(quantizer: QuantizerRef<Value>, attribute: AttributeRef<O>) -> Self {
        Self::build(attribute, Some(quantizer), IndexConfig::default())
    }

    /// Replace the config. Call before adding objects: the backing map is recreated.
    pub fn with_config(self, config: IndexConfig) -> Self {
        Self::build(self.attribute, self.quantizer, config)
    }

    fn build(attribute: AttributeRef<O>, quantizer: Option<QuantizerRef<Value>>, config: IndexConfig) -> Self {
        HashIndex {
            attribute,
            quantizer,
            buckets: SnapshotHandle::new(Self::new_store(&config)),
            config,
        }
    }

    fn new_store(config: &IndexConfig) -> Store<O> {
        DashMap::with_capacity(config.initial_capacity)
    }

    pub fn is_quantized(&self) -> bool {
        self.quantizer.is_some()
    }

    fn key_for(&self, value: &Value) -> Value {
        match &self.quantizer {
            Some(quantizer) => quantizer.quantized(value),
            None => value.clone(),
        }
    }

    fn add_all(&self, store: &Store<O>, objects: &[O]) -> bool {
        let mut modified = false;
        for object in objects {
            for value in self.attribute.values(object) {
                modified |= add_to_store(store, &self.key_for(&value), object.clone());
            }
        }
        modified
    }
}

impl<O: IndexedObject> Index<O> for HashIndex<O> {
    fn attribute(&self) -> IndexedAttribute<O> {
        IndexedAttribute::Single(self.attribute.clone())
    }

    fn supports_query(&self, query: &Query<O>) -> bool {
        matches!(query, Query::Equal(q) if same_attribute(&q.attribute, &self.attribute))
    }

    fn retrieve(&self, query: &Query<O>, _options: &QueryOptions) -> Result<ResultSet<O>> {
        match query {
            Query::Equal(equal) if same_attribute(&equal.attribute, &self.attribute) => {
                let store = self.buckets.load();
                let key = self.key_for(&equal.value);
                let result = ResultSet::stored(move || store.bucket(&key), INDEX_RETRIEVAL_COST);
                if self.is_quantized() {
                    Ok(ResultSet::filtered(result, query.clone()))
                } else {
                    Ok(result)
                }
            }
            _ => Err(Error::unsupported_query(query)),
        }
    }

    fn notify_objects_added(&self, objects: &[O]) -> bool {
        let store = self.buckets.load();
        self.add_all(&store, objects)
    }

    fn notify_objects_removed(&self, objects: &[O]) -> bool {
        let store = self.buckets.load();
        let mut modified = false;
        for object in objects {
            for value in self.attribute.values(object) {
                modified |= remove_from_store(&*store, &self.key_for(&value), object);
            }
        }
        modified
    }

    fn notify_objects_cleared(&self) {
        self.buckets.replace(Self::new_store(&self.config));
        tracing::debug!("Cleared HashIndex on {}", self.attribute.name());
    }

    fn init(&self, objects: &[O]) {
        let store = self.buckets.load();
        let name = format!("HashIndex on {}", self.attribute.name());
        bulk_add(&self.config, &name, objects, |batch| {
            self.add_all(&store, batch);
        });
    }

    fn stats(&self) -> IndexStats {
        let store = self.buckets.load();
        collect_stats(&*store, "HashIndex", self.attribute.name(), INDEX_RETRIEVAL_COST)
    }
}

impl<O: IndexedObject> KeyStatistics<Value> for HashIndex<O> {
    fn distinct_keys(&self) -> Vec<Value> {
        self.buckets.load().iter().map(|entry| entry.key().clone()).collect()
    }

    fn count_for_key(&self, key: &Value) -> usize {
        self.buckets.load().bucket(key).map(|bucket| bucket.len()).unwrap_or(0)
    }

    fn key_count(&self) -> usize {
        self.buckets.load().len()
    }
}

use dashmap::DashMap;
use std::sync::Arc;
use crate::attribute::attribute::AttributeRef;
use crate::attribute::compound::{CompoundAttribute, CompoundValueTuple};
use crate::core::config::IndexConfig;
use crate::core::error::{Error, Result};
use crate::core::stats::IndexStats;
use crate::core::types::IndexedObject;
use crate::index::bucket::StoredBucket;
use crate::index::common::{add_to_store, bulk_add, collect_stats, remove_from_store, BucketStore};
use crate::index::snapshot::SnapshotHandle;
use crate::index::{Index, IndexedAttribute, KeyStatistics};
use crate::quantizer::QuantizerRef;
use crate::query::ast::{CompoundQuery, Query};
use crate::query::options::QueryOptions;
use crate::search::results::ResultSet;

const INDEX_RETRIEVAL_COST: usize = 20;

type Store<O> = DashMap<CompoundValueTuple, Arc<StoredBucket<O>>>;

/// Index over the value tuples of a compound attribute.
///
/// Answers compound queries on exactly the same ordered attribute list, and
/// `and` queries made only of `equal` children that cover that list.
pub struct CompoundIndex<O: IndexedObject> {
    attribute: CompoundAttribute<O>,
    quantizer: Option<QuantizerRef<CompoundValueTuple>>,
    buckets: SnapshotHandle<Store<O>>,
    config: IndexConfig,
}

impl<O: IndexedObject> CompoundIndex<O> {
    pub fn on_attribute(attribute: CompoundAttribute<O>) -> Self {
        Self::build(attribute, None, IndexConfig::default())
    }

    pub fn on_attributes(attributes: Vec<AttributeRef<O>>) -> Result<Self> {
        Ok(Self::on_attribute(CompoundAttribute::new(attributes)?))
    }

    pub fn with_quantizer_on_attributes(
        quantizer: QuantizerRef<CompoundValueTuple>,
        attributes: Vec<AttributeRef<O>>,
    ) -> Result<Self> {
        let attribute = CompoundAttribute::new(attributes)?;
        Ok(Self::build(attribute, Some(quantizer), IndexConfig::default()))
    }

    /// Replace the config. Call before adding objects: the backing map is recreated.
    pub fn with_config(self, config: IndexConfig) -> Self {
        Self::build(self.attribute, self.quantizer, config)
    }

    fn build(
        attribute: CompoundAttribute<O>,
        quantizer: Option<QuantizerRef<CompoundValueTuple>>,
        config: IndexConfig,
    ) -> Self {
        CompoundIndex {
            attribute,
            quantizer,
            buckets: SnapshotHandle::new(Self::new_store(&config)),
            config,
        }
    }

    fn new_store(config: &IndexConfig) -> Store<O> {
        DashMap::with_capacity(config.initial_capacity)
    }

    pub fn compound_attribute(&self) -> &CompoundAttribute<O> {
        &self.attribute
    }

    pub fn is_quantized(&self) -> bool {
        self.quantizer.is_some()
    }

    fn key_for(&self, tuple: &CompoundValueTuple) -> CompoundValueTuple {
        match &self.quantizer {
            Some(quantizer) => quantizer.quantized(tuple),
            None => tuple.clone(),
        }
    }

    /// The compound query a supported query reduces to
    fn as_compound_query(&self, query: &Query<O>) -> Option<CompoundQuery<O>> {
        match query {
            Query::Compound(q) if q.attribute == self.attribute => Some(CompoundQuery {
                attribute: q.attribute.clone(),
                tuple: q.tuple.clone(),
            }),
            Query::And(and) => CompoundQuery::from_and(&self.attribute, and),
            _ => None,
        }
    }

    fn add_all(&self, store: &Store<O>, objects: &[O]) -> bool {
        let mut modified = false;
        for object in objects {
            for tuple in self.attribute.tuples(object) {
                modified |= add_to_store(store, &self.key_for(&tuple), object.clone());
            }
        }
        modified
    }
}

impl<O: IndexedObject> Index<O> for CompoundIndex<O> {
    fn attribute(&self) -> IndexedAttribute<O> {
        IndexedAttribute::Compound(self.attribute.clone())
    }

    fn supports_query(&self, query: &Query<O>) -> bool {
        self.as_compound_query(query).is_some()
    }

    fn retrieve(&self, query: &Query<O>, _options: &QueryOptions) -> Result<ResultSet<O>> {
        let Some(compound) = self.as_compound_query(query) else {
            return Err(Error::unsupported_query(query));
        };

        let store = self.buckets.load();
        let key = self.key_for(&compound.tuple);
        let result = ResultSet::stored(move || store.bucket(&key), INDEX_RETRIEVAL_COST);
        if self.is_quantized() {
            Ok(ResultSet::filtered(result, query.clone()))
        } else {
            Ok(result)
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
            for tuple in self.attribute.tuples(object) {
                modified |= remove_from_store(&*store, &self.key_for(&tuple), object);
            }
        }
        modified
    }

    fn notify_objects_cleared(&self) {
        self.buckets.replace(Self::new_store(&self.config));
        tracing::debug!("Cleared CompoundIndex on {}", self.attribute.name());
    }

    fn init(&self, objects: &[O]) {
        let store = self.buckets.load();
        let name = format!("CompoundIndex on {}", self.attribute.name());
        bulk_add(&self.config, &name, objects, |batch| {
            self.add_all(&store, batch);
        });
    }

    fn stats(&self) -> IndexStats {
        let store = self.buckets.load();
        collect_stats(&*store, "CompoundIndex", self.attribute.name(), INDEX_RETRIEVAL_COST)
    }
}

impl<O: IndexedObject> KeyStatistics<CompoundValueTuple> for CompoundIndex<O> {
    fn distinct_keys(&self) -> Vec<CompoundValueTuple> {
        self.buckets.load().iter().map(|entry| entry.key().clone()).collect()
    }

    fn count_for_key(&self, key: &CompoundValueTuple) -> usize {
        self.buckets.load().bucket(key).map(|bucket| bucket.len()).unwrap_or(0)
    }

    fn key_count(&self) -> usize {
        self.buckets.load().len()
    }
}

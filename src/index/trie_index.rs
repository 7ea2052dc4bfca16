use parking_lot::RwLock;
use std::marker::PhantomData;
use std::sync::Arc;
use crate::attribute::attribute::{same_attribute, AttributeRef};
use crate::core::config::IndexConfig;
use crate::core::error::{Error, Result};
use crate::core::stats::IndexStats;
use crate::core::types::IndexedObject;
use crate::index::bucket::StoredBucket;
use crate::index::common::{add_to_store, bulk_add, collect_stats, remove_from_store, union_results, BucketStore};
use crate::index::radix::StringTree;
use crate::index::snapshot::SnapshotHandle;
use crate::index::{Index, IndexedAttribute, KeyStatistics};
use crate::query::ast::Query;
use crate::query::options::QueryOptions;
use crate::search::results::ResultSet;

/// String predicates that may match several keys of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMatch {
    StartsWith,
    EndsWith,
    Contains,
}

impl StringMatch {
    /// Predicate, attribute and fragment of a string query
    pub fn of<O>(query: &Query<O>) -> Option<(StringMatch, &AttributeRef<O>, &str)> {
        match query {
            Query::StringStartsWith(q) => Some((StringMatch::StartsWith, &q.attribute, q.value.as_str())),
            Query::StringEndsWith(q) => Some((StringMatch::EndsWith, &q.attribute, q.value.as_str())),
            Query::StringContains(q) => Some((StringMatch::Contains, &q.attribute, q.value.as_str())),
            _ => None,
        }
    }
}

/// What sets one tree-backed text index apart from another
pub trait TrieVariant<O: IndexedObject>: Send + Sync + 'static {
    type Tree: StringTree<Arc<StoredBucket<O>>> + Default + Send + Sync + 'static;

    const INDEX_TYPE: &'static str;
    const RETRIEVAL_COST: usize;

    fn supports(predicate: StringMatch) -> bool;

    /// Buckets of every key satisfying `predicate`. Unsupported predicates match nothing.
    fn buckets_matching(tree: &Self::Tree, predicate: StringMatch, fragment: &str) -> Vec<Arc<StoredBucket<O>>>;
}

type Store<O, V> = RwLock<<V as TrieVariant<O>>::Tree>;

/// Text index over a string tree.
///
/// Every variant answers text `Equal` with a single-key lookup; the string
/// predicates `V` supports become union views over the matching keys.
/// Non-text attribute values are not indexed.
pub struct TrieIndex<O: IndexedObject, V: TrieVariant<O>> {
    attribute: AttributeRef<O>,
    tree: SnapshotHandle<Store<O, V>>,
    config: IndexConfig,
    variant: PhantomData<V>,
}

impl<O: IndexedObject, V: TrieVariant<O>> TrieIndex<O, V> {
    pub fn on_attribute(attribute: AttributeRef<O>) -> Self {
        TrieIndex {
            attribute,
            tree: SnapshotHandle::new(RwLock::default()),
            config: IndexConfig::default(),
            variant: PhantomData,
        }
    }

    pub fn with_config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    fn add_all(&self, store: &Store<O, V>, objects: &[O]) -> bool {
        let mut modified = false;
        for object in objects {
            for value in self.attribute.values(object) {
                match value.as_text() {
                    Some(text) => modified |= add_to_store(store, text, object.clone()),
                    None => tracing::trace!("Skipping non-text value {} of {}", value, self.attribute.name()),
                }
            }
        }
        modified
    }
}

impl<O: IndexedObject, V: TrieVariant<O>> Index<O> for TrieIndex<O, V> {
    fn attribute(&self) -> IndexedAttribute<O> {
        IndexedAttribute::Single(self.attribute.clone())
    }

    fn supports_query(&self, query: &Query<O>) -> bool {
        if let Query::Equal(q) = query {
            return same_attribute(&q.attribute, &self.attribute) && q.value.is_text();
        }
        match StringMatch::of(query) {
            Some((predicate, attribute, _)) => V::supports(predicate) && same_attribute(attribute, &self.attribute),
            None => false,
        }
    }

    fn retrieve(&self, query: &Query<O>, options: &QueryOptions) -> Result<ResultSet<O>> {
        if !self.supports_query(query) {
            return Err(Error::unsupported_query(query));
        }
        let store = self.tree.load();

        if let Query::Equal(equal) = query {
            let Some(text) = equal.value.as_text() else {
                return Err(Error::unsupported_query(query));
            };
            let key = text.to_string();
            let lookup = move || BucketStore::<str, O>::bucket(&*store, key.as_str());
            return Ok(ResultSet::stored(lookup, V::RETRIEVAL_COST));
        }

        let Some((predicate, _, fragment)) = StringMatch::of(query) else {
            return Err(Error::unsupported_query(query));
        };
        let fragment = fragment.to_string();
        let lookup = move || V::buckets_matching(&store.read(), predicate, &fragment);
        Ok(union_results(lookup, V::RETRIEVAL_COST, self.attribute.is_single_valued(), options))
    }

    fn notify_objects_added(&self, objects: &[O]) -> bool {
        let store = self.tree.load();
        self.add_all(&store, objects)
    }

    fn notify_objects_removed(&self, objects: &[O]) -> bool {
        let store = self.tree.load();
        let mut modified = false;
        for object in objects {
            for value in self.attribute.values(object) {
                if let Some(text) = value.as_text() {
                    modified |= remove_from_store(&*store, text, object);
                }
            }
        }
        modified
    }

    fn notify_objects_cleared(&self) {
        self.tree.replace(RwLock::default());
        tracing::debug!("Cleared {} on {}", V::INDEX_TYPE, self.attribute.name());
    }

    fn init(&self, objects: &[O]) {
        let store = self.tree.load();
        let name = format!("{} on {}", V::INDEX_TYPE, self.attribute.name());
        bulk_add(&self.config, &name, objects, |batch| {
            self.add_all(&store, batch);
        });
    }

    fn stats(&self) -> IndexStats {
        let store = self.tree.load();
        collect_stats::<str, O, _>(&*store, V::INDEX_TYPE, self.attribute.name(), V::RETRIEVAL_COST)
    }
}

impl<O: IndexedObject, V: TrieVariant<O>> KeyStatistics<String> for TrieIndex<O, V> {
    fn distinct_keys(&self) -> Vec<String> {
        self.tree.load().read().keys()
    }

    fn count_for_key(&self, key: &String) -> usize {
        let store = self.tree.load();
        BucketStore::<str, O>::bucket(&*store, key.as_str()).map(|bucket| bucket.len()).unwrap_or(0)
    }

    fn key_count(&self) -> usize {
        self.tree.load().read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::attribute::{multi, simple};
    use crate::core::types::Value;
    use crate::index::radix_index::PrefixTrie;
    use crate::index::reversed::ReversedTrie;
    use crate::index::suffix_index::SuffixTrie;
    use crate::query::factory::{contains, ends_with, equal, starts_with};

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Car {
        id: u32,
        model: &'static str,
    }

    fn fleet() -> Vec<Car> {
        vec![
            Car { id: 1, model: "Accord" },
            Car { id: 2, model: "Civic" },
            Car { id: 3, model: "Focus" },
        ]
    }

    fn shared_behaviour<V: TrieVariant<Car>>() {
        let model = simple("model", |c: &Car| Value::from(c.model));
        let index: TrieIndex<Car, V> = TrieIndex::on_attribute(model.clone()).with_config(IndexConfig::sequential());
        index.init(&fleet());

        let civic = index.retrieve(&equal(&model, "Civic"), &QueryOptions::new()).unwrap();
        assert_eq!(civic.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(civic.retrieval_cost(), V::RETRIEVAL_COST);
        assert!(!index.supports_query(&equal(&model, 7)));

        let stats = index.stats();
        assert_eq!(stats.index_type, V::INDEX_TYPE);
        assert_eq!(stats.distinct_keys, 3);

        let mut keys = index.distinct_keys();
        keys.sort();
        assert_eq!(keys, vec!["Accord", "Civic", "Focus"]);

        index.notify_objects_cleared();
        assert_eq!(index.key_count(), 0);
        assert_eq!(civic.size(), 1);
    }

    #[test]
    fn test_shared_behaviour_of_every_variant() {
        shared_behaviour::<PrefixTrie>();
        shared_behaviour::<ReversedTrie>();
        shared_behaviour::<SuffixTrie>();
    }

    #[test]
    fn test_string_match_of_query() {
        let model = simple("model", |c: &Car| Value::from(c.model));
        let binding = ends_with(&model, "ord");
        let (predicate, _, fragment) = StringMatch::of(&binding).unwrap();
        assert_eq!(predicate, StringMatch::EndsWith);
        assert_eq!(fragment, "ord");
        assert_eq!(StringMatch::of(&starts_with(&model, "A")).unwrap().0, StringMatch::StartsWith);
        assert_eq!(StringMatch::of(&contains(&model, "c")).unwrap().0, StringMatch::Contains);
        assert!(StringMatch::of(&equal(&model, "Accord")).is_none());
    }

    #[test]
    fn test_non_text_values_are_skipped() {
        let mixed = multi("mixed", |c: &Car| vec![Value::from(c.model), Value::Integer(c.id as i64)]);
        let index: TrieIndex<Car, SuffixTrie> = TrieIndex::on_attribute(mixed);
        index.init(&fleet());
        assert_eq!(index.key_count(), 3);
        assert_eq!(index.stats().total_entries, 3);
    }
}

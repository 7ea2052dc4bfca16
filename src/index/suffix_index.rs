use std::sync::Arc;
use crate::core::types::IndexedObject;
use crate::index::bucket::StoredBucket;
use crate::index::suffix_tree::SuffixTree;
use crate::index::trie_index::{StringMatch, TrieIndex, TrieVariant};

/// Substring and suffix lookups over a generalized suffix trie
pub struct SuffixTrie;

impl<O: IndexedObject> TrieVariant<O> for SuffixTrie {
    type Tree = SuffixTree<Arc<StoredBucket<O>>>;

    const INDEX_TYPE: &'static str = "SuffixTreeIndex";
    const RETRIEVAL_COST: usize = 53;

    fn supports(predicate: StringMatch) -> bool {
        matches!(predicate, StringMatch::Contains | StringMatch::EndsWith)
    }

    fn buckets_matching(tree: &Self::Tree, predicate: StringMatch, fragment: &str) -> Vec<Arc<StoredBucket<O>>> {
        let values = match predicate {
            StringMatch::Contains => tree.values_containing(fragment),
            StringMatch::EndsWith => tree.values_ending_with(fragment),
            StringMatch::StartsWith => Vec::new(),
        };
        values.into_iter().cloned().collect()
    }
}

/// Substring index over text values.
/// Answers `StringContains`, `StringEndsWith` and text `Equal` queries.
pub type SuffixTreeIndex<O> = TrieIndex<O, SuffixTrie>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::attribute::{multi, simple};
    use crate::core::types::Value;
    use crate::index::{Index, KeyStatistics};
    use crate::query::factory::{contains, ends_with, equal, starts_with};
    use crate::query::options::{DeduplicationOption, QueryOptions};
    use crate::search::results::ResultSet;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Car {
        id: u32,
        model: &'static str,
        trims: Vec<&'static str>,
    }

    fn fleet() -> Vec<Car> {
        vec![
            Car { id: 1, model: "Accord", trims: vec!["Sport", "EX-L Sport"] },
            Car { id: 2, model: "Civic", trims: vec!["Si"] },
            Car { id: 3, model: "Focus", trims: vec!["ST"] },
        ]
    }

    fn ids(result: &ResultSet<Car>) -> Vec<u32> {
        let mut ids: Vec<u32> = result.iter().map(|c| c.id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_substring_retrieval() {
        let model = simple("model", |c: &Car| Value::from(c.model));
        let index = SuffixTreeIndex::on_attribute(model.clone());
        index.init(&fleet());

        let options = QueryOptions::new();
        assert_eq!(ids(&index.retrieve(&contains(&model, "c"), &options).unwrap()), vec![1, 2, 3]);
        assert_eq!(ids(&index.retrieve(&contains(&model, "iv"), &options).unwrap()), vec![2]);
        assert_eq!(ids(&index.retrieve(&contains(&model, "ccor"), &options).unwrap()), vec![1]);
        assert!(index.retrieve(&contains(&model, "xyz"), &options).unwrap().is_empty());
        assert_eq!(index.retrieve(&contains(&model, "o"), &options).unwrap().retrieval_cost(), 53);
    }

    #[test]
    fn test_ends_with_and_equal() {
        let model = simple("model", |c: &Car| Value::from(c.model));
        let index = SuffixTreeIndex::on_attribute(model.clone());
        index.init(&fleet());

        let options = QueryOptions::new();
        assert_eq!(ids(&index.retrieve(&ends_with(&model, "cus"), &options).unwrap()), vec![3]);
        assert!(index.retrieve(&ends_with(&model, "Acc"), &options).unwrap().is_empty());
        assert_eq!(ids(&index.retrieve(&equal(&model, "Civic"), &options).unwrap()), vec![2]);
        assert!(!index.supports_query(&starts_with(&model, "Ci")));
    }

    #[test]
    fn test_multi_valued_dedup() {
        let trims = multi("trims", |c: &Car| c.trims.iter().map(|t| Value::from(*t)).collect());
        let index = SuffixTreeIndex::on_attribute(trims.clone());
        index.init(&fleet());

        let query = contains(&trims, "Sport");
        assert_eq!(index.retrieve(&query, &QueryOptions::new()).unwrap().size(), 2);

        let dedup = QueryOptions::new().with(DeduplicationOption::logical_elimination());
        let result = index.retrieve(&query, &dedup).unwrap();
        assert_eq!(result.size(), 1);
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_round_trip_leaves_no_bucket() {
        let model = simple("model", |c: &Car| Value::from(c.model));
        let index = SuffixTreeIndex::on_attribute(model.clone());
        let cars = fleet();

        index.notify_objects_added(&cars);
        assert_eq!(index.key_count(), 3);
        assert_eq!(index.count_for_key(&"Accord".to_string()), 1);
        index.notify_objects_removed(&cars);
        assert_eq!(index.key_count(), 0);
        assert!(index.distinct_keys().is_empty());
        assert!(index.retrieve(&contains(&model, "c"), &QueryOptions::new()).unwrap().is_empty());
    }
}

use std::sync::Arc;
use crate::core::types::IndexedObject;
use crate::index::bucket::StoredBucket;
use crate::index::radix::ReversedRadixTree;
use crate::index::trie_index::{StringMatch, TrieIndex, TrieVariant};

/// Suffix lookups as prefix walks over reversed keys
pub struct ReversedTrie;

impl<O: IndexedObject> TrieVariant<O> for ReversedTrie {
    type Tree = ReversedRadixTree<Arc<StoredBucket<O>>>;

    const INDEX_TYPE: &'static str = "ReversedRadixTreeIndex";
    const RETRIEVAL_COST: usize = 51;

    fn supports(predicate: StringMatch) -> bool {
        predicate == StringMatch::EndsWith
    }

    fn buckets_matching(tree: &Self::Tree, predicate: StringMatch, fragment: &str) -> Vec<Arc<StoredBucket<O>>> {
        match predicate {
            StringMatch::EndsWith => tree.values_with_suffix(fragment).into_iter().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Suffix index over text values, backed by a radix tree of reversed keys.
/// Answers `StringEndsWith` and text `Equal` queries.
pub type ReversedRadixTreeIndex<O> = TrieIndex<O, ReversedTrie>;

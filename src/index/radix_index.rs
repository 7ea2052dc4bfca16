use std::sync::Arc;
use crate::core::types::IndexedObject;
use crate::index::bucket::StoredBucket;
use crate::index::radix::RadixTree;
use crate::index::trie_index::{StringMatch, TrieIndex, TrieVariant};

/// Prefix walks over a plain radix tree
pub struct PrefixTrie;

impl<O: IndexedObject> TrieVariant<O> for PrefixTrie {
    type Tree = RadixTree<Arc<StoredBucket<O>>>;

    const INDEX_TYPE: &'static str = "RadixTreeIndex";
    const RETRIEVAL_COST: usize = 50;

    fn supports(predicate: StringMatch) -> bool {
        predicate == StringMatch::StartsWith
    }

    fn buckets_matching(tree: &Self::Tree, predicate: StringMatch, fragment: &str) -> Vec<Arc<StoredBucket<O>>> {
        match predicate {
            StringMatch::StartsWith => tree.values_with_prefix(fragment).into_iter().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// Prefix index over text values.
/// Answers `StringStartsWith` and text `Equal` queries; non-text values are not indexed.
pub type RadixTreeIndex<O> = TrieIndex<O, PrefixTrie>;

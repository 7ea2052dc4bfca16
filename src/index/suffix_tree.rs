use std::collections::{HashMap, HashSet};
use crate::index::radix::{RadixTree, StringTree};

/// Generalized suffix trie.
///
/// Every suffix of every key is stored in a radix tree, mapped to the set of
/// original keys that end with it. A "contains" lookup is then a prefix walk
/// over suffixes. Values live in a separate map keyed by the original key.
pub struct SuffixTree<V> {
    suffixes: RadixTree<HashSet<String>>,
    values: HashMap<String, V>,
}

/// All suffixes of `key` on char boundaries, longest first
fn suffixes_of(key: &str) -> impl Iterator<Item = &str> {
    key.char_indices().map(move |(i, _)| &key[i..])
}

impl<V> SuffixTree<V> {
    pub fn new() -> Self {
        SuffixTree { suffixes: RadixTree::new(), values: HashMap::new() }
    }

    pub fn keys_containing(&self, fragment: &str) -> HashSet<&str> {
        if fragment.is_empty() {
            return self.values.keys().map(String::as_str).collect();
        }
        self.suffixes
            .values_with_prefix(fragment)
            .into_iter()
            .flat_map(|keys| keys.iter().map(String::as_str))
            .collect()
    }

    pub fn keys_ending_with(&self, suffix: &str) -> HashSet<&str> {
        if suffix.is_empty() {
            return self.values.keys().map(String::as_str).collect();
        }
        match self.suffixes.get(suffix) {
            Some(keys) => keys.iter().map(String::as_str).collect(),
            None => HashSet::new(),
        }
    }

    pub fn values_containing(&self, fragment: &str) -> Vec<&V> {
        self.keys_containing(fragment)
            .into_iter()
            .filter_map(|key| self.values.get(key))
            .collect()
    }

    pub fn values_ending_with(&self, suffix: &str) -> Vec<&V> {
        self.keys_ending_with(suffix)
            .into_iter()
            .filter_map(|key| self.values.get(key))
            .collect()
    }

    /// Number of distinct suffixes currently stored
    pub fn suffix_count(&self) -> usize {
        self.suffixes.len()
    }
}

impl<V> Default for SuffixTree<V> {
    fn default() -> Self {
        SuffixTree::new()
    }
}

impl<V: Send + Sync> StringTree<V> for SuffixTree<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.values.get(key)
    }

    fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: &str, make: F) -> &V {
        if !self.values.contains_key(key) {
            for suffix in suffixes_of(key) {
                self.suffixes
                    .get_or_insert_mut(suffix, HashSet::new)
                    .insert(key.to_string());
            }
        }
        self.values.entry(key.to_string()).or_insert_with(make)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let removed = self.values.remove(key)?;
        for suffix in suffixes_of(key) {
            let now_empty = match self.suffixes.get_mut(suffix) {
                Some(keys) => {
                    keys.remove(key);
                    keys.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.suffixes.remove(suffix);
            }
        }
        Some(removed)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn values(&self) -> Vec<&V> {
        self.values.values().collect()
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted<'a>(keys: HashSet<&'a str>) -> Vec<&'a str> {
        let mut keys: Vec<&str> = keys.into_iter().collect();
        keys.sort();
        keys
    }

    fn tree_of(keys: &[&str]) -> SuffixTree<usize> {
        let mut tree = SuffixTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.get_or_insert_with(key, || i);
        }
        tree
    }

    #[test]
    fn test_contains_lookup() {
        let tree = tree_of(&["Accord", "Civic", "Focus"]);
        assert_eq!(sorted(tree.keys_containing("c")), vec!["Accord", "Civic", "Focus"]);
        assert_eq!(sorted(tree.keys_containing("iv")), vec!["Civic"]);
        assert_eq!(sorted(tree.keys_containing("ocu")), vec!["Focus"]);
        assert!(tree.keys_containing("xyz").is_empty());
        assert_eq!(tree.keys_containing("").len(), 3);
    }

    #[test]
    fn test_ends_with_lookup() {
        let tree = tree_of(&["Accord", "Record", "Civic"]);
        assert_eq!(sorted(tree.keys_ending_with("ord")), vec!["Accord", "Record"]);
        assert_eq!(tree.values_ending_with("vic"), vec![&2]);
        assert!(tree.keys_ending_with("Acc").is_empty());
    }

    #[test]
    fn test_shared_suffixes_survive_removal() {
        let mut tree = tree_of(&["Accord", "Record"]);
        let suffixes_before = tree.suffix_count();

        assert_eq!(tree.remove("Accord"), Some(0));
        assert_eq!(tree.remove("Accord"), None);
        assert_eq!(sorted(tree.keys_ending_with("ord")), vec!["Record"]);
        assert!(tree.suffix_count() < suffixes_before);

        tree.remove("Record");
        assert!(tree.is_empty());
        assert_eq!(tree.suffix_count(), 0);
    }

    #[test]
    fn test_existing_key_keeps_value() {
        let mut tree = SuffixTree::new();
        tree.get_or_insert_with("Civic", || 1);
        assert_eq!(*tree.get_or_insert_with("Civic", || 2), 1);
        assert_eq!(tree.len(), 1);
    }
}

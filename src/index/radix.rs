/// Common surface of the string-keyed trees backing the text indexes
pub trait StringTree<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<&V>;

    /// Existing value for `key`, or the one produced by `make` if there was none.
    /// `make` is not called when the key is already present.
    fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: &str, make: F) -> &V;

    fn remove(&mut self, key: &str) -> Option<V>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn values(&self) -> Vec<&V>;

    /// Every stored key, as it was inserted
    fn keys(&self) -> Vec<String>;
}

/// Compressed (radix) trie over the UTF-8 bytes of string keys.
/// Children are kept sorted by their first byte.
pub struct RadixTree<V> {
    root: Node<V>,
    len: usize,
}

struct Node<V> {
    label: Vec<u8>,
    value: Option<V>,
    children: Vec<Node<V>>,
}

impl<V> Node<V> {
    fn new(label: Vec<u8>) -> Self {
        Node { label, value: None, children: Vec::new() }
    }

    fn first_byte(&self) -> u8 {
        self.label.first().copied().unwrap_or(0)
    }

    fn child_position(&self, byte: u8) -> Result<usize, usize> {
        self.children.binary_search_by_key(&byte, |child| child.first_byte())
    }

    fn child(&self, byte: u8) -> Option<&Node<V>> {
        self.child_position(byte).ok().map(|i| &self.children[i])
    }

    /// Keep `label[..at]` here and push the rest down into a new child
    fn split(&mut self, at: usize) {
        let tail = self.label.split_off(at);
        let child = Node {
            label: tail,
            value: self.value.take(),
            children: std::mem::take(&mut self.children),
        };
        self.children = vec![child];
    }

    fn merge_with_only_child(&mut self) {
        if let Some(only) = self.children.pop() {
            self.label.extend_from_slice(&only.label);
            self.value = only.value;
            self.children = only.children;
        }
    }

    fn get_or_insert_with<F: FnOnce() -> V>(&mut self, rest: &[u8], make: F, created: &mut bool) -> &mut V {
        if rest.is_empty() {
            if self.value.is_none() {
                *created = true;
            }
            return self.value.get_or_insert_with(make);
        }

        match self.child_position(rest[0]) {
            Ok(i) => {
                let common = common_prefix_len(&self.children[i].label, rest);
                if common < self.children[i].label.len() {
                    self.children[i].split(common);
                }
                self.children[i].get_or_insert_with(&rest[common..], make, created)
            }
            Err(i) => {
                *created = true;
                self.children.insert(i, Node::new(rest.to_vec()));
                self.children[i].value.get_or_insert_with(make)
            }
        }
    }

    fn get_mut(&mut self, rest: &[u8]) -> Option<&mut V> {
        if rest.is_empty() {
            return self.value.as_mut();
        }
        let i = self.child_position(rest[0]).ok()?;
        let child = &mut self.children[i];
        if !rest.starts_with(&child.label) {
            return None;
        }
        let label_len = child.label.len();
        child.get_mut(&rest[label_len..])
    }

    fn remove(&mut self, rest: &[u8]) -> Option<V> {
        if rest.is_empty() {
            return self.value.take();
        }

        let i = self.child_position(rest[0]).ok()?;
        let label_len = self.children[i].label.len();
        if !rest.starts_with(&self.children[i].label) {
            return None;
        }
        let removed = self.children[i].remove(&rest[label_len..])?;

        // Drop dead leaves and fold pass-through nodes back into their child
        let child = &self.children[i];
        if child.value.is_none() {
            match child.children.len() {
                0 => {
                    self.children.remove(i);
                }
                1 => self.children[i].merge_with_only_child(),
                _ => {}
            }
        }
        Some(removed)
    }

    fn collect<'a>(&'a self, path: &mut Vec<u8>, out: &mut Vec<(Vec<u8>, &'a V)>) {
        path.extend_from_slice(&self.label);
        if let Some(value) = &self.value {
            out.push((path.clone(), value));
        }
        for child in &self.children {
            child.collect(path, out);
        }
        path.truncate(path.len() - self.label.len());
    }

    fn collect_values<'a>(&'a self, out: &mut Vec<&'a V>) {
        if let Some(value) = &self.value {
            out.push(value);
        }
        for child in &self.children {
            child.collect_values(out);
        }
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl<V> RadixTree<V> {
    pub fn new() -> Self {
        RadixTree { root: Node::new(Vec::new()), len: 0 }
    }

    /// Node whose subtree holds exactly the keys starting with `prefix`,
    /// along with the bytes leading up to that node's own label.
    fn find_prefix(&self, prefix: &[u8]) -> Option<(Vec<u8>, &Node<V>)> {
        let mut node = &self.root;
        let mut path = Vec::new();
        let mut rest = prefix;

        loop {
            if rest.is_empty() {
                return Some((path, node));
            }
            let child = node.child(rest[0])?;
            path.extend_from_slice(&node.label);
            if child.label.len() >= rest.len() {
                // Prefix ends inside (or at the end of) this edge
                return if child.label.starts_with(rest) {
                    Some((path, child))
                } else {
                    None
                };
            }
            if !rest.starts_with(&child.label) {
                return None;
            }
            rest = &rest[child.label.len()..];
            node = child;
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.root.get_mut(key.as_bytes())
    }

    pub fn get_or_insert_mut<F: FnOnce() -> V>(&mut self, key: &str, make: F) -> &mut V {
        let mut created = false;
        let value = self.root.get_or_insert_with(key.as_bytes(), make, &mut created);
        if created {
            self.len += 1;
        }
        value
    }

    pub fn values_with_prefix(&self, prefix: &str) -> Vec<&V> {
        let mut out = Vec::new();
        if let Some((_, node)) = self.find_prefix(prefix.as_bytes()) {
            node.collect_values(&mut out);
        }
        out
    }

    pub fn entries_with_prefix(&self, prefix: &str) -> Vec<(String, &V)> {
        let mut entries = Vec::new();
        if let Some((mut path, node)) = self.find_prefix(prefix.as_bytes()) {
            node.collect(&mut path, &mut entries);
        }
        // Full keys are always whole strings
        entries
            .into_iter()
            .filter_map(|(bytes, value)| String::from_utf8(bytes).ok().map(|key| (key, value)))
            .collect()
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries_with_prefix(prefix).into_iter().map(|(key, _)| key).collect()
    }
}

impl<V> Default for RadixTree<V> {
    fn default() -> Self {
        RadixTree::new()
    }
}

impl<V: Send + Sync> StringTree<V> for RadixTree<V> {
    fn get(&self, key: &str) -> Option<&V> {
        let mut node = &self.root;
        let mut rest = key.as_bytes();
        loop {
            if rest.is_empty() {
                return node.value.as_ref();
            }
            let child = node.child(rest[0])?;
            if !rest.starts_with(&child.label) {
                return None;
            }
            rest = &rest[child.label.len()..];
            node = child;
        }
    }

    fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: &str, make: F) -> &V {
        self.get_or_insert_mut(key, make)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let removed = self.root.remove(key.as_bytes());
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    fn len(&self) -> usize {
        self.len
    }

    fn values(&self) -> Vec<&V> {
        self.values_with_prefix("")
    }

    fn keys(&self) -> Vec<String> {
        self.keys_with_prefix("")
    }
}

/// Radix tree over keys with their characters reversed,
/// so that a suffix lookup becomes a prefix walk.
pub struct ReversedRadixTree<V> {
    tree: RadixTree<V>,
}

pub fn reversed(key: &str) -> String {
    key.chars().rev().collect()
}

impl<V> ReversedRadixTree<V> {
    pub fn new() -> Self {
        ReversedRadixTree { tree: RadixTree::new() }
    }

    pub fn values_with_suffix(&self, suffix: &str) -> Vec<&V> {
        self.tree.values_with_prefix(&reversed(suffix))
    }

    pub fn keys_with_suffix(&self, suffix: &str) -> Vec<String> {
        self.tree
            .keys_with_prefix(&reversed(suffix))
            .iter()
            .map(|key| reversed(key))
            .collect()
    }
}

impl<V> Default for ReversedRadixTree<V> {
    fn default() -> Self {
        ReversedRadixTree::new()
    }
}

impl<V: Send + Sync> StringTree<V> for ReversedRadixTree<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.tree.get(&reversed(key))
    }

    fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: &str, make: F) -> &V {
        self.tree.get_or_insert_with(&reversed(key), make)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        self.tree.remove(&reversed(key))
    }

    fn len(&self) -> usize {
        self.tree.len()
    }

    fn values(&self) -> Vec<&V> {
        self.tree.values()
    }

    fn keys(&self) -> Vec<String> {
        self.keys_with_suffix("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[&str]) -> RadixTree<usize> {
        let mut tree = RadixTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.get_or_insert_with(key, || i);
        }
        tree
    }

    fn sorted(mut keys: Vec<String>) -> Vec<String> {
        keys.sort();
        keys
    }

    #[test]
    fn test_insert_splits_edges() {
        let tree = tree_of(&["team", "test", "toast", "te", "t"]);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.get("te"), Some(&3));
        assert_eq!(tree.get("tea"), None);
        assert_eq!(tree.get("toast"), Some(&2));
        assert_eq!(
            sorted(tree.keys_with_prefix("te")),
            vec!["te", "team", "test"]
        );
        assert_eq!(tree.values_with_prefix("to").len(), 1);
        assert!(tree.values_with_prefix("x").is_empty());
    }

    #[test]
    fn test_prefix_ending_mid_edge() {
        let tree = tree_of(&["Accord", "Accent"]);
        assert_eq!(sorted(tree.keys_with_prefix("Acco")), vec!["Accord"]);
        assert_eq!(sorted(tree.keys_with_prefix("Acc")), vec!["Accent", "Accord"]);
        assert!(tree.keys_with_prefix("Accx").is_empty());
    }

    #[test]
    fn test_existing_key_keeps_value() {
        let mut tree = RadixTree::new();
        assert_eq!(*tree.get_or_insert_with("civic", || 1), 1);
        assert_eq!(*tree.get_or_insert_with("civic", || 2), 1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_remove_compacts() {
        let mut tree = tree_of(&["team", "test", "te"]);
        assert_eq!(tree.remove("te"), Some(2));
        assert_eq!(tree.remove("te"), None);
        assert_eq!(tree.remove("tes"), None);
        assert_eq!(tree.len(), 2);

        assert_eq!(tree.remove("team"), Some(0));
        assert_eq!(tree.get("test"), Some(&1));
        assert_eq!(tree.keys_with_prefix(""), vec!["test"]);

        assert_eq!(tree.remove("test"), Some(1));
        assert!(tree.is_empty());
        assert!(tree.values().is_empty());
    }

    #[test]
    fn test_multibyte_keys() {
        let tree = tree_of(&["café", "cafés", "caffè"]);
        assert_eq!(sorted(tree.keys_with_prefix("caf")), vec!["café", "cafés", "caffè"]);
        assert_eq!(sorted(tree.keys_with_prefix("café")), vec!["café", "cafés"]);
    }

    #[test]
    fn test_reversed_tree_suffix_lookup() {
        let mut tree = ReversedRadixTree::new();
        for (i, key) in ["Accord", "Civic", "Focus", "Record"].iter().enumerate() {
            tree.get_or_insert_with(key, || i);
        }
        assert_eq!(sorted(tree.keys_with_suffix("ord")), vec!["Accord", "Record"]);
        assert_eq!(tree.values_with_suffix("us"), vec![&2]);
        assert_eq!(tree.get("Civic"), Some(&1));
        assert_eq!(tree.remove("Accord"), Some(0));
        assert_eq!(tree.keys_with_suffix("ord"), vec!["Record"]);
    }
}

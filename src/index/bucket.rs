use dashmap::DashSet;
use crate::core::types::IndexedObject;

/// Objects sharing one indexed key.
/// Safe for concurrent add/remove/iterate.
pub struct StoredBucket<O: IndexedObject> {
    objects: DashSet<O>,
}

impl<O: IndexedObject> StoredBucket<O> {
    pub fn new() -> Self {
        StoredBucket { objects: DashSet::new() }
    }

    /// Returns false if the object was already present
    pub fn add(&self, object: O) -> bool {
        self.objects.insert(object)
    }

    pub fn remove(&self, object: &O) -> bool {
        self.objects.remove(object).is_some()
    }

    pub fn contains(&self, object: &O) -> bool {
        self.objects.contains(object)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Members at the time of the call. Shard guards are released before
    /// returning, so the caller may add to or remove from this bucket while
    /// walking the result.
    pub fn iter(&self) -> std::vec::IntoIter<O> {
        let members: Vec<O> = self.objects.iter().map(|entry| entry.key().clone()).collect();
        members.into_iter()
    }
}

impl<O: IndexedObject> Default for StoredBucket<O> {
    fn default() -> Self {
        StoredBucket::new()
    }
}

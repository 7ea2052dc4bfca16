use parking_lot::RwLock;
use std::sync::Arc;

/// Atomically swappable reference to an index's backing structure.
///
/// Every operation calls `load()` once on entry and works on that snapshot only,
/// so a concurrent `replace()` (clear) never tears a single read or write.
pub struct SnapshotHandle<T> {
    current: RwLock<Arc<T>>,
}

impl<T> SnapshotHandle<T> {
    pub fn new(initial: T) -> Self {
        SnapshotHandle { current: RwLock::new(Arc::new(initial)) }
    }

    pub fn load(&self) -> Arc<T> {
        self.current.read().clone()
    }

    /// Install a new structure, returning the previous one
    pub fn replace(&self, next: T) -> Arc<T> {
        let next = Arc::new(next);
        std::mem::replace(&mut *self.current.write(), next)
    }
}

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use serde::{Serialize, Deserialize};

/// Open bag of per-query options, keyed by option type.
/// Indexes read the options they recognize and ignore the rest.
#[derive(Clone, Default)]
pub struct QueryOptions {
    options: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl QueryOptions {
    pub fn new() -> Self {
        QueryOptions::default()
    }

    pub fn with<T: Any + Send + Sync>(mut self, option: T) -> Self {
        self.insert(option);
        self
    }

    /// Replaces any previous option of the same type
    pub fn insert<T: Any + Send + Sync>(&mut self, option: T) {
        self.options.insert(TypeId::of::<T>(), Arc::new(option));
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.options
            .get(&TypeId::of::<T>())
            .and_then(|option| (**option).downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl fmt::Debug for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "QueryOptions({} options)", self.options.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeduplicationStrategy {
    Duplicate,            // Objects matching several keys may be returned more than once
    LogicalElimination,   // Each object at most once
}

/// Requests (or waives) duplicate elimination across multi-key retrievals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeduplicationOption {
    pub strategy: DeduplicationStrategy,
}

impl DeduplicationOption {
    pub fn logical_elimination() -> Self {
        DeduplicationOption { strategy: DeduplicationStrategy::LogicalElimination }
    }

    pub fn duplicate() -> Self {
        DeduplicationOption { strategy: DeduplicationStrategy::Duplicate }
    }

    /// Absent option means duplicates are allowed
    pub fn is_logical_elimination(options: &QueryOptions) -> bool {
        options
            .get::<DeduplicationOption>()
            .map(|option| option.strategy == DeduplicationStrategy::LogicalElimination)
            .unwrap_or(false)
    }
}

use serde::{Serialize, Deserialize};
use crate::core::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    // init() switches to rayon batches at this collection size
    pub parallel_init_threshold: usize,
    pub init_batch_size: usize,
    pub init_workers: usize,

    // Pre-sizing for hash-keyed indexes (DashMap capacity)
    pub initial_capacity: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            parallel_init_threshold: 10_000,        // Below this, init is a plain bulk add
            init_batch_size: 1000,                  // Objects per rayon task
            init_workers: num_cpus::get(),          // One worker per core
            initial_capacity: 0,                    // Grow on demand
        }
    }
}

impl IndexConfig {
    /// Load from a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Config that never parallelizes init
    pub fn sequential() -> Self {
        IndexConfig {
            parallel_init_threshold: usize::MAX,
            ..Default::default()
        }
    }
}

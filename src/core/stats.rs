use serde::{Serialize, Deserialize};

/// Point-in-time statistics for a single index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub index_type: String,
    pub attribute: String,
    pub distinct_keys: usize,
    pub total_entries: usize,   // Sum of bucket sizes; >= object count for multi-valued attributes
    pub retrieval_cost: usize,
}

impl IndexStats {
    /// Average objects per key, 0.0 for an empty index
    pub fn mean_bucket_size(&self) -> f64 {
        if self.distinct_keys == 0 {
            0.0
        } else {
            self.total_entries as f64 / self.distinct_keys as f64
        }
    }
}

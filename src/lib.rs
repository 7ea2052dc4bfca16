pub mod core;
pub mod attribute;
pub mod query;
pub mod quantizer;
pub mod index;
pub mod search;

pub use crate::attribute::attribute::{Attribute, AttributeRef};
pub use crate::attribute::compound::{CompoundAttribute, CompoundValueTuple};
pub use crate::core::config::IndexConfig;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{IndexedObject, Value};
pub use crate::index::{Index, IndexedAttribute, KeyStatistics};
pub use crate::query::ast::Query;
pub use crate::query::options::{DeduplicationOption, QueryOptions};
pub use crate::search::results::{ResultKind, ResultSet};

/*
┌────────────────────────────────────────────────────────────────────────────────────────────┐
│                              QUERIX STRUCT ARCHITECTURE                                     │
└────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── QUERY LAYER ────────────────────────────────────────────┐
│                                                                                              │
│  ┌──────────────────────────┐  ┌──────────────────────────┐  ┌──────────────────────────┐  │
│  │ enum Query<O>            │  │ struct And / Or          │  │ struct QueryOptions      │  │
│  │ • Equal                  │  │ • children (>= 2)        │  │ • TypeId -> Arc<dyn Any> │  │
│  │ • StringStartsWith       │  │ • hash_code (cached)     │  │                          │  │
│  │ • StringEndsWith         │  ├──────────────────────────┤  │ struct DeduplicationOpt  │  │
│  │ • StringContains         │  │ struct Not               │  │ • Duplicate              │  │
│  │ • Compound               │  │ • negated (exactly 1)    │  │ • LogicalElimination     │  │
│  │ • And / Or / Not         │  └──────────────────────────┘  └──────────────────────────┘  │
│  └──────────────────────────┘                                                               │
│                                                                                              │
│  ┌──────────────────────────┐  ┌──────────────────────────┐  ┌──────────────────────────┐  │
│  │ trait Attribute<O>       │  │ struct CompoundAttribute │  │ trait Quantizer<T>       │  │
│  │ • name()                 │  │ • attributes (ordered)   │  │ • IntegerQuantizer       │  │
│  │ • values(&O) -> Vec      │  │ • tuples(&O) (product)   │  │ • FnQuantizer            │  │
│  │ • is_single_valued()     │  │                          │  │ • TupleQuantizer         │  │
│  └──────────────────────────┘  └──────────────────────────┘  └──────────────────────────┘  │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── INDEX LAYER ────────────────────────────────────────────┐
│                                                                                              │
│  trait Index<O>: supports_query / retrieve / notify_objects_{added,removed,cleared} / init  │
│                                                                                              │
│  ┌───────────────────┐ ┌───────────────────┐ ┌───────────────────┐ ┌───────────────────┐   │
│  │ HashIndex     30  │ │ RadixTreeIndex 50 │ │ ReversedRadix  51 │ │ SuffixTreeIndex 53│   │
│  │ DashMap<Value,..> │ │ RwLock<RadixTree> │ │ RwLock<Reversed>  │ │ RwLock<SuffixTree>│   │
│  └───────────────────┘ └───────────────────┘ └───────────────────┘ └───────────────────┘   │
│  ┌───────────────────┐                                                                      │
│  │ CompoundIndex 20  │   each held behind SnapshotHandle<T> = RwLock<Arc<T>>                │
│  │ DashMap<Tuple,..> │   (load once per operation, replace on clear)                        │
│  └───────────────────┘                                                                      │
│  the three text indexes are TrieIndex<O, V: TrieVariant<O>> (tree, cost, predicates)         │
│                                                                                              │
│  trait BucketStore<K, O> ──values──> Arc<StoredBucket<O>> ──wraps──> DashSet<O>             │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── RESULT LAYER ───────────────────────────────────────────┐
│                                                                                              │
│  struct ResultSet<O>  (lazy, re-resolves its key on every read)                             │
│  • Empty • Stored(key) • UnionAll(keys) • Union(keys, dedup) • Filtered(query)              │
│  • retrieval_cost (per index kind)  • merge_cost (raw elements to examine)                  │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────── RELATIONSHIPS ────────────────────────────────────────────┐
│                                                                                              │
│  Index ──reads──> Attribute ──yields──> Value ──quantized_by──> Quantizer ──keys──> Bucket  │
│    │                                                                                         │
│    ├──retrieve──> ResultSet ──views──> StoredBucket                                         │
│    │                  │                                                                      │
│    │                  └──filters_with──> Query (quantized indexes only)                     │
│    │                                                                                         │
│    └──init──> rayon pool (IndexConfig::parallel_init_threshold)                              │
│                                                                                              │
└──────────────────────────────────────────────────────────────────────────────────────────────┘
*/

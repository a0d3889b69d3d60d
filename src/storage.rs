//! Statistics storage for termrank.
//!
//! The engine never touches persistence directly. Everything it knows about
//! the corpus lives behind the [`StatisticsStore`] trait: per-term weight
//! maps, per-document term membership and the global document counter.
//!
//! # Architecture
//!
//! - **StatisticsStore trait**: The capability consumed by the indexer and the searcher
//! - **StoreConfig enum**: Type-safe configuration for the supported backends
//! - **StoreFactory**: Helper for constructing concrete stores
//!
//! # Store Types
//!
//! ## MemoryStore
//! - In-process maps behind a `parking_lot::RwLock`
//! - Fast but non-persistent
//!
//! ## FileStore
//! - One checksummed record file per term and per document
//! - Survives process restarts; reopening the directory restores every statistic
//!
//! # Example
//!
//! ```
//! use termrank::storage::{StoreConfig, StoreFactory};
//! use termrank::storage::memory::MemoryStoreConfig;
//!
//! # fn main() -> termrank::error::Result<()> {
//! let store = StoreFactory::create(StoreConfig::Memory(MemoryStoreConfig::default()))?;
//! assert_eq!(store.document_count()?, 0);
//! assert!(!store.contains_term("fox")?);
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod file;
pub mod memory;

/// Document ID → weight of one term in that document.
pub type WeightMap = BTreeMap<String, f64>;

/// The set of terms in a document's latest indexed version.
pub type TermSet = BTreeSet<String>;

/// A durable home for term and document statistics.
///
/// Every operation is a single read or a full-replace write; the store
/// offers no multi-key atomicity. Callers that mutate concurrently must
/// serialize their writes (the [`Engine`](crate::engine::Engine) holds a
/// lock around each index call).
pub trait StatisticsStore: Send + Sync + std::fmt::Debug {
    /// Short backend name used in logs and statistics.
    fn name(&self) -> &'static str;

    /// Whether `term` is registered with a weight map (possibly empty).
    fn contains_term(&self, term: &str) -> Result<bool>;

    /// Load the weight map of `term`.
    ///
    /// Fails with [`TermRankError::NotFound`](crate::error::TermRankError::NotFound)
    /// when the term was never registered.
    fn load_weights(&self, term: &str) -> Result<WeightMap>;

    /// Replace the stored weight map of `term`, registering the term if new.
    fn save_weights(&self, term: &str, weights: &WeightMap) -> Result<()>;

    /// Number of distinct documents ever indexed.
    fn document_count(&self) -> Result<u64>;

    /// Overwrite the global document counter.
    fn set_document_count(&self, count: u64) -> Result<()>;

    /// Terms of the latest indexed version of `doc_id`, or `None` if the
    /// document was never indexed.
    fn load_membership(&self, doc_id: &str) -> Result<Option<TermSet>>;

    /// Replace the membership record of `doc_id`.
    fn save_membership(&self, doc_id: &str, terms: &TermSet) -> Result<()>;

    /// Every registered term, sorted.
    fn terms(&self) -> Result<Vec<String>>;

    /// Number of documents currently associated with `term`.
    ///
    /// Derived from the weight map, so it always agrees with the stored
    /// associations. An unknown term has frequency zero.
    fn document_frequency(&self, term: &str) -> Result<u64> {
        match self.load_weights(term) {
            Ok(weights) => Ok(weights.len() as u64),
            Err(e) if e.is_not_found() => Ok(0),
            Err(e) => Err(e),
        }
    }
}

/// Configuration for statistics store backends.
///
/// # Example
///
/// ```
/// use termrank::storage::StoreConfig;
/// use termrank::storage::file::FileStoreConfig;
///
/// let mut file_config = FileStoreConfig::new("/data/index");
/// file_config.sync_writes = true;
/// let config = StoreConfig::File(file_config);
///
/// let json = serde_json::to_string(&config).unwrap();
/// assert!(json.contains("\"type\":\"file\""));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Directory-backed store (includes the directory path)
    File(file::FileStoreConfig),

    /// In-process store
    Memory(memory::MemoryStoreConfig),
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Memory(memory::MemoryStoreConfig::default())
    }
}

/// A factory for creating statistics stores.
pub struct StoreFactory;

impl StoreFactory {
    /// Create a store for the given configuration.
    ///
    /// A file store opens (or creates) its directory; existing statistics are
    /// kept.
    pub fn create(config: StoreConfig) -> Result<Arc<dyn StatisticsStore>> {
        match config {
            StoreConfig::Memory(mem_config) => Ok(Arc::new(memory::MemoryStore::new(mem_config))),
            StoreConfig::File(file_config) => Ok(Arc::new(file::FileStore::open(file_config)?)),
        }
    }
}

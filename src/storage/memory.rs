//! In-memory statistics store for testing and ephemeral indexes.

use std::sync::atomic::{AtomicBool, Ordering};

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TermRankError};
use crate::storage::{StatisticsStore, TermSet, WeightMap};

/// Configuration for [`MemoryStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStoreConfig {
    /// Initial capacity of the term and document tables.
    pub initial_capacity: usize,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        MemoryStoreConfig {
            initial_capacity: 16,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    weights: AHashMap<String, WeightMap>,
    memberships: AHashMap<String, TermSet>,
    document_count: u64,
}

/// An in-memory statistics store.
///
/// All state lives behind one `RwLock`; each trait call takes the lock once,
/// so individual operations are atomic while sequences of them are not.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    /// Whether the store is closed.
    closed: AtomicBool,
}

impl MemoryStore {
    /// Create a new memory store.
    pub fn new(config: MemoryStoreConfig) -> Self {
        let state = MemoryState {
            weights: AHashMap::with_capacity(config.initial_capacity),
            memberships: AHashMap::with_capacity(config.initial_capacity),
            document_count: 0,
        };

        MemoryStore {
            state: RwLock::new(state),
            closed: AtomicBool::new(false),
        }
    }

    /// Create a new memory store with default configuration.
    pub fn new_default() -> Self {
        Self::new(MemoryStoreConfig::default())
    }

    /// Check if the store is closed.
    fn check_closed(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(TermRankError::store_unavailable("memory store is closed"))
        } else {
            Ok(())
        }
    }

    /// Close the store; every later operation fails with `StoreUnavailable`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Whether [`close`](Self::close) was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of registered terms.
    pub fn term_count(&self) -> usize {
        self.state.read().weights.len()
    }

    /// Number of documents with a membership record.
    pub fn membership_count(&self) -> usize {
        self.state.read().memberships.len()
    }

    /// Drop every statistic.
    pub fn clear(&self) -> Result<()> {
        self.check_closed()?;
        let mut state = self.state.write();
        state.weights.clear();
        state.memberships.clear();
        state.document_count = 0;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new_default()
    }
}

impl StatisticsStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn contains_term(&self, term: &str) -> Result<bool> {
        self.check_closed()?;
        Ok(self.state.read().weights.contains_key(term))
    }

    fn load_weights(&self, term: &str) -> Result<WeightMap> {
        self.check_closed()?;
        self.state
            .read()
            .weights
            .get(term)
            .cloned()
            .ok_or_else(|| TermRankError::not_found(format!("term '{term}'")))
    }

    fn save_weights(&self, term: &str, weights: &WeightMap) -> Result<()> {
        self.check_closed()?;
        self.state
            .write()
            .weights
            .insert(term.to_string(), weights.clone());
        Ok(())
    }

    fn document_count(&self) -> Result<u64> {
        self.check_closed()?;
        Ok(self.state.read().document_count)
    }

    fn set_document_count(&self, count: u64) -> Result<()> {
        self.check_closed()?;
        self.state.write().document_count = count;
        Ok(())
    }

    fn load_membership(&self, doc_id: &str) -> Result<Option<TermSet>> {
        self.check_closed()?;
        Ok(self.state.read().memberships.get(doc_id).cloned())
    }

    fn save_membership(&self, doc_id: &str, terms: &TermSet) -> Result<()> {
        self.check_closed()?;
        self.state
            .write()
            .memberships
            .insert(doc_id.to_string(), terms.clone());
        Ok(())
    }

    fn terms(&self) -> Result<Vec<String>> {
        self.check_closed()?;
        let mut terms: Vec<String> = self.state.read().weights.keys().cloned().collect();
        terms.sort();
        Ok(terms)
    }

    fn document_frequency(&self, term: &str) -> Result<u64> {
        self.check_closed()?;
        Ok(self
            .state
            .read()
            .weights
            .get(term)
            .map_or(0, |weights| weights.len() as u64))
    }
}

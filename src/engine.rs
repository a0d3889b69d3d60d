//! TF-IDF engine combining normalization, indexing and ranking over a
//! pluggable statistics store.
//!
//! # Examples
//!
//! ```
//! use termrank::document::Document;
//! use termrank::engine::Engine;
//! use termrank::engine::config::EngineOptions;
//!
//! let engine = Engine::in_memory(EngineOptions::default());
//! engine.index(&Document::new("t1", "The quick brown fox jumped over the lazy dog")).unwrap();
//! engine.index(&Document::new("t2", "Hello World")).unwrap();
//!
//! assert_eq!(engine.search(&["fox"]).unwrap(), vec!["t1"]);
//! assert!(engine.search(&["hippo"]).unwrap().is_empty());
//! ```

pub mod config;
pub mod indexer;
pub mod searcher;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::Normalizer;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::document::Document;
use crate::engine::config::EngineOptions;
use crate::engine::indexer::IndexOutcome;
use crate::engine::searcher::SearchHit;
use crate::error::Result;
use crate::storage::StatisticsStore;
use crate::storage::memory::MemoryStore;

/// Summary statistics of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Distinct document IDs ever indexed.
    pub document_count: u64,
    /// Registered terms, including those whose weight map is empty.
    pub term_count: usize,
    /// Name of the store backend.
    pub store: String,
}

/// A TF-IDF index over a [`StatisticsStore`].
///
/// Index calls are serialized by an internal lock, so an `Engine` can be
/// shared between threads. Searches take no lock; a search running next to an
/// index call may observe a partially applied document.
pub struct Engine {
    options: EngineOptions,
    normalizer: Normalizer,
    store: Arc<dyn StatisticsStore>,
    /// Held for the whole diff-then-write sequence of one document.
    index_lock: Mutex<()>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("store", &self.store.name())
            .field("index_lock", &"<mutex>")
            .finish()
    }
}

impl Engine {
    /// Create an engine over the given store.
    pub fn new(options: EngineOptions, store: Arc<dyn StatisticsStore>) -> Self {
        Engine {
            options,
            normalizer: Normalizer::new(&options),
            store,
            index_lock: Mutex::new(()),
        }
    }

    /// Create an engine over a fresh in-memory store.
    pub fn in_memory(options: EngineOptions) -> Self {
        Self::new(options, Arc::new(MemoryStore::new_default()))
    }

    /// The options this engine normalizes with.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The underlying statistics store.
    pub fn store(&self) -> &Arc<dyn StatisticsStore> {
        &self.store
    }

    /// Index a document, replacing any earlier version with the same ID.
    pub fn index(&self, doc: &Document) -> Result<()> {
        self.index_document(doc).map(|_| ())
    }

    /// Index a document and report what changed.
    pub fn index_document(&self, doc: &Document) -> Result<IndexOutcome> {
        let _guard = self.index_lock.lock();
        indexer::index_with(doc, &self.normalizer, self.store.as_ref())
    }

    /// Index documents one by one, stopping at the first error.
    ///
    /// Returns the number of documents indexed.
    pub fn index_all<I>(&self, docs: I) -> Result<usize>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut indexed = 0;
        for doc in docs {
            self.index(&doc)?;
            indexed += 1;
        }
        Ok(indexed)
    }

    /// Search for the given query terms and return at most ten document IDs,
    /// best first.
    pub fn search<S: AsRef<str>>(&self, query_terms: &[S]) -> Result<Vec<String>> {
        Ok(self
            .search_with_scores(query_terms)?
            .into_iter()
            .map(|hit| hit.doc_id)
            .collect())
    }

    /// Like [`search`](Self::search), keeping each document's score.
    pub fn search_with_scores<S: AsRef<str>>(&self, query_terms: &[S]) -> Result<Vec<SearchHit>> {
        Ok(searcher::search_with(
            query_terms,
            &self.normalizer,
            self.store.as_ref(),
        ))
    }

    /// Split a free-text query on whitespace and search for its parts.
    pub fn search_text(&self, query: &str) -> Result<Vec<String>> {
        let terms: Vec<&str> = WhitespaceTokenizer::split(query).collect();
        self.search(&terms)
    }

    /// Distinct document IDs ever indexed.
    pub fn document_count(&self) -> Result<u64> {
        self.store.document_count()
    }

    /// Document and term counts of the index.
    pub fn stats(&self) -> Result<IndexStats> {
        Ok(IndexStats {
            document_count: self.store.document_count()?,
            term_count: self.store.terms()?.len(),
            store: self.store.name().to_string(),
        })
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::in_memory(EngineOptions::default())
    }
}

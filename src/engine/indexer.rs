//! Indexing: diff a document against its previous version and update the
//! store's statistics.
//!
//! For every term the stored weight is `tf * idf` where
//!
//! - `tf` is the running ratio `occurrences so far / terms so far` taken at
//!   the term's *last* occurrence in the document (not `occurrences / length`);
//! - `idf = ln(1 + N / df)`, with `N` already counting this document and `df`
//!   the number of documents holding the term once this one is included.
//!
//! The sequence of store writes is not atomic. Callers sharing a store must
//! serialize index calls; [`Engine`](crate::engine::Engine) does so with a lock.

use ahash::AHashMap;
use log::{debug, trace};

use crate::analysis::normalizer::Normalizer;
use crate::document::Document;
use crate::engine::config::EngineOptions;
use crate::error::Result;
use crate::storage::{StatisticsStore, TermSet, WeightMap};

/// The `(tf, idf)` pair recorded for one term during a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermScore {
    /// Running term frequency at the term's last occurrence.
    pub tf: f64,
    /// Inverse document frequency.
    pub idf: f64,
}

impl TermScore {
    /// The weight stored for this term and document.
    pub fn weight(&self) -> f64 {
        self.tf * self.idf
    }
}

/// What an index call changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOutcome {
    /// The document ID had never been indexed before.
    pub first_time: bool,
    /// Normalized tokens processed.
    pub token_count: usize,
    /// Distinct terms in the new version.
    pub term_count: usize,
    /// Terms of the previous version that the new version no longer has.
    pub removed_terms: usize,
}

/// `idf = ln(1 + n / df)`.
pub fn inverse_document_frequency(document_count: u64, document_frequency: u64) -> f64 {
    (1.0 + document_count as f64 / document_frequency as f64).ln()
}

/// Single left-to-right pass computing the `(tf, idf)` of every term.
///
/// `previous` is the membership of the document's prior version (empty for
/// a first-time index); `stored_df` yields each term's stored document
/// frequency and is consulted once per distinct term.
pub fn score_terms<F>(
    terms: &[String],
    previous: &TermSet,
    document_count: u64,
    mut stored_df: F,
) -> Result<AHashMap<String, TermScore>>
where
    F: FnMut(&str) -> Result<u64>,
{
    let mut occurrences: AHashMap<&str, u64> = AHashMap::new();
    let mut idf_by_term: AHashMap<&str, f64> = AHashMap::new();
    let mut scores: AHashMap<String, TermScore> = AHashMap::new();
    let mut total = 0u64;

    for term in terms {
        let term = term.as_str();
        let count = occurrences.entry(term).or_insert(0);
        *count += 1;
        total += 1;
        let tf = *count as f64 / total as f64;

        let idf = match idf_by_term.get(term) {
            Some(idf) => *idf,
            None => {
                // A term new to this document gains it as a holder.
                let mut df = stored_df(term)?;
                if !previous.contains(term) {
                    df += 1;
                }
                let idf = inverse_document_frequency(document_count, df);
                idf_by_term.insert(term, idf);
                idf
            }
        };

        scores.insert(term.to_string(), TermScore { tf, idf });
    }

    Ok(scores)
}

/// Index `doc`, replacing any earlier version with the same ID.
pub fn index(doc: &Document, options: &EngineOptions, store: &dyn StatisticsStore) -> Result<()> {
    index_with(doc, &Normalizer::new(options), store).map(|_| ())
}

/// Index `doc` with an already-built normalizer.
pub fn index_with(
    doc: &Document,
    normalizer: &Normalizer,
    store: &dyn StatisticsStore,
) -> Result<IndexOutcome> {
    let doc_id = doc.id();

    let previous = store.load_membership(doc_id)?;
    let first_time = previous.is_none();
    let previous = previous.unwrap_or_default();

    let mut document_count = store.document_count()?;
    if first_time {
        document_count += 1;
        store.set_document_count(document_count)?;
    }

    let terms = normalizer.terms(doc.content())?;
    let scores = score_terms(&terms, &previous, document_count, |term| {
        store.document_frequency(term)
    })?;

    let current: TermSet = scores.keys().cloned().collect();

    for term in &current {
        let mut weights = load_or_default(store, term)?;
        weights.insert(doc_id.to_string(), scores[term].weight());
        store.save_weights(term, &weights)?;
    }

    let stale: Vec<&String> = previous.difference(&current).collect();
    for term in &stale {
        match store.load_weights(term) {
            Ok(mut weights) => {
                weights.remove(doc_id);
                store.save_weights(term, &weights)?;
                trace!("removed stale term '{term}' from '{doc_id}'");
            }
            Err(e) if e.is_not_found() => {
                trace!("stale term '{term}' of '{doc_id}' has no weight map");
            }
            Err(e) => return Err(e),
        }
    }

    store.save_membership(doc_id, &current)?;

    let outcome = IndexOutcome {
        first_time,
        token_count: terms.len(),
        term_count: current.len(),
        removed_terms: stale.len(),
    };
    debug!(
        "indexed '{doc_id}' ({}): {} tokens, {} terms, {} removed, N={document_count}",
        if first_time { "new" } else { "re-index" },
        outcome.token_count,
        outcome.term_count,
        outcome.removed_terms,
    );
    Ok(outcome)
}

fn load_or_default(store: &dyn StatisticsStore, term: &str) -> Result<WeightMap> {
    match store.load_weights(term) {
        Ok(weights) => Ok(weights),
        Err(e) if e.is_not_found() => Ok(WeightMap::new()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TermRankError;
    use crate::storage::memory::MemoryStore;

    const EPS: f64 = 1e-12;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn index_text(store: &MemoryStore, id: &str, text: &str) -> IndexOutcome {
        let normalizer = Normalizer::new(&EngineOptions::default());
        index_with(&Document::new(id, text), &normalizer, store).unwrap()
    }

    #[test]
    fn test_running_tf_last_occurrence_wins() {
        // a b a c: 'a' last seen at position 3 with 2 occurrences -> 2/3
        let scores = score_terms(&terms(&["a", "b", "a", "c"]), &TermSet::new(), 1, |_| Ok(0))
            .unwrap();

        assert!((scores["a"].tf - 2.0 / 3.0).abs() < EPS);
        assert!((scores["b"].tf - 1.0 / 2.0).abs() < EPS);
        assert!((scores["c"].tf - 1.0 / 4.0).abs() < EPS);
    }

    #[test]
    fn test_idf_counts_new_document() {
        let scores = score_terms(&terms(&["fox"]), &TermSet::new(), 2, |_| Ok(0)).unwrap();
        // df = 0 stored + 1 for this document
        assert!((scores["fox"].idf - 3.0f64.ln()).abs() < EPS);

        let previous: TermSet = ["fox".to_string()].into_iter().collect();
        let scores = score_terms(&terms(&["fox"]), &previous, 2, |_| Ok(1)).unwrap();
        // already counted in stored df
        assert!((scores["fox"].idf - 3.0f64.ln()).abs() < EPS);
    }

    #[test]
    fn test_stored_df_read_once_per_term() {
        let mut calls = 0;
        score_terms(&terms(&["a", "a", "b", "a"]), &TermSet::new(), 1, |_| {
            calls += 1;
            Ok(0)
        })
        .unwrap();
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_first_document_weights() {
        let store = MemoryStore::new_default();
        let outcome = index_text(&store, "t1", "Hello World");

        assert!(outcome.first_time);
        assert_eq!(outcome.token_count, 2);
        assert_eq!(outcome.term_count, 2);
        assert_eq!(store.document_count().unwrap(), 1);

        // N=1, df=1 -> idf = ln 2; "world" tf = 1/2 at its last occurrence
        let world = store.load_weights("world").unwrap();
        assert!((world["t1"] - 0.5 * 2.0f64.ln()).abs() < EPS);
        // "hello" tf = 1/1 at position 0
        let hello = store.load_weights("hello").unwrap();
        assert!((hello["t1"] - 2.0f64.ln()).abs() < EPS);
    }

    #[test]
    fn test_reindex_does_not_bump_count() {
        let store = MemoryStore::new_default();
        index_text(&store, "t1", "Hello World");
        let outcome = index_text(&store, "t1", "Hello World");

        assert!(!outcome.first_time);
        assert_eq!(store.document_count().unwrap(), 1);
        assert_eq!(store.document_frequency("hello").unwrap(), 1);
    }

    #[test]
    fn test_reindex_removes_stale_terms() {
        let store = MemoryStore::new_default();
        index_text(&store, "t1", "The quick brown fox");
        let outcome = index_text(&store, "t1", "Hello World");

        assert_eq!(outcome.removed_terms, 4);
        assert!(store.contains_term("fox").unwrap());
        assert!(store.load_weights("fox").unwrap().is_empty());

        let membership = store.load_membership("t1").unwrap().unwrap();
        assert_eq!(membership, ["hello", "world"].iter().map(|t| t.to_string()).collect());
    }

    #[test]
    fn test_reindex_with_new_term_has_finite_weight() {
        let store = MemoryStore::new_default();
        index_text(&store, "t1", "Hello World");
        index_text(&store, "t1", "The quick brown fox");

        let fox = store.load_weights("fox").unwrap();
        assert!(fox["t1"].is_finite());
        assert!(fox["t1"] > 0.0);
    }

    #[test]
    fn test_empty_content_indexes_zero_terms() {
        let store = MemoryStore::new_default();
        let outcome = index_text(&store, "blank", " \t\n -- !! ");

        assert!(outcome.first_time);
        assert_eq!(outcome.term_count, 0);
        assert_eq!(store.document_count().unwrap(), 1);
        assert_eq!(store.load_membership("blank").unwrap(), Some(TermSet::new()));
        assert!(store.terms().unwrap().is_empty());
    }

    #[test]
    fn test_store_unavailable_is_propagated() {
        let store = MemoryStore::new_default();
        store.close();

        let result = index(
            &Document::new("t1", "Hello"),
            &EngineOptions::default(),
            &store,
        );
        assert!(matches!(result, Err(TermRankError::StoreUnavailable(_))));
    }

    #[test]
    fn test_inverse_document_frequency() {
        assert!((inverse_document_frequency(1, 1) - 2.0f64.ln()).abs() < EPS);
        assert!((inverse_document_frequency(9, 3) - 4.0f64.ln()).abs() < EPS);
    }
}

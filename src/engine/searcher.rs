//! Ranking: sum per-term weights per document and keep the best ten.

use std::cmp::Ordering;

use ahash::AHashMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::Normalizer;
use crate::engine::config::EngineOptions;
use crate::storage::StatisticsStore;

/// Upper bound on the number of documents a search returns.
pub const MAX_RESULTS: usize = 10;

/// A ranked document and its aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document ID.
    pub doc_id: String,
    /// Sum of the document's weights over the matched query terms.
    pub score: f64,
}

impl SearchHit {
    /// Highest score first, then ascending document ID.
    pub fn ranking(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

/// Search for `query_terms` and return the ranked document IDs.
pub fn search<S: AsRef<str>>(
    query_terms: &[S],
    options: &EngineOptions,
    store: &dyn StatisticsStore,
) -> Vec<String> {
    search_with(query_terms, &Normalizer::new(options), store)
        .into_iter()
        .map(|hit| hit.doc_id)
        .collect()
}

/// Search with an already-built normalizer, keeping the scores.
///
/// Each query term is normalized on its own. Terms that normalize to nothing
/// or that the store does not hold are skipped. A store failure on one term
/// is logged and that term skipped; the remaining terms are still scored.
/// A term given twice contributes twice.
pub fn search_with<S: AsRef<str>>(
    query_terms: &[S],
    normalizer: &Normalizer,
    store: &dyn StatisticsStore,
) -> Vec<SearchHit> {
    let mut scores: AHashMap<String, f64> = AHashMap::new();

    for raw in query_terms {
        let term = match normalizer.normalize(raw.as_ref()) {
            Ok(Some(term)) => term,
            Ok(None) => continue,
            Err(e) => {
                warn!("skipping query term '{}': {e}", raw.as_ref());
                continue;
            }
        };

        match store.contains_term(&term) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("skipping query term '{term}': {e}");
                continue;
            }
        }

        match store.load_weights(&term) {
            Ok(weights) => {
                for (doc_id, weight) in weights {
                    *scores.entry(doc_id).or_insert(0.0) += weight;
                }
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => warn!("skipping query term '{term}': {e}"),
        }
    }

    rank(scores, MAX_RESULTS)
}

/// Order accumulated scores and keep at most `limit` of them.
pub fn rank<I>(scores: I, limit: usize) -> Vec<SearchHit>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut hits: Vec<SearchHit> = scores
        .into_iter()
        .map(|(doc_id, score)| SearchHit { doc_id, score })
        .collect();
    hits.sort_by(SearchHit::ranking);
    hits.truncate(limit.min(MAX_RESULTS));
    hits
}

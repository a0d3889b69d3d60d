//! Term normalization shared by indexing and querying.
//!
//! Both sides of the engine must normalize identically or terms silently
//! fail to match, so a single [`Normalizer`] is built from the
//! [`EngineOptions`] and used for documents and queries alike.
//!
//! # Examples
//!
//! ```
//! use termrank::analysis::normalizer::Normalizer;
//! use termrank::engine::config::EngineOptions;
//!
//! let normalizer = Normalizer::new(&EngineOptions::default());
//! let terms = normalizer.terms("The quick, brown FOX!").unwrap();
//! assert_eq!(terms, vec!["the", "quick", "brown", "fox"]);
//!
//! assert_eq!(normalizer.normalize("Dog.").unwrap(), Some("dog".to_string()));
//! assert_eq!(normalizer.normalize("--").unwrap(), None);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token::{IntoTokenStream, Token};
use crate::analysis::token_filter::alphanumeric::AlphanumericFilter;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::remove_empty::RemoveEmptyFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::engine::config::EngineOptions;
use crate::error::Result;

/// Turns raw text into normalized terms.
#[derive(Clone, Debug)]
pub struct Normalizer {
    analyzer: PipelineAnalyzer,
    case_sensitive: bool,
}

impl Normalizer {
    /// Build the normalization pipeline for the given options.
    pub fn new(options: &EngineOptions) -> Self {
        let mut analyzer = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_filter(Arc::new(AlphanumericFilter::new()));
        if !options.case_sensitive {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        let analyzer = analyzer
            .add_filter(Arc::new(RemoveEmptyFilter::new()))
            .with_name(if options.case_sensitive {
                "terms_case_sensitive"
            } else {
                "terms"
            });

        Normalizer {
            analyzer,
            case_sensitive: options.case_sensitive,
        }
    }

    /// Normalize a single raw token with the same filters used for content.
    ///
    /// The token is not split on whitespace. Returns `None` when nothing
    /// alphanumeric survives; such a token is neither indexed nor searchable.
    pub fn normalize(&self, raw: &str) -> Result<Option<String>> {
        let token = vec![Token::new(raw, 0)].into_token_stream();
        Ok(self.analyzer.filter_tokens(token)?.next().map(|token| token.text))
    }

    /// Split content on whitespace and normalize every fragment, in order.
    pub fn terms(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }

    /// Whether this normalizer preserves case.
    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

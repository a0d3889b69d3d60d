//! Remove empty filter implementation.
//!
//! Runs last in the pipeline: anything emptied or stopped by an earlier
//! filter never reaches the indexer, so it does not count as a processed
//! token either.

use log::trace;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that removes empty and stopped tokens from the stream.
#[derive(Clone, Debug, Default)]
pub struct RemoveEmptyFilter;

impl RemoveEmptyFilter {
    /// Create a new remove empty filter.
    pub fn new() -> Self {
        RemoveEmptyFilter
    }
}

impl Filter for RemoveEmptyFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| {
                let keep = !token.is_stopped() && !token.text.is_empty();
                if !keep {
                    trace!(
                        "dropping token {} '{}' at bytes {}..{}",
                        token.position,
                        token.original_text.as_deref().unwrap_or(&token.text),
                        token.start_offset,
                        token.end_offset
                    );
                }
                keep
            })
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "remove_empty"
    }
}

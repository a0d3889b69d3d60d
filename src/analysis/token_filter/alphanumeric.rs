//! Alphanumeric filter implementation.

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::Result;

/// A filter that removes every character that is not an ASCII letter or digit.
///
/// Tokens left empty are marked as stopped so that a later
/// [`RemoveEmptyFilter`](super::remove_empty::RemoveEmptyFilter) drops them.
#[derive(Clone, Debug, Default)]
pub struct AlphanumericFilter;

impl AlphanumericFilter {
    /// Create a new alphanumeric filter.
    pub fn new() -> Self {
        AlphanumericFilter
    }

    /// Strip a single raw string.
    pub fn strip(text: &str) -> String {
        text.chars().filter(char::is_ascii_alphanumeric).collect()
    }
}

impl Filter for AlphanumericFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    return token;
                }
                let stripped = Self::strip(&token.text);
                if stripped.is_empty() {
                    token.stop()
                } else {
                    token.with_text(stripped)
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "alphanumeric"
    }
}

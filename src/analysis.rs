//! Text analysis for termrank.
//!
//! Raw document text is split into tokens, stripped down to ASCII letters
//! and digits, optionally lower-cased, and emptied tokens are dropped.

pub mod analyzer;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

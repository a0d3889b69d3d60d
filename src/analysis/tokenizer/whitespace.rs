//! Whitespace tokenizer implementation.

use super::Tokenizer;

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Characters that separate raw tokens in document content.
pub const SEPARATORS: [char; 4] = [' ', '\t', '\n', '\r'];

/// A tokenizer that splits text on space, tab, newline and carriage return.
///
/// Other Unicode whitespace (form feed, no-break space, ...) stays inside
/// the raw token; the alphanumeric filter strips it later. Empty fragments
/// between consecutive separators are discarded.
#[derive(Clone, Debug, Default)]
pub struct WhitespaceTokenizer;

impl WhitespaceTokenizer {
    /// Create a new whitespace tokenizer.
    pub fn new() -> Self {
        WhitespaceTokenizer
    }

    /// Split text into raw fragments without building tokens.
    pub fn split(text: &str) -> impl Iterator<Item = &str> {
        text.split(SEPARATORS).filter(|fragment| !fragment.is_empty())
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = Vec::new();
        let mut start = None;

        for (offset, ch) in text.char_indices() {
            if SEPARATORS.contains(&ch) {
                if let Some(begin) = start.take() {
                    tokens.push(Token::with_offsets(
                        &text[begin..offset],
                        tokens.len(),
                        begin,
                        offset,
                    ));
                }
            } else if start.is_none() {
                start = Some(offset);
            }
        }

        if let Some(begin) = start {
            tokens.push(Token::with_offsets(
                &text[begin..],
                tokens.len(),
                begin,
                text.len(),
            ));
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whitespace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_tokenizer() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens: Vec<Token> = tokenizer
            .tokenize("hello  world\ttest\r\nagain")
            .unwrap()
            .collect();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[2].text, "test");
        assert_eq!(tokens[3].text, "again");
        assert_eq!(tokens[3].position, 3);
    }

    #[test]
    fn test_offsets() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize(" ab  cd").unwrap().collect();

        assert_eq!((tokens[0].start_offset, tokens[0].end_offset), (1, 3));
        assert_eq!((tokens[1].start_offset, tokens[1].end_offset), (5, 7));
    }

    #[test]
    fn test_only_four_separators() {
        let tokenizer = WhitespaceTokenizer::new();
        let tokens: Vec<Token> = tokenizer.tokenize("a\u{000C}b c").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "a\u{000C}b");
    }

    #[test]
    fn test_empty_and_blank_input() {
        let tokenizer = WhitespaceTokenizer::new();
        assert_eq!(tokenizer.tokenize("").unwrap().count(), 0);
        assert_eq!(tokenizer.tokenize(" \t\r\n ").unwrap().count(), 0);
    }

    #[test]
    fn test_split_matches_tokenize() {
        let text = "The quick\tbrown\n\nfox";
        let split: Vec<&str> = WhitespaceTokenizer::split(text).collect();
        let tokens: Vec<String> = WhitespaceTokenizer::new()
            .tokenize(text)
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(split, tokens);
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(WhitespaceTokenizer::new().name(), "whitespace");
    }
}

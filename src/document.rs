//! Documents handed to the engine for indexing.
//!
//! A [`Document`] is an ID plus raw text. The ID is the caller's identity for
//! the content: indexing the same ID again replaces what was indexed before.
//!
//! # Examples
//!
//! ```
//! use termrank::document::Document;
//!
//! let doc = Document::new("notes/today.txt", "Buy milk. Call Bob.");
//! assert_eq!(doc.id(), "notes/today.txt");
//! assert_eq!(doc.to_string(), "notes/today.txt");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A document to index: a caller-supplied ID and its raw content.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    id: String,
    content: String,
}

impl Document {
    /// Create a document from an ID and its raw content.
    pub fn new<I: Into<String>, C: Into<String>>(id: I, content: C) -> Self {
        Document {
            id: id.into(),
            content: content.into(),
        }
    }

    /// The caller-supplied identity of this document.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The raw, unnormalized content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Split into `(id, content)`.
    pub fn into_parts(self) -> (String, String) {
        (self.id, self.content)
    }
}

// Identity is the ID alone; two versions of the same document are equal.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

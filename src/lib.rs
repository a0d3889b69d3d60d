//! # TermRank
//!
//! A small TF-IDF document index for Rust.
//!
//! ## Features
//!
//! - Incremental re-indexing that never leaks stale term associations
//! - Deterministic, bounded ranking of multi-term queries
//! - Pluggable statistics storage (in-memory or file-backed)
//! - Configurable case sensitivity

pub mod analysis;
pub mod cli;
pub mod document;
pub mod engine;
pub mod error;
pub mod storage;

pub mod prelude {
    pub use crate::document::Document;
    pub use crate::engine::config::{EngineConfig, EngineOptions};
    pub use crate::engine::searcher::SearchHit;
    pub use crate::engine::{Engine, IndexStats};
    pub use crate::error::{Result, TermRankError};
    pub use crate::storage::StatisticsStore;
    pub use crate::storage::file::{FileStore, FileStoreConfig};
    pub use crate::storage::memory::MemoryStore;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Command line interface for indexing and searching directories of text files.

pub mod args;
pub mod commands;
pub mod output;

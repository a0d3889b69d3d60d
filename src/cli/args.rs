//! Command line argument parsing for the TermRank CLI using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// TermRank - index text files and rank them for multi-term queries
#[derive(Parser, Debug, Clone)]
#[command(name = "termrank")]
#[command(about = "Index text files and rank them for multi-term queries with TF-IDF")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TermRankArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TermRankArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Index every file directly inside a directory
    Index(IndexArgs),

    /// Search the index
    Search(SearchArgs),

    /// Show index statistics
    Stats(StatsArgs),
}

/// Where the index lives and how terms are normalized.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Index directory
    #[arg(short, long, value_name = "STORE_DIR", env = "TERMRANK_STORE")]
    pub store: Option<PathBuf>,

    /// Engine configuration file (JSON); overrides --store
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Keep the case of terms
    #[arg(long)]
    pub case_sensitive: bool,

    /// Flush every store write to disk
    #[arg(long)]
    pub sync_writes: bool,
}

/// Arguments for indexing a directory
#[derive(Parser, Debug, Clone)]
pub struct IndexArgs {
    /// Directory of text files to index
    #[arg(value_name = "DOCUMENTS_DIR")]
    pub documents_dir: PathBuf,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Query terms; `a|b|c` is accepted as three terms
    #[arg(value_name = "TERM", required = true, num_args = 1..)]
    pub terms: Vec<String>,

    /// Print scores alongside document IDs
    #[arg(long)]
    pub scores: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

impl SearchArgs {
    /// Query terms with `|`-separated lists expanded.
    pub fn query_terms(&self) -> Vec<String> {
        self.terms
            .iter()
            .flat_map(|arg| arg.split('|'))
            .map(str::to_string)
            .collect()
    }
}

/// Arguments for showing statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

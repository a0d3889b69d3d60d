//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TermRankArgs};
use crate::engine::IndexStats;
use crate::engine::searcher::SearchHit;
use crate::error::Result;

/// A command result that can also be printed for people.
pub trait Report: Serialize {
    /// Print the human-readable form to stdout.
    fn print_human(&self);
}

/// Result structure for indexing a directory.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexReport {
    pub documents_dir: String,
    pub documents_indexed: usize,
    pub files_skipped: usize,
    pub document_count: u64,
    pub duration_ms: u64,
}

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchReport {
    pub query: Vec<String>,
    pub hits: Vec<SearchHit>,
    pub duration_ms: u64,
    #[serde(skip)]
    pub show_scores: bool,
}

impl Report for IndexReport {
    fn print_human(&self) {
        println!(
            "Indexed {} documents from {} ({} skipped) in {} ms",
            self.documents_indexed, self.documents_dir, self.files_skipped, self.duration_ms
        );
        println!("Documents in index: {}", self.document_count);
    }
}

impl Report for SearchReport {
    fn print_human(&self) {
        if self.hits.is_empty() {
            println!("No results.");
            return;
        }
        for hit in &self.hits {
            if self.show_scores {
                println!("Result: {} ({:.6})", hit.doc_id, hit.score);
            } else {
                println!("Result: {}", hit.doc_id);
            }
        }
    }
}

impl Report for IndexStats {
    fn print_human(&self) {
        println!("Index Statistics:");
        println!("═════════════════");
        println!("Store: {}", self.store);
        println!("Documents: {}", self.document_count);
        println!("Terms: {}", self.term_count);
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Report>(message: &str, result: &T, args: &TermRankArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Report>(message: &str, result: &T, args: &TermRankArgs) -> Result<()> {
    if args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    result.print_human();
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &TermRankArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_report_json_omits_flag() {
        let report = SearchReport {
            query: vec!["fox".to_string()],
            hits: vec![SearchHit {
                doc_id: "t1".to_string(),
                score: 0.5,
            }],
            duration_ms: 1,
            show_scores: true,
        };
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["hits"][0]["doc_id"], "t1");
        assert!(value.get("show_scores").is_none());
    }
}

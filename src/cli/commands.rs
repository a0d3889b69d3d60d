//! Command implementations for the TermRank CLI.

use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{info, warn};
use rayon::prelude::*;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::document::Document;
use crate::engine::Engine;
use crate::engine::config::{EngineConfig, EngineOptions};
use crate::error::{Result, TermRankError};
use crate::storage::StoreConfig;
use crate::storage::file::FileStoreConfig;

/// Execute a CLI command.
pub fn execute_command(args: TermRankArgs) -> Result<()> {
    match &args.command {
        Command::Index(index_args) => index_directory(index_args, &args),
        Command::Search(search_args) => search_index(search_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
    }
}

/// Resolve the engine configuration from the store arguments.
///
/// A configuration file wins over `--store`; `--case-sensitive` and
/// `--sync-writes` are applied on top of either.
pub fn engine_config(store_args: &StoreArgs) -> Result<EngineConfig> {
    let mut config = match (&store_args.config, &store_args.store) {
        (Some(path), _) => EngineConfig::from_json_file(path)?,
        (None, Some(directory)) => EngineConfig {
            options: EngineOptions::default(),
            store: StoreConfig::File(FileStoreConfig::new(directory)),
        },
        (None, None) => {
            return Err(TermRankError::invalid_config(
                "an index directory (--store) or a config file (--config) is required",
            ));
        }
    };

    if store_args.case_sensitive {
        config.options.case_sensitive = true;
    }
    if store_args.sync_writes
        && let StoreConfig::File(file_config) = &mut config.store
    {
        file_config.sync_writes = true;
    }

    Ok(config)
}

/// Read every regular file directly inside `dir`, in path order.
///
/// Files are read in parallel. The document ID is the file path. Files that
/// cannot be read as UTF-8 text are skipped; the second value counts them.
pub fn read_documents(dir: &Path) -> Result<(Vec<Document>, usize)> {
    if !dir.is_dir() {
        return Err(TermRankError::invalid_config(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let loaded: Vec<Option<Document>> = paths
        .par_iter()
        .map(|path| match fs::read_to_string(path) {
            Ok(content) => Some(Document::new(path.to_string_lossy(), content)),
            Err(e) => {
                warn!("skipping {}: {e}", path.display());
                None
            }
        })
        .collect();

    let skipped = loaded.iter().filter(|doc| doc.is_none()).count();
    Ok((loaded.into_iter().flatten().collect(), skipped))
}

/// Index a directory of text files.
fn index_directory(args: &IndexArgs, cli_args: &TermRankArgs) -> Result<()> {
    let engine = engine_config(&args.store)?.build()?;
    let start_time = Instant::now();

    let (documents, files_skipped) = read_documents(&args.documents_dir)?;
    info!(
        "indexing {} documents from {}",
        documents.len(),
        args.documents_dir.display()
    );
    let documents_indexed = engine.index_all(documents)?;

    output_result(
        "Documents indexed successfully",
        &IndexReport {
            documents_dir: args.documents_dir.to_string_lossy().to_string(),
            documents_indexed,
            files_skipped,
            document_count: engine.document_count()?,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Search the index.
fn search_index(args: &SearchArgs, cli_args: &TermRankArgs) -> Result<()> {
    let engine = open_engine(&args.store)?;
    let start_time = Instant::now();

    let query = args.query_terms();
    let hits = engine.search_with_scores(&query)?;

    output_result(
        "Search completed",
        &SearchReport {
            query,
            hits,
            duration_ms: start_time.elapsed().as_millis() as u64,
            show_scores: args.scores,
        },
        cli_args,
    )
}

/// Show index statistics.
fn show_stats(args: &StatsArgs, cli_args: &TermRankArgs) -> Result<()> {
    let engine = open_engine(&args.store)?;
    output_result("Index statistics", &engine.stats()?, cli_args)
}

/// Build an engine for reading, refusing to create a missing index directory.
fn open_engine(store_args: &StoreArgs) -> Result<Engine> {
    let config = engine_config(store_args)?;
    if let StoreConfig::File(file_config) = &config.store
        && !file_config.directory.exists()
    {
        return Err(TermRankError::invalid_config(format!(
            "index directory {} does not exist",
            file_config.directory.display()
        )));
    }
    config.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn store_args(store: Option<PathBuf>) -> StoreArgs {
        StoreArgs {
            store,
            config: None,
            case_sensitive: false,
            sync_writes: false,
        }
    }

    #[test]
    fn test_engine_config_from_store_dir() {
        let mut args = store_args(Some(PathBuf::from("idx")));
        args.case_sensitive = true;
        args.sync_writes = true;

        let config = engine_config(&args).unwrap();
        assert!(config.options.case_sensitive);
        match config.store {
            StoreConfig::File(file_config) => {
                assert_eq!(file_config.directory, PathBuf::from("idx"));
                assert!(file_config.sync_writes);
            }
            other => panic!("unexpected store: {other:?}"),
        }
    }

    #[test]
    fn test_engine_config_requires_location() {
        let result = engine_config(&store_args(None));
        assert!(matches!(result, Err(TermRankError::InvalidConfig(_))));
    }

    #[test]
    fn test_read_documents_sorted_and_flat() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "Hello World").unwrap();
        fs::write(dir.path().join("a.txt"), "The quick brown fox").unwrap();
        fs::write(dir.path().join("binary.bin"), [0xff, 0xfe, 0x00]).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "ignored").unwrap();

        let (documents, skipped) = read_documents(dir.path()).unwrap();

        assert_eq!(skipped, 1);
        assert_eq!(documents.len(), 2);
        assert!(documents[0].id().ends_with("a.txt"));
        assert!(documents[1].id().ends_with("b.txt"));
        assert_eq!(documents[1].content(), "Hello World");
    }

    #[test]
    fn test_read_documents_rejects_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "text").unwrap();

        assert!(read_documents(&file).is_err());
    }

    #[test]
    fn test_open_engine_requires_existing_index() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let result = open_engine(&store_args(Some(missing)));
        assert!(matches!(result, Err(TermRankError::InvalidConfig(_))));
    }

    #[test]
    fn test_index_then_search_directory() {
        let docs = TempDir::new().unwrap();
        let index = TempDir::new().unwrap();
        fs::write(docs.path().join("t1.txt"), "The quick brown fox").unwrap();
        fs::write(docs.path().join("t2.txt"), "Hello World").unwrap();

        let args = store_args(Some(index.path().to_path_buf()));
        let engine = engine_config(&args).unwrap().build().unwrap();
        let (documents, _) = read_documents(docs.path()).unwrap();
        assert_eq!(engine.index_all(documents).unwrap(), 2);
        drop(engine);

        let engine = open_engine(&args).unwrap();
        let ids = engine.search(&["fox"]).unwrap();
        assert_eq!(ids.len(), 1);
        assert!(ids[0].ends_with("t1.txt"));
    }
}

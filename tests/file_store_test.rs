//! File-backed index persistence.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;
use termrank::document::Document;
use termrank::engine::Engine;
use termrank::engine::config::{EngineConfig, EngineOptions};
use termrank::error::{Result, TermRankError};
use termrank::storage::file::{FileStore, FileStoreConfig, encode_key};
use termrank::storage::{StatisticsStore, StoreConfig};

fn file_engine(dir: &TempDir) -> Result<Engine> {
    let store = FileStore::open_dir(dir.path())?;
    Ok(Engine::new(EngineOptions::default(), Arc::new(store)))
}

#[test]
fn test_index_survives_reopen() -> Result<()> {
    let dir = TempDir::new()?;
    {
        let engine = file_engine(&dir)?;
        engine.index(&Document::new("t1", "The quick brown fox"))?;
        engine.index(&Document::new("t2", "Hello World"))?;
    }

    let engine = file_engine(&dir)?;
    assert_eq!(engine.document_count()?, 2);
    assert_eq!(engine.search(&["fox"])?, vec!["t1"]);

    // A re-index after reopening is still recognized as a re-index
    engine.index(&Document::new("t1", "Hello again"))?;
    assert_eq!(engine.document_count()?, 2);
    assert!(engine.search(&["fox"])?.is_empty());
    assert_eq!(engine.search(&["hello"])?.len(), 2);
    Ok(())
}

#[test]
fn test_unusual_ids_and_terms() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = file_engine(&dir)?;
    let long_id = format!("/very/{}/deep.txt", "nested/".repeat(80));

    engine.index(&Document::new("../../etc/passwd", "escape attempt"))?;
    engine.index(&Document::new("C:\\docs\\a b.txt", "windows path"))?;
    engine.index(&Document::new(long_id.clone(), "long identifier"))?;
    engine.index(&Document::new("long", "x".repeat(500)))?;

    assert_eq!(engine.search(&["escape"])?, vec!["../../etc/passwd"]);
    assert_eq!(engine.search(&["windows"])?, vec!["C:\\docs\\a b.txt"]);
    assert_eq!(engine.search(&["identifier"])?, vec![long_id]);
    assert_eq!(engine.search(&["x".repeat(500)])?, vec!["long"]);

    for entry in fs::read_dir(dir.path())? {
        let name = entry?.file_name();
        assert!(["terms", "docs", "meta.json"].contains(&name.to_string_lossy().as_ref()));
    }
    Ok(())
}

#[test]
fn test_config_file_store() -> Result<()> {
    let dir = TempDir::new()?;
    let mut file_config = FileStoreConfig::new(dir.path().join("index"));
    file_config.sync_writes = true;

    let config = EngineConfig {
        options: EngineOptions::case_sensitive(true),
        store: StoreConfig::File(file_config),
    };
    let engine = config.build()?;
    engine.index(&Document::new("t1", "FoX"))?;

    assert_eq!(engine.search(&["FoX"])?, vec!["t1"]);
    assert!(engine.search(&["fox"])?.is_empty());
    assert!(dir.path().join("index").join("meta.json").exists());
    Ok(())
}

#[test]
fn test_corrupt_record_is_store_unavailable() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = file_engine(&dir)?;
    engine.index(&Document::new("t1", "fox"))?;

    for entry in fs::read_dir(dir.path().join("terms"))? {
        fs::write(entry?.path(), b"garbage")?;
    }

    let result = engine.index(&Document::new("t2", "fox"));
    assert!(matches!(result, Err(TermRankError::StoreUnavailable(_))));

    // Search degrades to no match instead of failing
    assert!(engine.search(&["fox"])?.is_empty());
    Ok(())
}

#[test]
fn test_search_continues_past_corrupt_term() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = file_engine(&dir)?;
    engine.index(&Document::new("t1", "fox"))?;
    engine.index(&Document::new("t2", "dog"))?;

    let fox_record = dir
        .path()
        .join("terms")
        .join(format!("{}.term", encode_key("fox")));
    assert!(fox_record.exists());
    fs::write(&fox_record, b"garbage")?;

    // The unreadable term is skipped; the other term is still scored
    assert_eq!(engine.search(&["fox", "dog"])?, vec!["t2"]);
    assert_eq!(engine.search(&["dog", "fox"])?, vec!["t2"]);
    assert!(engine.search(&["fox"])?.is_empty());
    Ok(())
}

#[test]
fn test_closed_file_store() -> Result<()> {
    let dir = TempDir::new()?;
    let store = Arc::new(FileStore::open_dir(dir.path())?);
    let engine = Engine::new(EngineOptions::default(), store.clone());
    engine.index(&Document::new("t1", "fox"))?;

    store.close();
    let result = engine.index(&Document::new("t2", "fox"));
    assert!(matches!(result, Err(TermRankError::StoreUnavailable(_))));
    assert!(engine.document_count().is_err());
    assert!(store.terms().is_err());
    Ok(())
}

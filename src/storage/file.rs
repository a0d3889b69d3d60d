//! Directory-backed statistics store.
//!
//! Layout under the configured directory:
//!
//! ```text
//! meta.json          format version, document counter, last update time
//! terms/<key>.term   one weight map per term
//! docs/<key>.doc     one membership record per document
//! ```
//!
//! `<key>` is the lower-case hex encoding of the term or document ID, so any
//! ID is a valid file name on any filesystem and case-distinct terms never
//! collide on case-insensitive volumes. Keys whose encoding would exceed
//! [`MAX_ENCODED_KEY`] keep a prefix plus a CRC32 of the full key; the full
//! key is stored inside the record and checked on load.
//!
//! Record files are framed as `[u32 LE payload length][u32 LE crc32][bincode payload]`.
//! Every write goes to a `.tmp` sibling first and is renamed into place.

use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TermRankError};
use crate::storage::{StatisticsStore, TermSet, WeightMap};

/// Current on-disk format version written to `meta.json`.
pub const FORMAT_VERSION: u32 = 1;

/// Longest hex-encoded key used verbatim as a file stem.
pub const MAX_ENCODED_KEY: usize = 200;

const META_FILE: &str = "meta.json";
const TERMS_DIR: &str = "terms";
const DOCS_DIR: &str = "docs";
const TERM_SUFFIX: &str = "term";
const DOC_SUFFIX: &str = "doc";
/// Length plus checksum, both `u32` little-endian.
const RECORD_HEADER_LEN: u64 = 8;

fn default_buffer_size() -> usize {
    65536
}

/// Configuration for [`FileStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStoreConfig {
    /// Root directory of the store. Created on open if missing.
    pub directory: PathBuf,

    /// `fsync` every record before it is renamed into place.
    #[serde(default)]
    pub sync_writes: bool,

    /// Buffer size for record reads and writes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl FileStoreConfig {
    /// Create a configuration for the given directory with default settings.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        FileStoreConfig {
            directory: directory.as_ref().to_path_buf(),
            sync_writes: false,
            buffer_size: default_buffer_size(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreMeta {
    format_version: u32,
    document_count: u64,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TermRecord {
    term: String,
    weights: WeightMap,
}

#[derive(Debug, Serialize, Deserialize)]
struct DocRecord {
    doc_id: String,
    terms: TermSet,
}

/// A statistics store persisted as files in one directory.
#[derive(Debug)]
pub struct FileStore {
    config: FileStoreConfig,
    closed: AtomicBool,
}

impl FileStore {
    /// Open the store at `config.directory`, creating the layout if needed.
    pub fn open(config: FileStoreConfig) -> Result<Self> {
        let directory = &config.directory;

        if directory.exists() && !directory.is_dir() {
            return Err(TermRankError::store_unavailable(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        for sub in [TERMS_DIR, DOCS_DIR] {
            fs::create_dir_all(directory.join(sub)).map_err(|e| {
                TermRankError::store_unavailable(format!(
                    "Failed to create directory {}: {e}",
                    directory.join(sub).display()
                ))
            })?;
        }

        let store = FileStore {
            config,
            closed: AtomicBool::new(false),
        };

        if let Some(meta) = store.read_meta()?
            && meta.format_version != FORMAT_VERSION
        {
            return Err(TermRankError::store_unavailable(format!(
                "Unsupported store format version {} (expected {FORMAT_VERSION})",
                meta.format_version
            )));
        }

        debug!("opened file store at {}", store.config.directory.display());
        Ok(store)
    }

    /// Open the store in `directory` with default settings.
    pub fn open_dir<P: AsRef<Path>>(directory: P) -> Result<Self> {
        Self::open(FileStoreConfig::new(directory))
    }

    /// The root directory of this store.
    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Close the store; every later operation fails with `StoreUnavailable`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn check_closed(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(TermRankError::store_unavailable("file store is closed"))
        } else {
            Ok(())
        }
    }

    fn term_path(&self, term: &str) -> PathBuf {
        self.config
            .directory
            .join(TERMS_DIR)
            .join(format!("{}.{TERM_SUFFIX}", encode_key(term)))
    }

    fn doc_path(&self, doc_id: &str) -> PathBuf {
        self.config
            .directory
            .join(DOCS_DIR)
            .join(format!("{}.{DOC_SUFFIX}", encode_key(doc_id)))
    }

    fn meta_path(&self) -> PathBuf {
        self.config.directory.join(META_FILE)
    }

    fn read_meta(&self) -> Result<Option<StoreMeta>> {
        let file = match File::open(self.meta_path()) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(unavailable(&self.meta_path(), e)),
        };
        let meta = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            TermRankError::store_unavailable(format!(
                "corrupt {}: {e}",
                self.meta_path().display()
            ))
        })?;
        Ok(Some(meta))
    }

    fn write_meta(&self, meta: &StoreMeta) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(meta)?;
        self.replace_file(&self.meta_path(), &bytes)
    }

    /// Write `bytes` to a temporary sibling, then rename it over `path`.
    fn replace_file(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let tmp_path = path.with_extension("tmp");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|e| unavailable(&tmp_path, e))?;

        let mut writer = BufWriter::with_capacity(self.config.buffer_size, file);
        writer
            .write_all(bytes)
            .and_then(|_| writer.flush())
            .map_err(|e| unavailable(&tmp_path, e))?;

        if self.config.sync_writes {
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| unavailable(&tmp_path, e))?;
        }
        drop(writer);

        fs::rename(&tmp_path, path).map_err(|e| unavailable(path, e))
    }

    fn write_record<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        let payload = bincode::serialize(record)?;
        let len = u32::try_from(payload.len()).map_err(|_| {
            TermRankError::serialization(format!("record too large: {} bytes", payload.len()))
        })?;

        let mut framed = Vec::with_capacity(payload.len() + RECORD_HEADER_LEN as usize);
        framed.write_u32::<LittleEndian>(len)?;
        framed.write_u32::<LittleEndian>(crc32fast::hash(&payload))?;
        framed.extend_from_slice(&payload);

        self.replace_file(path, &framed)
    }

    fn read_record<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(unavailable(path, e)),
        };
        let file_len = file.metadata().map_err(|e| unavailable(path, e))?.len();
        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);

        let corrupt = |what: &str| {
            TermRankError::store_unavailable(format!("corrupt record {}: {what}", path.display()))
        };

        let len = reader
            .read_u32::<LittleEndian>()
            .map_err(|_| corrupt("truncated header"))?;
        let checksum = reader
            .read_u32::<LittleEndian>()
            .map_err(|_| corrupt("truncated header"))?;

        // The header is untrusted until the checksum matches
        if u64::from(len) > file_len.saturating_sub(RECORD_HEADER_LEN) {
            return Err(corrupt("length exceeds file size"));
        }

        let mut payload = vec![0u8; len as usize];
        reader
            .read_exact(&mut payload)
            .map_err(|_| corrupt("truncated payload"))?;

        if crc32fast::hash(&payload) != checksum {
            return Err(corrupt("checksum mismatch"));
        }

        let record = bincode::deserialize(&payload).map_err(|e| corrupt(&e.to_string()))?;
        Ok(Some(record))
    }

    fn read_term_record(&self, term: &str) -> Result<Option<TermRecord>> {
        let path = self.term_path(term);
        match self.read_record::<TermRecord>(&path)? {
            Some(record) if record.term != term => Err(TermRankError::store_unavailable(format!(
                "record {} belongs to term '{}', not '{term}'",
                path.display(),
                record.term
            ))),
            other => Ok(other),
        }
    }
}

impl StatisticsStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn contains_term(&self, term: &str) -> Result<bool> {
        self.check_closed()?;
        Ok(self.term_path(term).is_file())
    }

    fn load_weights(&self, term: &str) -> Result<WeightMap> {
        self.check_closed()?;
        self.read_term_record(term)?
            .map(|record| record.weights)
            .ok_or_else(|| TermRankError::not_found(format!("term '{term}'")))
    }

    fn save_weights(&self, term: &str, weights: &WeightMap) -> Result<()> {
        self.check_closed()?;
        let record = TermRecord {
            term: term.to_string(),
            weights: weights.clone(),
        };
        self.write_record(&self.term_path(term), &record)
    }

    fn document_count(&self) -> Result<u64> {
        self.check_closed()?;
        Ok(self.read_meta()?.map_or(0, |meta| meta.document_count))
    }

    fn set_document_count(&self, count: u64) -> Result<()> {
        self.check_closed()?;
        self.write_meta(&StoreMeta {
            format_version: FORMAT_VERSION,
            document_count: count,
            updated_at: Utc::now(),
        })
    }

    fn load_membership(&self, doc_id: &str) -> Result<Option<TermSet>> {
        self.check_closed()?;
        let path = self.doc_path(doc_id);
        match self.read_record::<DocRecord>(&path)? {
            Some(record) if record.doc_id != doc_id => {
                Err(TermRankError::store_unavailable(format!(
                    "record {} belongs to document '{}', not '{doc_id}'",
                    path.display(),
                    record.doc_id
                )))
            }
            Some(record) => Ok(Some(record.terms)),
            None => Ok(None),
        }
    }

    fn save_membership(&self, doc_id: &str, terms: &TermSet) -> Result<()> {
        self.check_closed()?;
        let record = DocRecord {
            doc_id: doc_id.to_string(),
            terms: terms.clone(),
        };
        self.write_record(&self.doc_path(doc_id), &record)
    }

    fn terms(&self) -> Result<Vec<String>> {
        self.check_closed()?;
        let terms_dir = self.config.directory.join(TERMS_DIR);
        let entries = fs::read_dir(&terms_dir).map_err(|e| unavailable(&terms_dir, e))?;

        let mut terms = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| unavailable(&terms_dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TERM_SUFFIX) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let term = match decode_key(stem) {
                Some(term) => term,
                // Shortened key: the record carries the full term.
                None => match self.read_record::<TermRecord>(&path)? {
                    Some(record) => record.term,
                    None => continue,
                },
            };
            terms.push(term);
        }

        terms.sort();
        Ok(terms)
    }
}

fn unavailable(path: &Path, err: io::Error) -> TermRankError {
    TermRankError::store_unavailable(format!("{}: {err}", path.display()))
}

/// Encode a key as a file stem.
pub fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len() * 2);
    for byte in key.bytes() {
        let _ = write!(encoded, "{byte:02x}");
    }

    if encoded.len() > MAX_ENCODED_KEY {
        encoded.truncate(MAX_ENCODED_KEY - 9);
        let _ = write!(encoded, "-{:08x}", crc32fast::hash(key.as_bytes()));
    }
    encoded
}

/// Decode a file stem produced by [`encode_key`].
///
/// Returns `None` for shortened stems and anything that is not valid hex
/// of a UTF-8 string.
pub fn decode_key(stem: &str) -> Option<String> {
    if stem.len() % 2 != 0 || !stem.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let bytes = (0..stem.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&stem[i..i + 2], 16))
        .collect::<std::result::Result<Vec<u8>, _>>()
        .ok()?;
    String::from_utf8(bytes).ok()
}

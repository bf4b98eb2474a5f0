use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{Result, ShabdError};
use super::tables::{PhraseMap, TrainingPair, WordMap};

/// Locations of the three persisted documents: word map, phrase map and training corpus.
///
/// All documents are pretty-printed UTF-8 JSON with non-ASCII text stored literally.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    word_map_path: PathBuf,
    phrase_map_path: PathBuf,
    corpus_path: PathBuf,
}

impl DocumentStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            word_map_path: config.word_map_path(),
            phrase_map_path: config.phrase_map_path(),
            corpus_path: config.corpus_path(),
        }
    }

    pub fn load_word_map(&self) -> Result<Option<WordMap>> {
        read_document(&self.word_map_path)
    }

    pub fn load_phrase_map(&self) -> Result<Option<PhraseMap>> {
        read_document(&self.phrase_map_path)
    }

    pub fn load_corpus(&self) -> Result<Option<Vec<TrainingPair>>> {
        read_document(&self.corpus_path)
    }

    pub fn save_word_map(&self, word_map: &WordMap) -> Result<()> {
        write_document(&self.word_map_path, word_map)
    }

    pub fn save_phrase_map(&self, phrase_map: &PhraseMap) -> Result<()> {
        write_document(&self.phrase_map_path, phrase_map)
    }

    pub fn save_corpus(&self, corpus: &[TrainingPair]) -> Result<()> {
        write_document(&self.corpus_path, corpus)
    }
}

/// A missing file is `None`; an unreadable or unparseable one is an error.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        debug!("Document not found: {}", path.display());
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ShabdError::Persistence(format!("Failed to read {}: {}", path.display(), e)))?;

    let value = serde_json::from_str(&content)
        .map_err(|e| ShabdError::Persistence(format!("Failed to parse {}: {}", path.display(), e)))?;

    debug!("Loaded document: {}", path.display());
    Ok(Some(value))
}

/// Write to a temporary file next to `path`, then rename it into place
fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)
        .map_err(|e| ShabdError::Persistence(format!("Failed to create {}: {}", parent_dir.display(), e)))?;

    let temp_file = NamedTempFile::new_in(parent_dir)
        .map_err(|e| ShabdError::Persistence(format!("Failed to create temporary file: {}", e)))?;

    {
        let mut writer = BufWriter::new(temp_file.as_file());
        serde_json::to_writer_pretty(&mut writer, value)
            .map_err(|e| ShabdError::Persistence(format!("Failed to serialize {}: {}", path.display(), e)))?;
        writer
            .flush()
            .map_err(|e| ShabdError::Persistence(format!("Failed to write {}: {}", path.display(), e)))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| ShabdError::Persistence(format!("Failed to replace {}: {}", path.display(), e.error)))?;

    info!("Saved document: {}", path.display());
    Ok(())
}

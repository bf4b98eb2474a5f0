// Lookup store: the word and phrase tables plus their persisted documents
//
// Readers take an immutable snapshot and never block each other. Writers are serialized,
// build the next tables off a private copy and publish them with a single pointer swap,
// so a reader sees either the old or the new tables and never a half-applied update.

pub mod documents;
pub mod tables;

use parking_lot::{Mutex, MutexGuard, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

pub use documents::DocumentStore;
pub use tables::{LookupTables, PhraseMap, TrainingPair, WordMap};

use crate::config::StoreConfig;
use crate::error::Result;

pub struct LookupStore {
    tables: RwLock<Arc<LookupTables>>,
    loaded: AtomicBool,
    writer: Mutex<()>,
    documents: DocumentStore,
}

/// Exclusive access for one mutation. Held for the whole read-modify-write-persist cycle.
pub struct StoreWriter<'a> {
    store: &'a LookupStore,
    _guard: MutexGuard<'a, ()>,
}

impl LookupStore {
    /// An empty, unloaded store backed by the documents named in `config`
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_documents(DocumentStore::new(config))
    }

    pub fn with_documents(documents: DocumentStore) -> Self {
        Self {
            tables: RwLock::new(Arc::new(LookupTables::default())),
            loaded: AtomicBool::new(false),
            writer: Mutex::new(()),
            documents,
        }
    }

    /// Populate the tables from whichever map documents exist.
    ///
    /// Missing documents leave the corresponding map empty. The store counts as loaded once
    /// either map document was found.
    pub fn load(&self) -> Result<()> {
        let _guard = self.writer.lock();

        let word_map = self.documents.load_word_map()?;
        let phrase_map = self.documents.load_phrase_map()?;
        let found = word_map.is_some() || phrase_map.is_some();

        let tables = LookupTables::new(word_map.unwrap_or_default(), phrase_map.unwrap_or_default());
        info!(
            "Loaded lookup tables: {} words, {} phrases",
            tables.word_map.len(),
            tables.phrase_map.len()
        );

        *self.tables.write() = Arc::new(tables);
        self.loaded.store(found, Ordering::Release);

        if !found {
            warn!("No persisted lookup tables found, starting empty");
        }
        Ok(())
    }

    /// Current tables. Cheap; the returned snapshot is never mutated.
    pub fn snapshot(&self) -> Arc<LookupTables> {
        let tables = self.tables.read();
        Arc::clone(&*tables)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Acquire the single writer slot, blocking other mutations until dropped
    pub fn writer(&self) -> StoreWriter<'_> {
        StoreWriter {
            store: self,
            _guard: self.writer.lock(),
        }
    }
}

impl StoreWriter<'_> {
    /// Tables as currently published
    pub fn current(&self) -> Arc<LookupTables> {
        self.store.snapshot()
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.store.documents
    }

    /// Swap in `tables` for all readers, then persist both map documents.
    ///
    /// The swap is not undone when writing fails: memory may then be ahead of disk.
    pub fn publish(&self, tables: LookupTables) -> Result<Arc<LookupTables>> {
        let tables = self.swap(tables);
        self.persist(&tables)?;
        Ok(tables)
    }

    /// Make `tables` visible to readers without touching disk
    pub fn swap(&self, tables: LookupTables) -> Arc<LookupTables> {
        let tables = Arc::new(tables);
        *self.store.tables.write() = Arc::clone(&tables);
        self.store.loaded.store(true, Ordering::Release);
        tables
    }

    /// Rewrite both map documents from `tables`
    pub fn persist(&self, tables: &LookupTables) -> Result<()> {
        self.store.documents.save_word_map(&tables.word_map)?;
        self.store.documents.save_phrase_map(&tables.phrase_map)?;
        Ok(())
    }
}

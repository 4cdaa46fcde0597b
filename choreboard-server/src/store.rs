//! Whole-document persistence.
//!
//! The store contract is deliberately coarse: `load` returns the entire
//! [`Document`], `save` replaces it. Every mutating request performs one
//! load-modify-save cycle under [`AppState`]'s writer lock, so concurrent
//! requests cannot silently discard each other's changes.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError};

use choreboard_model::Document;
use tokio::sync::Mutex;

/// Errors that can occur while loading or saving the document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to read the data file.
    #[error("failed to read data file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the data file.
    #[error("failed to write data file {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document failed to serialize or deserialize as YAML.
    #[error("malformed document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Durable whole-document storage with a load/save contract.
///
/// Injected so the engine and handlers operate on in-memory fixtures in
/// tests, never touching real I/O.
pub trait DocumentStore: Send + Sync {
    /// Loads the entire document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing storage cannot be read or
    /// does not parse.
    fn load(&self) -> Result<Document, StoreError>;

    /// Persists the entire document, replacing the previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the document cannot be serialized or
    /// written.
    fn save(&self, doc: &Document) -> Result<(), StoreError>;
}

/// YAML file-backed store.
///
/// A missing file loads the seeded starter document; the first mutation
/// writes it out. Writes go through a temp file and rename so a crash
/// mid-write cannot truncate the document.
pub struct YamlFileStore {
    path: PathBuf,
}

impl YamlFileStore {
    /// Creates a store over the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentStore for YamlFileStore {
    fn load(&self) -> Result<Document, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_yaml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::starter()),
            Err(e) => Err(StoreError::Read {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let yaml = serde_yaml::to_string(doc)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, yaml).map_err(|e| StoreError::Write {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// In-memory store for tests and fixtures.
///
/// Clones share the same underlying document, so a test can keep a handle
/// and observe what the server persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    doc: Arc<std::sync::Mutex<Document>>,
}

impl MemoryStore {
    /// Creates a store seeded with the given document.
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self {
            doc: Arc::new(std::sync::Mutex::new(doc)),
        }
    }

    /// Returns a copy of the currently persisted document.
    #[must_use]
    pub fn snapshot(&self) -> Document {
        self.doc
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Document, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        *self.doc.lock().unwrap_or_else(PoisonError::into_inner) = doc.clone();
        Ok(())
    }
}

/// Shared server state: the document store behind a single writer lock.
///
/// The lock is held across the whole load-modify-save of each mutating
/// request. Without it, two concurrent requests could each load, apply
/// their change, and save, silently dropping whichever write landed first.
pub struct AppState {
    /// The injected store. Lock before every load.
    pub store: Mutex<Box<dyn DocumentStore>>,
}

impl AppState {
    /// Creates server state over any document store.
    #[must_use]
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self {
            store: Mutex::new(Box::new(store)),
        }
    }
}

//! Flat-file persistence for the SHELF book collection.
//!
//! The unit of durability is the whole collection: `load` reads the entire
//! file and `save` rewrites it. Writes go to a temp file in the destination
//! directory and are renamed over the target, so a crash mid-write leaves
//! the previous collection intact.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub mod error;
pub mod model;

pub use error::StoreError;
pub use model::{Book, DEFAULT_STATUS};

#[derive(Serialize)]
struct CollectionOut<'a> {
    books: &'a [Book],
}

#[derive(Deserialize)]
struct CollectionIn {
    #[serde(default)]
    books: Vec<Book>,
}

/// Durable load/save of the entire book collection as a single JSON document
/// of the shape `{"books": [...]}`.
///
/// The store performs no locking; callers serialize access.
pub struct BookStore {
    path: PathBuf,
}

impl BookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted collection. A missing file is an empty collection.
    pub fn load(&self) -> Result<Vec<Book>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source: err,
                })
            }
        };

        let collection: CollectionIn =
            serde_json::from_str(&raw).map_err(|err| StoreError::Malformed {
                path: self.path.clone(),
                source: err,
            })?;

        Ok(collection.books)
    }

    /// Overwrite the persisted collection with `books`, in order.
    pub fn save(&self, books: &[Book]) -> Result<(), StoreError> {
        let payload = serde_json::to_string_pretty(&CollectionOut { books }).map_err(|err| {
            StoreError::Encode {
                path: self.path.clone(),
                source: err,
            }
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let write_err = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(payload.as_bytes()).map_err(write_err)?;
        tmp.persist(&self.path)
            .map_err(|err| write_err(err.error))?;

        tracing::debug!(path = %self.path.display(), count = books.len(), "collection persisted");
        Ok(())
    }
}

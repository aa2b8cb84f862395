//! Filesystem-backed document store.
//!
//! # Responsibility
//! - Resolve document ids against a root directory and read/write them as
//!   plain files.
//!
//! # Invariants
//! - Writes are atomic: content lands in a sibling temp file first and is
//!   renamed into place, so an external watcher never observes torn text.

use crate::store::{DocumentStore, StoreError, StoreResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Store rooted at one directory; document ids are relative paths.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, doc_id: &str) -> PathBuf {
        self.root.join(doc_id)
    }
}

impl DocumentStore for FsStore {
    fn read_all(&self, doc_id: &str) -> StoreResult<String> {
        match fs::read_to_string(self.resolve(doc_id)) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::DocumentNotFound(doc_id.to_string()))
            }
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn write_all(&mut self, doc_id: &str, text: &str) -> StoreResult<()> {
        let path = self.resolve(doc_id);
        let tmp = match path.file_name() {
            Some(name) => {
                let mut tmp_name = name.to_os_string();
                tmp_name.push(".tmp");
                path.with_file_name(tmp_name)
            }
            None => return Err(StoreError::DocumentNotFound(doc_id.to_string())),
        };

        fs::write(&tmp, text)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

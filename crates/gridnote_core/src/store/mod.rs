//! Document store abstraction.
//!
//! # Responsibility
//! - Define the read/write contract the synchronization engine needs from a
//!   host's storage layer.
//! - Ship two implementations: an in-process map store and a
//!   filesystem-backed store with atomic writes.
//!
//! # Invariants
//! - The document text is the sole persisted artifact; the engine only reads
//!   and writes it whole or via line-range replacement.
//! - `replace_range` has a default read-splice-write implementation so hosts
//!   without a range-patch primitive still satisfy the contract.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod fs_store;
pub mod memory;

/// Host-assigned document identity (a path, a vault key, an opaque handle).
pub type DocumentId = String;

pub type StoreResult<T> = Result<T, StoreError>;

/// Transport-level store failure.
#[derive(Debug)]
pub enum StoreError {
    DocumentNotFound(DocumentId),
    Io(std::io::Error),
    RangeOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(doc_id) => write!(f, "document not found: {doc_id}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::RangeOutOfBounds { start, end, len } => write!(
                f,
                "line range [{start}, {end}) is outside a document of {len} lines"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Whole-document read/write contract supplied by the host.
pub trait DocumentStore {
    /// Reads the full document text.
    fn read_all(&self, doc_id: &str) -> StoreResult<String>;

    /// Replaces the full document text.
    fn write_all(&mut self, doc_id: &str, text: &str) -> StoreResult<()>;

    /// Replaces the half-open line range `[start_line, end_line)` with
    /// `new_lines`, leaving every other line untouched.
    ///
    /// The default implementation reads the document, splices the line list
    /// and writes it back whole.
    fn replace_range(
        &mut self,
        doc_id: &str,
        start_line: usize,
        end_line: usize,
        new_lines: &[String],
    ) -> StoreResult<()> {
        let text = self.read_all(doc_id)?;
        let lines: Vec<&str> = text.split('\n').collect();
        if start_line > end_line || end_line > lines.len() {
            return Err(StoreError::RangeOutOfBounds {
                start: start_line,
                end: end_line,
                len: lines.len(),
            });
        }

        let mut spliced: Vec<&str> =
            Vec::with_capacity(lines.len() - (end_line - start_line) + new_lines.len());
        spliced.extend_from_slice(&lines[..start_line]);
        spliced.extend(new_lines.iter().map(String::as_str));
        spliced.extend_from_slice(&lines[end_line..]);

        self.write_all(doc_id, &spliced.join("\n"))
    }
}

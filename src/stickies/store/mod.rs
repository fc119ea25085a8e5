//! # Storage Layer
//!
//! The note collection lives in memory inside a [`NoteStore`]; a
//! [`NoteBackend`] is the raw I/O underneath it. The split mirrors "what" and
//! "how": the store owns the records and the write-through rule, the backend
//! only knows how to read and write a buffer.
//!
//! ## Implementations
//!
//! - [`file::FileBackend`]: production storage
//!   - primary file (`notes.json` or `notes.txt`), written atomically
//!   - backup file (`notes_backup.*`), a byte-for-byte copy written from the
//!     same buffer right after the primary
//!
//! - [`memory::InMemoryBackend`]: in-memory storage for testing
//!   - no persistence
//!   - can simulate write failures
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── notes.json          # primary (or notes.txt for the text log)
//! ├── notes_backup.json   # copy of the primary after every persist
//! ├── notes_backup.json.1 # backup set aside after a failed load
//! ├── config.json         # StickiesConfig
//! └── notes.log           # tracing output
//! ```

use crate::error::Result;
use std::path::PathBuf;

pub mod file;
pub mod memory;
pub mod note_store;

pub use note_store::NoteStore;

/// Where a backend keeps its data. Virtual for non-file backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub primary: PathBuf,
    pub backup: PathBuf,
}

/// Abstract interface for raw storage I/O.
///
/// Methods take `&self`; backends that need state use interior mutability.
/// A backend must be `Send` so a store can be handed to the worker thread.
pub trait NoteBackend: Send {
    /// Read the primary buffer.
    /// Returns Ok(None) if nothing has been written yet.
    fn read(&self) -> Result<Option<String>>;

    /// Overwrite the primary with `buffer`, then copy the same buffer to the backup.
    /// The primary write MUST be atomic.
    fn write(&self, buffer: &str) -> Result<()>;

    /// Append `line` to the primary and refresh the backup from `full`.
    ///
    /// Used by append-only formats for single-note saves. `full` is the
    /// complete encoded collection including `line`.
    fn append(&self, _line: &str, full: &str) -> Result<()> {
        self.write(full)
    }

    /// Move the current backup out of the way so the next write cannot
    /// overwrite it. Returns where it went, or `None` if there was no backup.
    fn preserve_backup(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }

    fn paths(&self) -> StorePaths;
}

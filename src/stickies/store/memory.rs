use super::{NoteBackend, StorePaths};
use crate::error::{Result, SaveTarget, StickiesError};
use std::cell::RefCell;
use std::io;
use std::path::PathBuf;

/// In-memory storage for testing and development.
/// Does NOT persist data.
///
/// Uses `RefCell` since a backend is only ever driven by the one store that
/// owns it.
#[derive(Default)]
pub struct InMemoryBackend {
    primary: RefCell<Option<String>>,
    backup: RefCell<Option<String>>,
    preserved: RefCell<Vec<String>>,
    writes: RefCell<usize>,
    fail_writes: RefCell<Option<SaveTarget>>,
    fail_reads: RefCell<bool>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose primary already holds `content`.
    pub fn with_content(content: impl Into<String>) -> Self {
        let backend = Self::new();
        *backend.primary.borrow_mut() = Some(content.into());
        backend
    }

    /// Same backend with `content` already in the backup.
    pub fn with_backup(self, content: impl Into<String>) -> Self {
        *self.backup.borrow_mut() = Some(content.into());
        self
    }

    /// Make subsequent writes fail on the given target (None to stop failing).
    pub fn set_fail_writes(&self, target: Option<SaveTarget>) {
        *self.fail_writes.borrow_mut() = target;
    }

    pub fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.borrow_mut() = fail;
    }

    pub fn primary(&self) -> Option<String> {
        self.primary.borrow().clone()
    }

    pub fn backup(&self) -> Option<String> {
        self.backup.borrow().clone()
    }

    /// Backups set aside by `preserve_backup`, oldest first.
    pub fn preserved(&self) -> Vec<String> {
        self.preserved.borrow().clone()
    }

    /// Number of successful primary writes (full or append).
    pub fn writes(&self) -> usize {
        *self.writes.borrow()
    }

    fn check(&self, target: SaveTarget) -> Result<()> {
        if *self.fail_writes.borrow() == Some(target) {
            return Err(StickiesError::save(
                target,
                io::Error::new(io::ErrorKind::PermissionDenied, "simulated write error"),
            ));
        }
        Ok(())
    }
}

impl NoteBackend for InMemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        if *self.fail_reads.borrow() {
            return Err(StickiesError::Io(io::Error::other("simulated read error")));
        }
        Ok(self.primary.borrow().clone())
    }

    fn write(&self, buffer: &str) -> Result<()> {
        self.check(SaveTarget::Primary)?;
        *self.primary.borrow_mut() = Some(buffer.to_string());
        *self.writes.borrow_mut() += 1;
        self.check(SaveTarget::Backup)?;
        *self.backup.borrow_mut() = Some(buffer.to_string());
        Ok(())
    }

    fn append(&self, line: &str, full: &str) -> Result<()> {
        self.check(SaveTarget::Primary)?;
        self.primary
            .borrow_mut()
            .get_or_insert_with(String::new)
            .push_str(line);
        *self.writes.borrow_mut() += 1;
        self.check(SaveTarget::Backup)?;
        *self.backup.borrow_mut() = Some(full.to_string());
        Ok(())
    }

    fn preserve_backup(&self) -> Result<Option<PathBuf>> {
        let Some(old) = self.backup.borrow_mut().take() else {
            return Ok(None);
        };
        let mut preserved = self.preserved.borrow_mut();
        preserved.push(old);
        Ok(Some(PathBuf::from(format!(
            "<memory>/notes_backup.{}",
            preserved.len()
        ))))
    }

    fn paths(&self) -> StorePaths {
        StorePaths {
            primary: PathBuf::from("<memory>/notes"),
            backup: PathBuf::from("<memory>/notes_backup"),
        }
    }
}

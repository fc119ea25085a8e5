use super::{NoteBackend, StorePaths};
use crate::error::{Result, SaveTarget, StickiesError};
use crate::format::{decode_json, StorageFormat};
use crate::model::{Clock, Note, NoteId, SystemClock, TimestampFormat};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Owner of the note collection.
///
/// Records are kept in append order. Every mutation is written through to the
/// backend before it counts as durable; when a write fails the in-memory change
/// is kept and the error is returned, so the notes stay visible even if they
/// did not reach the disk.
pub struct NoteStore<B: NoteBackend> {
    backend: B,
    format: StorageFormat,
    timestamps: TimestampFormat,
    clock: Box<dyn Clock>,
    notes: Vec<Note>,
    /// Whether the primary holds exactly `format.encode(notes)`. Appending a
    /// single line is only safe on top of a canonical file.
    canonical_on_disk: bool,
    /// Set when the last load failed: the backup may be the only good copy,
    /// so it is moved aside before anything is written.
    backup_at_risk: bool,
}

impl<B: NoteBackend> NoteStore<B> {
    pub fn new(backend: B, format: StorageFormat) -> Self {
        Self {
            backend,
            format,
            timestamps: format.default_timestamp_format(),
            clock: Box::new(SystemClock),
            notes: Vec::new(),
            canonical_on_disk: false,
            backup_at_risk: false,
        }
    }

    pub fn with_timestamp_format(mut self, timestamps: TimestampFormat) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn format(&self) -> StorageFormat {
        self.format
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.timestamps
    }

    pub fn paths(&self) -> StorePaths {
        self.backend.paths()
    }

    /// All records in append order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Replaces the in-memory records with what the backend holds.
    ///
    /// Nothing persisted yet is not an error. If the data cannot be read or
    /// parsed the store is left empty (and usable) and a `Load` error is
    /// returned for the caller to surface or ignore.
    pub fn load(&mut self) -> Result<usize> {
        let primary = self.backend.paths().primary;
        let loaded = self.backend.read().and_then(|raw| match raw {
            None => Ok((Vec::new(), true)),
            Some(raw) => {
                let notes = self.format.decode(&raw)?;
                let canonical = self.format.encode(&notes)? == raw;
                Ok((notes, canonical))
            }
        });

        match loaded {
            Ok((notes, canonical)) => {
                debug!(count = notes.len(), path = %primary.display(), "loaded notes");
                self.notes = notes;
                self.canonical_on_disk = canonical;
                self.backup_at_risk = false;
                Ok(self.notes.len())
            }
            Err(e) => {
                error!(path = %primary.display(), "Error loading notes: {}", e);
                self.notes.clear();
                self.canonical_on_disk = false;
                self.backup_at_risk = true;
                Err(StickiesError::load(primary, e))
            }
        }
    }

    /// Adds a note stamped with the current time at the end of the collection.
    ///
    /// Blank text is a no-op and returns `Ok(None)`. A failed write still
    /// leaves the note in memory.
    pub fn append(&mut self, text: &str) -> Result<Option<Note>> {
        if text.trim().is_empty() {
            debug!("ignoring blank note");
            return Ok(None);
        }

        let note = Note::new(self.timestamps.stamp(self.clock.as_ref()), text)?;
        self.notes.push(note.clone());
        info!(id = %note.id, "note added");

        if self.format.appends() && self.canonical_on_disk {
            let line = self.format.encode_one(&note)?;
            let full = self.format.encode(&self.notes)?;
            if let Err(e) = self.backend.append(&line, &full) {
                self.canonical_on_disk = matches!(
                    e,
                    StickiesError::Save {
                        target: SaveTarget::Backup,
                        ..
                    }
                );
                warn!("Error saving note: {}", e);
                return Err(e);
            }
        } else {
            self.persist()?;
        }

        Ok(Some(note))
    }

    /// Replaces the text of the note with `id` and refreshes its timestamp.
    pub fn update(&mut self, id: &NoteId, text: &str) -> Result<Note> {
        let now = self.clock.now();
        let timestamps = self.timestamps;
        let note = self
            .notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or(StickiesError::NotFound(*id))?;

        note.revise(text, now, timestamps)?;
        let updated = note.clone();
        info!(id = %id, "note updated");

        self.persist()?;
        Ok(updated)
    }

    /// Removes the note with `id`. Deleting a note that is not there does nothing.
    pub fn delete(&mut self, id: &NoteId) -> Result<Option<Note>> {
        let Some(pos) = self.notes.iter().position(|n| &n.id == id) else {
            debug!(id = %id, "delete: note already gone");
            return Ok(None);
        };

        let removed = self.notes.remove(pos);
        info!(id = %id, "note deleted");
        self.persist()?;
        Ok(Some(removed))
    }

    /// Removes every note.
    pub fn clear(&mut self) -> Result<usize> {
        let count = self.notes.len();
        self.notes.clear();
        info!(count, "notes cleared");
        self.persist()?;
        Ok(count)
    }

    /// Full rewrite of the primary plus the backup, both from one buffer.
    pub fn persist(&mut self) -> Result<()> {
        self.guard_backup()?;
        let buffer = self.format.encode(&self.notes)?;
        match self.backend.write(&buffer) {
            Ok(()) => {
                self.canonical_on_disk = true;
                Ok(())
            }
            Err(e) => {
                // A backup failure means the primary did land.
                self.canonical_on_disk = matches!(
                    e,
                    StickiesError::Save {
                        target: SaveTarget::Backup,
                        ..
                    }
                );
                error!("Error saving notes: {}", e);
                Err(e)
            }
        }
    }

    /// After a failed load, sets the old backup aside before the first write
    /// replaces it. Nothing is written if that fails.
    fn guard_backup(&mut self) -> Result<()> {
        if !self.backup_at_risk {
            return Ok(());
        }
        match self.backend.preserve_backup() {
            Ok(Some(kept)) => warn!(path = %kept.display(), "previous backup kept"),
            Ok(None) => {}
            Err(e) => {
                error!("Error keeping the previous backup: {}", e);
                return Err(e);
            }
        }
        self.backup_at_risk = false;
        Ok(())
    }

    /// The persisted buffer as it is on disk (empty if nothing was written).
    pub fn persisted_raw(&self) -> Result<String> {
        Ok(self.backend.read()?.unwrap_or_default())
    }

    /// Overwrites the persisted log with `raw` verbatim and re-reads the
    /// records from it line by line. Text log only.
    pub fn replace_all(&mut self, raw: &str) -> Result<usize> {
        if !self.format.supports_raw_edit() {
            return Err(StickiesError::Unsupported(format!(
                "raw editing needs the text log format (store uses {})",
                self.format
            )));
        }

        self.guard_backup()?;
        self.notes = self.format.decode(raw)?;
        self.canonical_on_disk = false;
        info!(count = self.notes.len(), "notes replaced from raw text");

        self.backend.write(raw).inspect_err(|e| {
            error!("Error saving notes: {}", e);
        })?;
        self.canonical_on_disk = self.format.encode(&self.notes)? == raw;
        Ok(self.notes.len())
    }

    /// Appends every record of a JSON export at `path`. Original timestamps
    /// are kept; each record gets a fresh id.
    ///
    /// A file that cannot be read or parsed leaves the store untouched.
    pub fn import(&mut self, path: &Path) -> Result<usize> {
        if self.format != StorageFormat::Json {
            return Err(StickiesError::Unsupported(format!(
                "import needs the json format (store uses {})",
                self.format
            )));
        }

        let raw = fs::read_to_string(path)?;
        let imported = decode_json(&raw)?;
        let count = imported.len();
        self.notes.extend(imported);
        info!(count, path = %path.display(), "notes imported");

        self.persist()?;
        Ok(count)
    }

    /// Writes the whole collection to `path`.
    ///
    /// JSON stores write every record in storage order. Text-log stores write
    /// the log as it is on disk, hand edits included.
    pub fn export(&self, path: &Path) -> Result<usize> {
        let buffer = match self.format {
            StorageFormat::Json => self.format.encode(&self.notes)?,
            StorageFormat::TextLog => self.persisted_raw()?,
        };
        self.write_export(path, &buffer, self.notes.len())
    }

    /// Writes only `notes` (for instance a search result) to `path`, encoded
    /// in the store's format.
    pub fn export_selection(&self, path: &Path, notes: &[Note]) -> Result<usize> {
        let buffer = self.format.encode(notes)?;
        self.write_export(path, &buffer, notes.len())
    }

    fn write_export(&self, path: &Path, buffer: &str, count: usize) -> Result<usize> {
        fs::write(path, buffer).map_err(|e| StickiesError::save(SaveTarget::Export, e))?;
        info!(count, path = %path.display(), "notes exported");
        Ok(count)
    }
}

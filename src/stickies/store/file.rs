use super::{NoteBackend, StorePaths};
use crate::error::{Result, SaveTarget, StickiesError};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Primary + backup files on the local disk.
pub struct FileBackend {
    primary: PathBuf,
    backup: PathBuf,
}

impl FileBackend {
    pub fn new(primary: impl Into<PathBuf>, backup: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            backup: backup.into(),
        }
    }

    /// Backend rooted in `dir` with the given file names.
    pub fn in_dir(dir: &Path, data_file: &str, backup_file: &str) -> Self {
        Self::new(dir.join(data_file), dir.join(backup_file))
    }

    pub fn primary(&self) -> &Path {
        &self.primary
    }

    pub fn backup(&self) -> &Path {
        &self.backup
    }

    fn ensure_parent(&self, path: &Path, target: SaveTarget) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StickiesError::save(target, e))?;
            }
        }
        Ok(())
    }

    fn write_primary(&self, buffer: &str) -> Result<()> {
        self.ensure_parent(&self.primary, SaveTarget::Primary)?;
        let dir = self
            .primary
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp_file = dir.join(format!(".notes-{}.tmp", Uuid::new_v4()));

        let result = fs::write(&tmp_file, buffer).and_then(|_| fs::rename(&tmp_file, &self.primary));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp_file);
            return Err(StickiesError::save(SaveTarget::Primary, e));
        }
        Ok(())
    }

    /// First `<backup>.N` (N = 1, 2, ...) that does not exist yet.
    fn free_backup_slot(&self) -> PathBuf {
        let slot = |n: u32| {
            let mut name = self.backup.clone().into_os_string();
            name.push(format!(".{}", n));
            PathBuf::from(name)
        };
        let mut n = 1;
        while slot(n).exists() {
            n += 1;
        }
        slot(n)
    }

    fn write_backup(&self, buffer: &str) -> Result<()> {
        self.ensure_parent(&self.backup, SaveTarget::Backup)?;
        fs::write(&self.backup, buffer).map_err(|e| StickiesError::save(SaveTarget::Backup, e))
    }
}

impl NoteBackend for FileBackend {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.primary) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StickiesError::Io(e)),
        }
    }

    fn write(&self, buffer: &str) -> Result<()> {
        self.write_primary(buffer)?;
        self.write_backup(buffer)?;
        debug!(
            primary = %self.primary.display(),
            bytes = buffer.len(),
            "wrote notes and backup"
        );
        Ok(())
    }

    fn append(&self, line: &str, full: &str) -> Result<()> {
        self.ensure_parent(&self.primary, SaveTarget::Primary)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.primary)
            .map_err(|e| StickiesError::save(SaveTarget::Primary, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| StickiesError::save(SaveTarget::Primary, e))?;
        self.write_backup(full)?;
        debug!(primary = %self.primary.display(), "appended note line");
        Ok(())
    }

    fn preserve_backup(&self) -> Result<Option<PathBuf>> {
        if !self.backup.is_file() {
            return Ok(None);
        }
        let target = self.free_backup_slot();
        fs::rename(&self.backup, &target)
            .map_err(|e| StickiesError::save(SaveTarget::Backup, e))?;
        debug!(from = %self.backup.display(), to = %target.display(), "backup set aside");
        Ok(Some(target))
    }

    fn paths(&self) -> StorePaths {
        StorePaths {
            primary: self.primary.clone(),
            backup: self.backup.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileBackend) {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::in_dir(dir.path(), "notes.json", "notes_backup.json");
        (dir, backend)
    }

    #[test]
    fn missing_primary_reads_as_none() {
        let (_dir, backend) = setup();
        assert_eq!(backend.read().unwrap(), None);
    }

    #[test]
    fn write_mirrors_primary_into_backup() {
        let (dir, backend) = setup();
        backend.write("[1]").unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("notes.json")).unwrap(), "[1]");
        assert_eq!(
            fs::read_to_string(dir.path().join("notes_backup.json")).unwrap(),
            "[1]"
        );
        assert_eq!(backend.read().unwrap(), Some("[1]".to_string()));
    }

    #[test]
    fn write_leaves_no_tmp_files() {
        let (dir, backend) = setup();
        backend.write("one").unwrap();
        backend.write("two").unwrap();

        for entry in fs::read_dir(dir.path()).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }

    #[test]
    fn write_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let backend = FileBackend::in_dir(&nested, "notes.txt", "notes_backup.txt");
        backend.write("x").unwrap();
        assert!(nested.join("notes.txt").exists());
        assert!(nested.join("notes_backup.txt").exists());
    }

    #[test]
    fn append_adds_line_and_rewrites_backup() {
        let (dir, backend) = setup();
        backend.append("[a] one\n", "[a] one\n").unwrap();
        backend.append("[b] two\n", "[a] one\n[b] two\n").unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("notes.json")).unwrap(),
            "[a] one\n[b] two\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("notes_backup.json")).unwrap(),
            "[a] one\n[b] two\n"
        );
    }

    #[test]
    fn backup_failure_is_reported_after_primary_lands() {
        let dir = TempDir::new().unwrap();
        // A directory where the backup file should go makes the backup write fail.
        let backup = dir.path().join("backup_is_a_dir");
        fs::create_dir_all(&backup).unwrap();
        let backend = FileBackend::new(dir.path().join("notes.json"), backup);

        let err = backend.write("[]").unwrap_err();
        assert!(matches!(
            err,
            StickiesError::Save {
                target: SaveTarget::Backup,
                ..
            }
        ));
        assert_eq!(backend.read().unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn preserve_backup_moves_it_to_the_first_free_slot() {
        let (dir, backend) = setup();
        assert_eq!(backend.preserve_backup().unwrap(), None);

        fs::write(dir.path().join("notes_backup.json"), "old").unwrap();
        fs::write(dir.path().join("notes_backup.json.1"), "older").unwrap();

        let moved = backend.preserve_backup().unwrap().unwrap();
        assert_eq!(moved, dir.path().join("notes_backup.json.2"));
        assert_eq!(fs::read_to_string(&moved).unwrap(), "old");
        assert_eq!(
            fs::read_to_string(dir.path().join("notes_backup.json.1")).unwrap(),
            "older"
        );
        assert!(!dir.path().join("notes_backup.json").exists());
    }

    #[test]
    fn unreadable_primary_is_an_error() {
        let dir = TempDir::new().unwrap();
        // Reading a directory as a file fails with something other than NotFound.
        let backend = FileBackend::new(dir.path().to_path_buf(), dir.path().join("b"));
        assert!(backend.read().is_err());
    }
}

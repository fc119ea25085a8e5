use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{NoteBackend, NoteStore};
use std::path::Path;

pub fn run<B: NoteBackend>(store: &mut NoteStore<B>, path: &Path) -> Result<CmdResult> {
    let count = store.import(path)?;
    let mut result = CmdResult::default();
    if count == 0 {
        result.add_message(CmdMessage::info(format!(
            "No notes found in {}",
            path.display()
        )));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Imported {} note(s) from {}",
            count,
            path.display()
        )));
    }
    let imported = store.notes()[store.len() - count..].to_vec();
    Ok(result.with_affected_notes(imported))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::error::StickiesError;
    use crate::format::StorageFormat;
    use crate::store::memory::InMemoryBackend;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn imports_after_existing_notes_keeping_timestamps() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.json");
        fs::write(
            &source,
            r#"[{"time": "2023-05-01 08:00:00", "text": "from backup"}, {"time": "x", "text": "  "}]"#,
        )
        .unwrap();

        let mut store = NoteStore::new(InMemoryBackend::new(), StorageFormat::Json);
        add::run(&mut store, "existing").unwrap();

        let result = run(&mut store, &source).unwrap();
        assert_eq!(result.affected_notes.len(), 1);
        assert_eq!(result.affected_notes[0].timestamp, "2023-05-01 08:00:00");
        assert_eq!(store.len(), 2);
        assert_eq!(store.notes()[1].text, "from backup");
    }

    #[test]
    fn malformed_file_leaves_store_untouched() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("bad.json");
        fs::write(&source, "{not json").unwrap();

        let mut store = NoteStore::new(InMemoryBackend::new(), StorageFormat::Json);
        add::run(&mut store, "existing").unwrap();

        let err = run(&mut store, &source).unwrap_err();
        assert!(matches!(err, StickiesError::Serialization(_)));
        assert_eq!(store.len(), 1);
    }
}

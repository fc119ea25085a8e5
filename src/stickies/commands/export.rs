use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::query::NoteQuery;
use crate::store::{NoteBackend, NoteStore};
use std::path::Path;

/// Writes every note to `path` in storage order.
///
/// With `selection`, only the notes visible under that query are written, in
/// listing order.
pub fn run<B: NoteBackend>(
    store: &NoteStore<B>,
    path: &Path,
    selection: Option<&NoteQuery>,
) -> Result<CmdResult> {
    let (count, notes) = match selection {
        None => (store.export(path)?, store.notes().to_vec()),
        Some(query) => {
            let notes = query.project(store.notes());
            (store.export_selection(path, &notes)?, notes)
        }
    };

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} note(s) to {}",
        count,
        path.display()
    )));
    Ok(result.with_affected_notes(notes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::add;
    use crate::format::{decode_json, StorageFormat};
    use crate::model::fixtures::ManualClock;
    use crate::query::SortMode;
    use crate::store::memory::InMemoryBackend;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(texts: &[&str]) -> NoteStore<InMemoryBackend> {
        let clock = ManualClock::default();
        let mut store =
            NoteStore::new(InMemoryBackend::new(), StorageFormat::Json).with_clock(clock.clone());
        for text in texts {
            add::run(&mut store, text).unwrap();
            clock.advance_secs(60);
        }
        store
    }

    fn exported_texts(path: &Path) -> Vec<String> {
        decode_json(&fs::read_to_string(path).unwrap())
            .unwrap()
            .into_iter()
            .map(|n| n.text)
            .collect()
    }

    #[test]
    fn exports_every_note_in_storage_order() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.json");
        let store = store_with(&["first", "second", "third"]);

        let result = run(&store, &target, None).unwrap();

        assert_eq!(result.affected_notes.len(), 3);
        assert_eq!(exported_texts(&target), vec!["first", "second", "third"]);
    }

    #[test]
    fn selection_exports_only_the_visible_notes_in_listing_order() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.json");
        let store = store_with(&["Buy milk", "Call mom", "milk the cow"]);

        let query = NoteQuery::new("milk", SortMode::DateDescending);
        let result = run(&store, &target, Some(&query)).unwrap();

        assert_eq!(result.affected_notes.len(), 2);
        assert_eq!(exported_texts(&target), vec!["milk the cow", "Buy milk"]);
    }

    #[test]
    fn text_log_export_is_the_log_as_stored() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.txt");
        let raw = "[01.01.2024 10:00] one\nloose line\n";
        let mut store = NoteStore::new(InMemoryBackend::with_content(raw), StorageFormat::TextLog);
        store.load().unwrap();

        run(&store, &target, None).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), raw);
    }

    #[test]
    fn unwritable_target_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&["a"]);
        // A directory cannot be overwritten as a file.
        assert!(run(&store, dir.path(), None).is_err());
    }
}

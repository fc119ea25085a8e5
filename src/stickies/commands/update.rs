use crate::commands::{preview, CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::DisplayIndex;
use crate::query::NoteQuery;
use crate::store::{NoteBackend, NoteStore};

use super::helpers::resolve_indexes;

/// Replaces the text of the note shown at `index` under `query`.
pub fn run<B: NoteBackend>(
    store: &mut NoteStore<B>,
    query: &NoteQuery,
    index: DisplayIndex,
    text: &str,
) -> Result<CmdResult> {
    let resolved = resolve_indexes(store, query, &[index])?;
    let mut result = CmdResult::default();

    for (display_index, id) in resolved {
        let note = store.update(&id, text)?;
        result.add_message(CmdMessage::success(format!(
            "Note updated ({}): {}",
            display_index,
            preview(&note.text)
        )));
        result.affected_notes.push(note);
    }

    Ok(result)
}

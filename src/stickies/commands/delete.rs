use crate::commands::{preview, CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::DisplayIndex;
use crate::query::NoteQuery;
use crate::store::{NoteBackend, NoteStore};

use super::helpers::resolve_indexes;

pub fn run<B: NoteBackend>(
    store: &mut NoteStore<B>,
    query: &NoteQuery,
    indexes: &[DisplayIndex],
) -> Result<CmdResult> {
    let resolved = resolve_indexes(store, query, indexes)?;
    let mut result = CmdResult::default();

    for (display_index, id) in resolved {
        match store.delete(&id)? {
            Some(note) => {
                result.add_message(CmdMessage::success(format!(
                    "Note deleted ({}): {}",
                    display_index,
                    preview(&note.text)
                )));
                result.affected_notes.push(note);
            }
            // Same index given twice.
            None => result.add_message(CmdMessage::info(format!(
                "Note {} already deleted",
                display_index
            ))),
        }
    }

    Ok(result)
}

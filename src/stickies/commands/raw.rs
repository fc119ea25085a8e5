//! The persisted buffer as text: show it, or replace it wholesale.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{NoteBackend, NoteStore};

pub fn show<B: NoteBackend>(store: &NoteStore<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_raw(store.persisted_raw()?))
}

pub fn replace<B: NoteBackend>(store: &mut NoteStore<B>, raw: &str) -> Result<CmdResult> {
    let count = store.replace_all(raw)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Notes replaced: {} note(s)",
        count
    )));
    Ok(result.with_affected_notes(store.notes().to_vec()))
}

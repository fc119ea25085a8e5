use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{NoteBackend, NoteStore};

pub fn run<B: NoteBackend>(store: &mut NoteStore<B>) -> Result<CmdResult> {
    let removed = store.notes().to_vec();
    let count = store.clear()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Cleared {} note(s)", count)));
    Ok(result.with_affected_notes(removed))
}

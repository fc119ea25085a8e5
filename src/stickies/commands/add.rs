use crate::commands::{preview, CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{NoteBackend, NoteStore};

pub fn run<B: NoteBackend>(store: &mut NoteStore<B>, text: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match store.append(text)? {
        Some(note) => {
            result.add_message(CmdMessage::success(format!(
                "Note saved: {}",
                preview(&note.text)
            )));
            result.affected_notes.push(note);
        }
        None => result.add_message(CmdMessage::warning("Nothing to save: the note is empty.")),
    }
    Ok(result)
}

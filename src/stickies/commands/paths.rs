use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::{NoteBackend, NoteStore};

pub fn run<B: NoteBackend>(store: &NoteStore<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_paths(store.paths()))
}

use crate::commands::CmdResult;
use crate::error::Result;
use crate::query::NoteQuery;
use crate::store::{NoteBackend, NoteStore};

use super::helpers::indexed_notes;

pub fn run<B: NoteBackend>(store: &NoteStore<B>, query: &NoteQuery) -> Result<CmdResult> {
    Ok(CmdResult::default().with_listed_notes(indexed_notes(store, query)))
}

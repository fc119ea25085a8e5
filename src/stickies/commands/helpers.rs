use crate::error::Result;
use crate::index::{index_notes, resolve, DisplayIndex, DisplayNote};
use crate::model::NoteId;
use crate::query::NoteQuery;
use crate::store::{NoteBackend, NoteStore};

pub fn indexed_notes<B: NoteBackend>(store: &NoteStore<B>, query: &NoteQuery) -> Vec<DisplayNote> {
    index_notes(query.project(store.notes()))
}

/// Resolves every index against one listing so that earlier deletes in the
/// same batch cannot shift later indexes.
pub fn resolve_indexes<B: NoteBackend>(
    store: &NoteStore<B>,
    query: &NoteQuery,
    indexes: &[DisplayIndex],
) -> Result<Vec<(DisplayIndex, NoteId)>> {
    let listed = indexed_notes(store, query);
    indexes
        .iter()
        .map(|idx| resolve(&listed, *idx).map(|id| (*idx, id)))
        .collect()
}

//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! stickies operation, whatever the front end.
//!
//! The facade dispatches to `commands/*.rs`, parses user-facing display indexes
//! and returns structured `CmdResult`s. It never prints and never exits; a
//! failed load is turned into a warning message so the front end can still
//! show an (empty) store and carry on.
//!
//! `StickiesApi<B: NoteBackend>` is generic over the backend:
//! - Production: `StickiesApi<FileBackend>`
//! - Testing: `StickiesApi<InMemoryBackend>`

use crate::commands::{self, CmdMessage, CmdResult};
use crate::error::{Result, StickiesError};
use crate::index::parse_indexes;
use crate::query::NoteQuery;
use crate::store::{NoteBackend, NoteStore};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct StickiesApi<B: NoteBackend> {
    store: NoteStore<B>,
    config_dir: PathBuf,
}

impl<B: NoteBackend> StickiesApi<B> {
    pub fn new(store: NoteStore<B>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            config_dir: config_dir.into(),
        }
    }

    pub fn store(&self) -> &NoteStore<B> {
        &self.store
    }

    pub fn into_store(self) -> NoteStore<B> {
        self.store
    }

    /// Loads the persisted notes. An unreadable store comes back as a warning.
    pub fn load(&mut self) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        match self.store.load() {
            Ok(_) => {}
            Err(e @ StickiesError::Load { .. }) => {
                warn!("starting with an empty store: {}", e);
                result.add_message(CmdMessage::warning(format!(
                    "{}. Starting with no notes; an existing {} is set aside before the next save.",
                    e,
                    self.store.paths().backup.display()
                )));
            }
            Err(e) => return Err(e),
        }
        Ok(result)
    }

    pub fn add_note(&mut self, text: &str) -> Result<CmdResult> {
        commands::add::run(&mut self.store, text)
    }

    pub fn list_notes(&self, query: &NoteQuery) -> Result<CmdResult> {
        commands::list::run(&self.store, query)
    }

    pub fn search_notes(&self, query: &NoteQuery, term: &str) -> Result<CmdResult> {
        commands::list::run(&self.store, &query.clone().with_term(term))
    }

    pub fn edit_note(&mut self, query: &NoteQuery, index: &str, text: &str) -> Result<CmdResult> {
        let index = index.parse()?;
        commands::update::run(&mut self.store, query, index, text)
    }

    pub fn delete_notes<I: AsRef<str>>(
        &mut self,
        query: &NoteQuery,
        indexes: &[I],
    ) -> Result<CmdResult> {
        let indexes = parse_indexes(indexes)?;
        commands::delete::run(&mut self.store, query, &indexes)
    }

    pub fn export_notes(&self, path: &Path) -> Result<CmdResult> {
        commands::export::run(&self.store, path, None)
    }

    pub fn export_listed_notes(&self, query: &NoteQuery, path: &Path) -> Result<CmdResult> {
        commands::export::run(&self.store, path, Some(query))
    }

    pub fn import_notes(&mut self, path: &Path) -> Result<CmdResult> {
        commands::import::run(&mut self.store, path)
    }

    pub fn raw(&self) -> Result<CmdResult> {
        commands::raw::show(&self.store)
    }

    pub fn replace_raw(&mut self, raw: &str) -> Result<CmdResult> {
        commands::raw::replace(&mut self.store, raw)
    }

    pub fn clear_notes(&mut self) -> Result<CmdResult> {
        commands::clear::run(&mut self.store)
    }

    pub fn config(&self, action: commands::config::ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    pub fn paths(&self) -> Result<CmdResult> {
        commands::paths::run(&self.store)
    }
}

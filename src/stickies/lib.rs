//! # Stickies Architecture
//!
//! Stickies keeps short notes: a line of text and the moment it was written.
//! The crate is a **UI-agnostic library** with a terminal client on top; the
//! same core can sit behind a quick-entry window, a tray menu or a script.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints results, sets up logging        │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses display indexes, turns load failures into notices │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - NoteStore: the records and the write-through rule        │
//! │  - NoteBackend: FileBackend (production), InMemoryBackend   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Beside the layers sit the pure pieces: [`query`] (search + sort
//! projections), [`index`] (1-based display numbers over a projection) and
//! [`format`] (the JSON array and the text log). [`worker`] moves a store onto
//! its own thread for front ends that must not block while saving.
//!
//! ## Persistence
//!
//! The whole collection is rewritten on every change and the same bytes are
//! copied to a backup file. Nothing is ever merged: the last writer wins, and
//! within one process every writer goes through the single `NoteStore`.
//!
//! ## No I/O assumptions in the core
//!
//! From `api.rs` inward nothing prints, nothing exits and nothing reads the
//! terminal. Diagnostics go through `tracing`; the binary decides where they
//! end up.
//!
//! ## Module Overview
//!
//! - [`api`]: facade used by front ends
//! - [`commands`]: business logic per operation
//! - [`config`]: `config.json` in the data directory
//! - [`error`]: `StickiesError` and the `Result` alias
//! - [`format`]: persisted forms
//! - [`index`]: display indexes
//! - [`model`]: `Note`, `NoteId`, timestamps and clocks
//! - [`query`]: filtering and sorting
//! - [`store`]: storage layer
//! - [`worker`]: single-consumer background store

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod model;
pub mod query;
pub mod store;
pub mod worker;

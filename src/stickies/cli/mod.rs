//! # CLI Layer
//!
//! One possible front end for stickies, not the application itself.
//!
//! This is the only place that parses arguments, prints, reads stdin and
//! installs the tracing subscriber. Everything else goes through
//! `StickiesApi`.
//!
//! - `setup`: clap definitions
//! - `commands`: `run()`, context setup and per-command handlers
//! - `print`: turns `CmdResult`s into terminal output
//! - `logging`: stderr + log file subscribers

mod commands;
mod logging;
mod print;
mod setup;

pub use commands::run;

use colored::Colorize;
use stickies::commands::{CmdMessage, MessageLevel};
use stickies::config::StickiesConfig;
use stickies::index::DisplayNote;
use stickies::store::StorePaths;
use std::path::Path;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const INDEX_WIDTH: usize = 5;
const TIME_WIDTH: usize = 20;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// A listing row split into the parts that get styled separately.
#[derive(Debug, PartialEq, Eq)]
struct NoteRow {
    index: String,
    text: String,
    padding: String,
    timestamp: String,
}

fn layout_row(dn: &DisplayNote) -> NoteRow {
    let index = format!("{:>width$} ", format!("{}.", dn.index), width = INDEX_WIDTH - 1);
    let timestamp = format!("{:>width$}", dn.note.timestamp, width = TIME_WIDTH);

    let available = LINE_WIDTH.saturating_sub(index.width() + TIME_WIDTH + 2);
    let flat: String = dn
        .note
        .text
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    let text = truncate_to_width(&flat, available);
    let padding = " ".repeat(available.saturating_sub(text.width()) + 2);

    NoteRow {
        index,
        text,
        padding,
        timestamp,
    }
}

pub(super) fn print_notes(notes: &[DisplayNote], term: &str) {
    if notes.is_empty() {
        if term.is_empty() {
            println!("No notes yet.");
        } else {
            println!("No notes match \"{}\".", term);
        }
        return;
    }

    for dn in notes {
        let row = layout_row(dn);
        println!(
            "{}{}{}{}",
            row.index.yellow(),
            row.text,
            row.padding,
            row.timestamp.dimmed()
        );
    }
}

pub(super) fn print_config(config: &StickiesConfig) {
    for (key, value) in config.entries() {
        println!("{} = {}", key, value);
    }
}

pub(super) fn print_paths(paths: &StorePaths, config_file: &Path, log_file: Option<&Path>) {
    println!("notes:  {}", paths.primary.display());
    println!("backup: {}", paths.backup.display());
    println!("config: {}", config_file.display());
    if let Some(log) = log_file {
        println!("log:    {}", log.display());
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

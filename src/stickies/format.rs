//! On-disk representations of the note collection.
//!
//! Two flavours exist:
//!
//! ```text
//! json   [ { "time": "2024-01-01 10:00:00", "text": "Buy milk" }, ... ]
//! text   [01.01.2024 10:00] Buy milk
//! ```
//!
//! Ids are never written; decoding hands out fresh ones.

use crate::error::{Result, StickiesError};
use crate::model::{Note, TimestampFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    #[default]
    Json,
    #[serde(rename = "text", alias = "textlog")]
    TextLog,
}

#[derive(Serialize)]
struct StoredNoteRef<'a> {
    time: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct StoredNote {
    time: String,
    text: String,
}

impl StorageFormat {
    pub fn default_timestamp_format(&self) -> TimestampFormat {
        match self {
            StorageFormat::Json => TimestampFormat::Iso,
            StorageFormat::TextLog => TimestampFormat::Dotted,
        }
    }

    pub fn default_data_file(&self) -> &'static str {
        match self {
            StorageFormat::Json => "notes.json",
            StorageFormat::TextLog => "notes.txt",
        }
    }

    pub fn default_backup_file(&self) -> &'static str {
        match self {
            StorageFormat::Json => "notes_backup.json",
            StorageFormat::TextLog => "notes_backup.txt",
        }
    }

    /// Whether the raw persisted buffer can be edited as free text.
    pub fn supports_raw_edit(&self) -> bool {
        matches!(self, StorageFormat::TextLog)
    }

    /// Whether single-note saves append a line instead of rewriting the file.
    pub fn appends(&self) -> bool {
        matches!(self, StorageFormat::TextLog)
    }

    pub fn encode(&self, notes: &[Note]) -> Result<String> {
        match self {
            StorageFormat::Json => {
                let stored: Vec<_> = notes
                    .iter()
                    .map(|n| StoredNoteRef {
                        time: &n.timestamp,
                        text: &n.text,
                    })
                    .collect();
                serde_json::to_string_pretty(&stored).map_err(StickiesError::Serialization)
            }
            StorageFormat::TextLog => Ok(notes.iter().map(log_line).collect()),
        }
    }

    pub fn decode(&self, raw: &str) -> Result<Vec<Note>> {
        match self {
            StorageFormat::Json => decode_json(raw),
            StorageFormat::TextLog => Ok(decode_log(raw)),
        }
    }

    /// Encodes a single note the way it would appear appended to the file.
    pub fn encode_one(&self, note: &Note) -> Result<String> {
        match self {
            StorageFormat::Json => self.encode(std::slice::from_ref(note)),
            StorageFormat::TextLog => Ok(log_line(note)),
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageFormat::Json => write!(f, "json"),
            StorageFormat::TextLog => write!(f, "text"),
        }
    }
}

impl FromStr for StorageFormat {
    type Err = StickiesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(StorageFormat::Json),
            "text" | "textlog" | "log" => Ok(StorageFormat::TextLog),
            other => Err(StickiesError::Config(format!(
                "Unknown storage format: {} (expected json or text)",
                other
            ))),
        }
    }
}

/// Decodes a JSON array of `{time, text}` records.
///
/// A whitespace-only document is an empty collection. Records with blank text
/// are dropped.
pub fn decode_json(raw: &str) -> Result<Vec<Note>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let stored: Vec<StoredNote> = serde_json::from_str(raw)?;
    Ok(stored
        .into_iter()
        .filter_map(|s| Note::new(s.time, &s.text).ok())
        .collect())
}

fn log_line(note: &Note) -> String {
    format!("[{}] {}\n", note.timestamp, escape(&note.text))
}

fn decode_log(raw: &str) -> Vec<Note> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (timestamp, text) = split_log_line(line);
            Note::new(timestamp, &unescape(text)).ok()
        })
        .collect()
}

/// Splits `[ts] text`. Lines without the bracketed prefix are all text.
fn split_log_line(line: &str) -> (&str, &str) {
    if let Some(rest) = line.strip_prefix('[') {
        if let Some(end) = rest.find("] ") {
            return (&rest[..end], &rest[end + 2..]);
        }
        if let Some(ts) = rest.strip_suffix(']') {
            return (ts, "");
        }
    }
    ("", line)
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\n', "\\n")
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::note;

    #[test]
    fn json_uses_time_and_text_keys_pretty_printed() {
        let notes = vec![note("2024-01-01 10:00:00", "Купить молоко")];
        let out = StorageFormat::Json.encode(&notes).unwrap();
        assert_eq!(
            out,
            "[\n  {\n    \"time\": \"2024-01-01 10:00:00\",\n    \"text\": \"Купить молоко\"\n  }\n]"
        );
    }

    #[test]
    fn json_empty_collection_is_empty_array() {
        assert_eq!(StorageFormat::Json.encode(&[]).unwrap(), "[]");
        assert!(StorageFormat::Json.decode("[]").unwrap().is_empty());
        assert!(StorageFormat::Json.decode("  \n").unwrap().is_empty());
    }

    #[test]
    fn json_decode_keeps_order_and_drops_blank_entries() {
        let raw = r#"[
            {"time": "2024-01-02 00:00:00", "text": "second"},
            {"time": "2024-01-01 00:00:00", "text": "   "},
            {"time": "2024-01-01 00:00:00", "text": " first "}
        ]"#;
        let notes = StorageFormat::Json.decode(raw).unwrap();
        let texts: Vec<_> = notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn json_decode_rejects_malformed_documents() {
        assert!(matches!(
            StorageFormat::Json.decode("{not json"),
            Err(StickiesError::Serialization(_))
        ));
        assert!(StorageFormat::Json.decode(r#"{"time": "x"}"#).is_err());
        assert!(StorageFormat::Json.decode(r#"[{"when": "x"}]"#).is_err());
    }

    #[test]
    fn text_log_writes_one_line_per_note() {
        let notes = vec![
            note("01.01.2024 10:00", "first"),
            note("02.01.2024 11:30", "second"),
        ];
        let out = StorageFormat::TextLog.encode(&notes).unwrap();
        assert_eq!(out, "[01.01.2024 10:00] first\n[02.01.2024 11:30] second\n");
    }

    #[test]
    fn text_log_escapes_multiline_text() {
        let n = note("01.01.2024 10:00", "line one\nline two \\ done");
        let line = StorageFormat::TextLog.encode_one(&n).unwrap();
        assert_eq!(line, "[01.01.2024 10:00] line one\\nline two \\\\ done\n");

        let back = StorageFormat::TextLog.decode(&line).unwrap();
        assert_eq!(back.len(), 1);
        assert!(back[0].same_content(&n));
    }

    #[test]
    fn text_log_decode_is_lenient_with_free_text() {
        let raw = "[01.01.2024 10:00] kept\n\nhand written line\n[02.01.2024 10:00]\n[broken\n";
        let notes = StorageFormat::TextLog.decode(raw).unwrap();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].timestamp, "01.01.2024 10:00");
        assert_eq!(notes[0].text, "kept");
        assert_eq!(notes[1].timestamp, "");
        assert_eq!(notes[1].text, "hand written line");
        assert_eq!(notes[2].timestamp, "");
        assert_eq!(notes[2].text, "[broken");
    }

    #[test]
    fn unescape_leaves_unknown_sequences_alone() {
        assert_eq!(unescape(r"a\tb"), r"a\tb");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("JSON".parse::<StorageFormat>().unwrap(), StorageFormat::Json);
        assert_eq!(
            "text".parse::<StorageFormat>().unwrap(),
            StorageFormat::TextLog
        );
        assert!("yaml".parse::<StorageFormat>().is_err());
    }
}

//! Read-only, filtered and ordered views over a note collection.
//!
//! A projection never touches the collection it reads. Sorting is stable so
//! notes with equal keys keep their storage order, which makes repeated
//! projections over the same notes produce identical output.

use crate::error::{Result, StickiesError};
use crate::model::Note;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortMode {
    #[default]
    #[serde(rename = "date-desc")]
    DateDescending,
    #[serde(rename = "date-asc")]
    DateAscending,
    #[serde(rename = "alpha")]
    Alphabetical,
}

impl SortMode {
    pub fn all() -> &'static [SortMode] {
        &[
            SortMode::DateDescending,
            SortMode::DateAscending,
            SortMode::Alphabetical,
        ]
    }

    fn compare(&self, a: &Note, b: &Note) -> Ordering {
        match self {
            // Timestamps are fixed-width and zero padded, so string order is time order.
            SortMode::DateDescending => b.timestamp.cmp(&a.timestamp),
            SortMode::DateAscending => a.timestamp.cmp(&b.timestamp),
            SortMode::Alphabetical => a.text.to_lowercase().cmp(&b.text.to_lowercase()),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::DateDescending => write!(f, "date-desc"),
            SortMode::DateAscending => write!(f, "date-asc"),
            SortMode::Alphabetical => write!(f, "alpha"),
        }
    }
}

impl FromStr for SortMode {
    type Err = StickiesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "date-desc" | "desc" | "newest" => Ok(SortMode::DateDescending),
            "date-asc" | "asc" | "oldest" => Ok(SortMode::DateAscending),
            "alpha" | "alphabetical" | "text" => Ok(SortMode::Alphabetical),
            other => Err(StickiesError::Config(format!(
                "Unknown sort mode: {} (expected date-desc, date-asc or alpha)",
                other
            ))),
        }
    }
}

/// Search term plus sort mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub term: String,
    pub sort: SortMode,
}

impl NoteQuery {
    pub fn new(term: impl Into<String>, sort: SortMode) -> Self {
        Self {
            term: term.into(),
            sort,
        }
    }

    pub fn sorted(sort: SortMode) -> Self {
        Self::new("", sort)
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub fn project(&self, notes: &[Note]) -> Vec<Note> {
        project(notes, &self.term, self.sort)
    }
}

/// Filters `notes` by `term` (case-insensitive, text or timestamp) and sorts
/// the survivors by `sort`. Returns a new vector; `notes` is left as is.
pub fn project(notes: &[Note], term: &str, sort: SortMode) -> Vec<Note> {
    let term = term.to_lowercase();
    let mut listed: Vec<Note> = notes
        .iter()
        .filter(|n| matches_term(n, &term))
        .cloned()
        .collect();
    listed.sort_by(|a, b| sort.compare(a, b));
    listed
}

fn matches_term(note: &Note, term_lower: &str) -> bool {
    term_lower.is_empty()
        || note.text.to_lowercase().contains(term_lower)
        || note.timestamp.to_lowercase().contains(term_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::note;

    fn texts(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.text.as_str()).collect()
    }

    fn sample() -> Vec<Note> {
        vec![
            note("2024-01-02 09:00:00", "banana"),
            note("2024-01-01 10:00:00", "Buy milk"),
            note("2024-01-03 08:30:00", "apple"),
        ]
    }

    #[test]
    fn empty_term_matches_everything() {
        let notes = sample();
        assert_eq!(project(&notes, "", SortMode::DateAscending).len(), 3);
    }

    #[test]
    fn date_descending_orders_newest_first() {
        let listed = project(&sample(), "", SortMode::DateDescending);
        assert_eq!(texts(&listed), vec!["apple", "banana", "Buy milk"]);
    }

    #[test]
    fn date_ascending_is_reverse_of_descending_without_ties() {
        let notes = sample();
        let mut desc = project(&notes, "", SortMode::DateDescending);
        let asc = project(&notes, "", SortMode::DateAscending);
        desc.reverse();
        assert_eq!(desc, asc);
    }

    #[test]
    fn alphabetical_ignores_case() {
        let listed = project(&sample(), "", SortMode::Alphabetical);
        assert_eq!(texts(&listed), vec!["apple", "banana", "Buy milk"]);
    }

    #[test]
    fn search_is_case_insensitive_over_both_fields() {
        let notes = sample();
        for sort in SortMode::all() {
            let by_text = project(&notes, "MILK", *sort);
            assert_eq!(texts(&by_text), vec!["Buy milk"]);

            let by_time = project(&notes, "2024-01-01", *sort);
            assert_eq!(texts(&by_time), vec!["Buy milk"]);

            assert!(project(&notes, "bread", *sort).is_empty());
        }
    }

    #[test]
    fn ties_keep_storage_order() {
        let notes = vec![
            note("2024-01-01 10:00:00", "first"),
            note("2024-01-01 10:00:00", "second"),
            note("2024-01-01 10:00:00", "third"),
        ];
        for sort in [SortMode::DateDescending, SortMode::DateAscending] {
            let listed = project(&notes, "", sort);
            assert_eq!(texts(&listed), vec!["first", "second", "third"]);
        }

        let same_text = vec![
            note("2024-01-02 10:00:00", "Same"),
            note("2024-01-01 10:00:00", "same"),
        ];
        let listed = project(&same_text, "", SortMode::Alphabetical);
        assert_eq!(listed[0].timestamp, "2024-01-02 10:00:00");
    }

    #[test]
    fn projecting_twice_is_identical_and_leaves_input_untouched() {
        let notes = sample();
        let before = notes.clone();
        let query = NoteQuery::new("a", SortMode::Alphabetical);
        let first = query.project(&notes);
        let second = query.project(&notes);
        assert_eq!(first, second);
        assert_eq!(notes, before);
    }

    #[test]
    fn sort_mode_names_round_trip_through_display() {
        for sort in SortMode::all() {
            assert_eq!(sort.to_string().parse::<SortMode>().unwrap(), *sort);
        }
        assert!("random".parse::<SortMode>().is_err());
    }
}

//! # Display indexes
//!
//! Notes are addressed by stable [`NoteId`]s internally, but those are not
//! something a person types. Every listing therefore numbers its rows from 1,
//! and commands that take an index resolve it against the same projection the
//! listing was produced from (same search term, same sort mode).
//!
//! The consequence is that an index is only meaningful together with the
//! query it came from: `3` under `alpha` and `3` under `date-desc` are
//! usually different notes.

use crate::error::{Result, StickiesError};
use crate::model::{Note, NoteId};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayIndex(pub usize);

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DisplayIndex {
    type Err = StickiesError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_end_matches('.');
        match trimmed.parse::<usize>() {
            Ok(n) if n > 0 => Ok(DisplayIndex(n)),
            _ => Err(StickiesError::InvalidIndex(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNote {
    pub index: DisplayIndex,
    pub note: Note,
}

/// Numbers a projection from 1 in its current order.
pub fn index_notes(notes: Vec<Note>) -> Vec<DisplayNote> {
    notes
        .into_iter()
        .enumerate()
        .map(|(i, note)| DisplayNote {
            index: DisplayIndex(i + 1),
            note,
        })
        .collect()
}

/// Finds the id behind a display index.
pub fn resolve(listed: &[DisplayNote], index: DisplayIndex) -> Result<NoteId> {
    listed
        .iter()
        .find(|dn| dn.index == index)
        .map(|dn| dn.note.id)
        .ok_or_else(|| StickiesError::InvalidIndex(format!("{} is not in the current listing", index)))
}

pub fn parse_indexes<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<DisplayIndex>> {
    inputs.iter().map(|s| s.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::note;

    #[test]
    fn numbers_from_one_in_order() {
        let listed = index_notes(vec![note("t1", "a"), note("t2", "b")]);
        assert_eq!(listed[0].index, DisplayIndex(1));
        assert_eq!(listed[0].note.text, "a");
        assert_eq!(listed[1].index, DisplayIndex(2));
    }

    #[test]
    fn resolves_index_to_id() {
        let b = note("t2", "b");
        let listed = index_notes(vec![note("t1", "a"), b.clone()]);
        assert_eq!(resolve(&listed, DisplayIndex(2)).unwrap(), b.id);
        assert!(matches!(
            resolve(&listed, DisplayIndex(3)),
            Err(StickiesError::InvalidIndex(_))
        ));
    }

    #[test]
    fn parses_plain_and_dotted_numbers() {
        assert_eq!("4".parse::<DisplayIndex>().unwrap(), DisplayIndex(4));
        assert_eq!("4.".parse::<DisplayIndex>().unwrap(), DisplayIndex(4));
        assert!("0".parse::<DisplayIndex>().is_err());
        assert!("p1".parse::<DisplayIndex>().is_err());
        assert!(parse_indexes(&["1", "x"]).is_err());
    }
}

use crate::error::{Result, StickiesError};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for a note within one store instance.
///
/// Ids are not written to disk; they are handed out whenever a record enters
/// the store (append, load, import). Two notes with identical text and
/// timestamp therefore remain distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(Uuid);

impl NoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pattern used to render note timestamps.
///
/// Both patterns are fixed-width and zero padded. `Iso` sorts chronologically
/// as a plain string; `Dotted` is what the text-log flavour historically used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimestampFormat {
    #[default]
    Iso,
    Dotted,
}

impl TimestampFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            TimestampFormat::Iso => "%Y-%m-%d %H:%M:%S",
            TimestampFormat::Dotted => "%d.%m.%Y %H:%M",
        }
    }

    pub fn render(&self, at: NaiveDateTime) -> String {
        at.format(self.pattern()).to_string()
    }

    pub fn stamp(&self, clock: &dyn Clock) -> String {
        self.render(clock.now())
    }

    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s, self.pattern()).ok()
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampFormat::Iso => write!(f, "iso"),
            TimestampFormat::Dotted => write!(f, "dotted"),
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = StickiesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "iso" => Ok(TimestampFormat::Iso),
            "dotted" => Ok(TimestampFormat::Dotted),
            other => Err(StickiesError::Config(format!(
                "Unknown timestamp format: {} (expected iso or dotted)",
                other
            ))),
        }
    }
}

/// Source of "now" for timestamps.
pub trait Clock: Send {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A single sticky note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub timestamp: String,
    pub text: String,
}

impl Note {
    /// Builds a note from user input. The text is trimmed; blank text is rejected.
    pub fn new(timestamp: impl Into<String>, text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StickiesError::EmptyNote);
        }
        Ok(Self {
            id: NoteId::new(),
            timestamp: timestamp.into(),
            text: text.to_string(),
        })
    }

    /// Same timestamp and text, ignoring the id.
    pub fn same_content(&self, other: &Note) -> bool {
        self.timestamp == other.timestamp && self.text == other.text
    }

    /// Replaces the text and refreshes the timestamp.
    ///
    /// A fresh timestamp earlier than the current one (clock moved back)
    /// is ignored so edits never travel back in time.
    pub(crate) fn revise(
        &mut self,
        text: &str,
        now: NaiveDateTime,
        format: TimestampFormat,
    ) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StickiesError::EmptyNote);
        }
        self.text = text.to_string();
        let moved_back = format
            .parse(&self.timestamp)
            .is_some_and(|previous| now < previous);
        if !moved_back {
            self.timestamp = format.render(now);
        }
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::sync::{Arc, Mutex};

    /// Clock that only moves when told to. Clones share the same time.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        now: Arc<Mutex<NaiveDateTime>>,
    }

    impl ManualClock {
        pub fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> Self {
            let start = NaiveDate::from_ymd_opt(y, m, d)
                .and_then(|date| date.and_hms_opt(hh, mm, ss))
                .expect("valid fixture date");
            Self {
                now: Arc::new(Mutex::new(start)),
            }
        }

        pub fn advance_secs(&self, secs: i64) {
            let mut now = self.now.lock().expect("clock lock");
            *now += Duration::seconds(secs);
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::at(2024, 1, 1, 10, 0, 0)
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> NaiveDateTime {
            *self.now.lock().expect("clock lock")
        }
    }

    pub fn note(timestamp: &str, text: &str) -> Note {
        Note::new(timestamp, text).expect("fixture note text is not blank")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{note, ManualClock};
    use super::*;

    #[test]
    fn new_trims_text() {
        let n = Note::new("2024-01-01 10:00:00", "  Buy milk \n").unwrap();
        assert_eq!(n.text, "Buy milk");
    }

    #[test]
    fn new_rejects_blank_text() {
        assert!(matches!(Note::new("t", ""), Err(StickiesError::EmptyNote)));
        assert!(matches!(
            Note::new("t", "   \t"),
            Err(StickiesError::EmptyNote)
        ));
    }

    #[test]
    fn ids_are_unique_for_identical_content() {
        let a = note("2024-01-01 10:00:00", "same");
        let b = note("2024-01-01 10:00:00", "same");
        assert_ne!(a.id, b.id);
        assert_ne!(a, b);
        assert!(a.same_content(&b));
    }

    #[test]
    fn stamps_use_fixed_width_patterns() {
        let clock = ManualClock::at(2024, 3, 7, 9, 5, 2);
        assert_eq!(TimestampFormat::Iso.stamp(&clock), "2024-03-07 09:05:02");
        assert_eq!(TimestampFormat::Dotted.stamp(&clock), "07.03.2024 09:05");
    }

    #[test]
    fn revise_never_moves_timestamp_backwards() {
        let format = TimestampFormat::Iso;
        let mut n = note("2024-01-02 00:00:00", "old");
        let earlier = ManualClock::at(2024, 1, 1, 0, 0, 0);
        n.revise("new", earlier.now(), format).unwrap();
        assert_eq!(n.text, "new");
        assert_eq!(n.timestamp, "2024-01-02 00:00:00");

        let later = ManualClock::at(2024, 1, 3, 0, 0, 0);
        n.revise("newer", later.now(), format).unwrap();
        assert_eq!(n.timestamp, "2024-01-03 00:00:00");
    }

    #[test]
    fn revise_compares_dotted_timestamps_chronologically() {
        let format = TimestampFormat::Dotted;
        // "31.01.2024" sorts after "01.02.2024" as a string but is earlier in time.
        let mut n = note("31.01.2024 10:00", "old");
        let next_day = ManualClock::at(2024, 2, 1, 9, 0, 0);
        n.revise("new", next_day.now(), format).unwrap();
        assert_eq!(n.timestamp, "01.02.2024 09:00");
    }

    #[test]
    fn revise_rejects_blank_text() {
        let mut n = note("2024-01-02 00:00:00", "keep");
        let clock = ManualClock::default();
        assert!(n.revise("  ", clock.now(), TimestampFormat::Iso).is_err());
        assert_eq!(n.text, "keep");
    }

    #[test]
    fn parses_timestamp_format_names() {
        assert_eq!(
            "ISO".parse::<TimestampFormat>().unwrap(),
            TimestampFormat::Iso
        );
        assert_eq!(
            "dotted".parse::<TimestampFormat>().unwrap(),
            TimestampFormat::Dotted
        );
        assert!("unix".parse::<TimestampFormat>().is_err());
    }
}

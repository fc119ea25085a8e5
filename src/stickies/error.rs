use crate::model::NoteId;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two persisted files a write failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Primary,
    Backup,
    Export,
}

impl fmt::Display for SaveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveTarget::Primary => write!(f, "notes file"),
            SaveTarget::Backup => write!(f, "backup file"),
            SaveTarget::Export => write!(f, "export file"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StickiesError {
    #[error("Error loading notes from {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: Box<StickiesError>,
    },

    #[error("Error saving {target}: {source}")]
    Save {
        target: SaveTarget,
        #[source]
        source: std::io::Error,
    },

    #[error("Note not found: {0}")]
    NotFound(NoteId),

    #[error("Note text cannot be empty")]
    EmptyNote,

    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store worker error: {0}")]
    Worker(String),
}

impl StickiesError {
    pub fn load(path: impl Into<PathBuf>, source: StickiesError) -> Self {
        StickiesError::Load {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub fn save(target: SaveTarget, source: std::io::Error) -> Self {
        StickiesError::Save { target, source }
    }

    pub fn is_save(&self) -> bool {
        matches!(self, StickiesError::Save { .. })
    }
}

pub type Result<T> = std::result::Result<T, StickiesError>;

use crate::error::{Result, StickiesError};
use crate::format::StorageFormat;
use crate::model::TimestampFormat;
use crate::query::SortMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LOG_FILE: &str = "notes.log";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

/// Presentation settings. Persisted alongside the store configuration but
/// only ever read by the front end; the note store does not look at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub language: Language,
    /// Last window position of the quick-entry window, if any.
    #[serde(default)]
    pub position: Option<[i32; 2]>,
}

/// Configuration for stickies, stored in `<data dir>/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StickiesConfig {
    /// Storage flavour: a JSON array or a plain text log
    #[serde(default)]
    pub format: StorageFormat,

    /// Timestamp pattern for new and edited notes (defaults per format)
    #[serde(default)]
    pub timestamp_format: Option<TimestampFormat>,

    /// Primary file name (defaults per format)
    #[serde(default)]
    pub data_file: Option<String>,

    /// Backup file name (defaults per format)
    #[serde(default)]
    pub backup_file: Option<String>,

    /// Sort mode used when none is given on the command line
    #[serde(default)]
    pub default_sort: SortMode,

    /// error, warn, info, debug or trace
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log file name inside the data dir; None disables file logging
    #[serde(default = "default_log_file")]
    pub log_file: Option<String>,

    #[serde(default)]
    pub settings: Settings,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_log_file() -> Option<String> {
    Some(DEFAULT_LOG_FILE.to_string())
}

impl Default for StickiesConfig {
    fn default() -> Self {
        Self {
            format: StorageFormat::default(),
            timestamp_format: None,
            data_file: None,
            backup_file: None,
            default_sort: SortMode::default(),
            log_level: default_log_level(),
            log_file: default_log_file(),
            settings: Settings::default(),
        }
    }
}

/// Keys accepted by [`StickiesConfig::get`] and [`StickiesConfig::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "format",
    "timestamp-format",
    "data-file",
    "backup-file",
    "default-sort",
    "log-level",
    "log-file",
    "theme",
    "language",
    "position",
];

impl StickiesConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: StickiesConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.timestamp_format
            .unwrap_or_else(|| self.format.default_timestamp_format())
    }

    pub fn data_file(&self) -> &str {
        self.data_file
            .as_deref()
            .unwrap_or_else(|| self.format.default_data_file())
    }

    pub fn backup_file(&self) -> &str {
        self.backup_file
            .as_deref()
            .unwrap_or_else(|| self.format.default_backup_file())
    }

    pub fn log_path(&self, data_dir: &Path) -> Option<PathBuf> {
        self.log_file.as_ref().map(|name| data_dir.join(name))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "format" => self.format.to_string(),
            "timestamp-format" => self.timestamp_format().to_string(),
            "data-file" => self.data_file().to_string(),
            "backup-file" => self.backup_file().to_string(),
            "default-sort" => self.default_sort.to_string(),
            "log-level" => self.log_level.clone(),
            "log-file" => self.log_file.clone().unwrap_or_else(|| "none".to_string()),
            "theme" => self.settings.theme.to_string(),
            "language" => self.settings.language.to_string(),
            "position" => match self.settings.position {
                Some([x, y]) => format!("{},{}", x, y),
                None => "none".to_string(),
            },
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "format" => self.format = value.parse()?,
            "timestamp-format" => self.timestamp_format = Some(value.parse()?),
            "data-file" => self.data_file = Some(file_name(value)?),
            "backup-file" => self.backup_file = Some(file_name(value)?),
            "default-sort" => self.default_sort = value.parse()?,
            "log-level" => self.log_level = log_level(value)?,
            "log-file" => {
                self.log_file = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(file_name(value)?)
                }
            }
            "theme" => self.settings.theme = value.parse()?,
            "language" => self.settings.language = value.parse()?,
            "position" => self.settings.position = position(value)?,
            other => {
                return Err(StickiesError::Config(format!(
                    "Unknown config key: {}",
                    other
                )))
            }
        }
        Ok(())
    }

    /// All keys with their current values, in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

fn file_name(value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() || value.contains('/') || value.contains('\\') {
        return Err(StickiesError::Config(format!(
            "Expected a plain file name, got: {:?}",
            value
        )));
    }
    Ok(value.to_string())
}

fn log_level(value: &str) -> Result<String> {
    let lower = value.to_lowercase();
    match lower.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" => Ok(lower),
        _ => Err(StickiesError::Config(format!(
            "Unknown log level: {} (expected error, warn, info, debug or trace)",
            value
        ))),
    }
}

fn position(value: &str) -> Result<Option<[i32; 2]>> {
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let parsed: Option<[i32; 2]> = value
        .split_once(',')
        .and_then(|(x, y)| Some([x.trim().parse().ok()?, y.trim().parse().ok()?]));
    parsed.map(Some).ok_or_else(|| {
        StickiesError::Config(format!("Expected a position like 120,340, got: {}", value))
    })
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = StickiesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(StickiesError::Config(format!("Unknown theme: {}", other))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Ru => write!(f, "ru"),
            Language::En => write!(f, "en"),
        }
    }
}

impl FromStr for Language {
    type Err = StickiesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            other => Err(StickiesError::Config(format!("Unknown language: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = StickiesConfig::default();
        assert_eq!(config.format, StorageFormat::Json);
        assert_eq!(config.data_file(), "notes.json");
        assert_eq!(config.backup_file(), "notes_backup.json");
        assert_eq!(config.timestamp_format(), TimestampFormat::Iso);
        assert_eq!(config.log_file.as_deref(), Some("notes.log"));
    }

    #[test]
    fn test_text_format_changes_defaults() {
        let mut config = StickiesConfig::default();
        config.set("format", "text").unwrap();
        assert_eq!(config.data_file(), "notes.txt");
        assert_eq!(config.backup_file(), "notes_backup.txt");
        assert_eq!(config.timestamp_format(), TimestampFormat::Dotted);

        config.set("timestamp-format", "iso").unwrap();
        assert_eq!(config.timestamp_format(), TimestampFormat::Iso);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = StickiesConfig::default();
        assert!(config.set("format", "yaml").is_err());
        assert!(config.set("data-file", "../escape.json").is_err());
        assert!(config.set("log-level", "loud").is_err());
        assert!(config.set("position", "12").is_err());
        assert!(config.set("nope", "x").is_err());
        assert_eq!(config, StickiesConfig::default());
    }

    #[test]
    fn test_settings_keys() {
        let mut config = StickiesConfig::default();
        config.set("theme", "Dark").unwrap();
        config.set("language", "en").unwrap();
        config.set("position", "120, 340").unwrap();
        assert_eq!(config.get("theme").unwrap(), "dark");
        assert_eq!(config.get("language").unwrap(), "en");
        assert_eq!(config.settings.position, Some([120, 340]));

        config.set("position", "none").unwrap();
        assert_eq!(config.get("position").unwrap(), "none");
    }

    #[test]
    fn test_log_file_can_be_disabled() {
        let mut config = StickiesConfig::default();
        config.set("log-file", "none").unwrap();
        assert_eq!(config.log_path(Path::new("/data")), None);
        config.set("log-file", "debug.log").unwrap();
        assert_eq!(
            config.log_path(Path::new("/data")),
            Some(PathBuf::from("/data/debug.log"))
        );
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = StickiesConfig::load(dir.path()).unwrap();
        assert_eq!(config, StickiesConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("stickies");

        let mut config = StickiesConfig::default();
        config.set("format", "text").unwrap();
        config.set("default-sort", "alpha").unwrap();
        config.save(&nested).unwrap();

        let loaded = StickiesConfig::load(&nested).unwrap();
        assert_eq!(loaded.format, StorageFormat::TextLog);
        assert_eq!(loaded.default_sort, SortMode::Alphabetical);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"format": "text"}"#).unwrap();
        let loaded = StickiesConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.format, StorageFormat::TextLog);
        assert_eq!(loaded.log_level, "info");
        assert_eq!(loaded.settings, Settings::default());
    }

    #[test]
    fn test_entries_list_every_key() {
        let config = StickiesConfig::default();
        let keys: Vec<_> = config.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, CONFIG_KEYS);
    }
}

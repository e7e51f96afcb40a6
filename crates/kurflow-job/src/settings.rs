//! Persisted job settings.

use chrono::{Datelike, NaiveDate};
use directories::ProjectDirs;
use kurflow_format::OutputFormat;
use kurflow_types::{DateRange, DateRangeError, Frequency};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::SettingsError;

/// File name of the settings document.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The parameters of the last job, as saved by the user.
///
/// Every field is optional in the JSON document; missing or unreadable
/// dates fall back to the defaults of [`Settings::date_range`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// First day of the range.
    #[serde(deserialize_with = "lenient_date")]
    pub start: Option<NaiveDate>,
    /// Last day of the range.
    #[serde(deserialize_with = "lenient_date")]
    pub end: Option<NaiveDate>,
    /// Selected currency codes; empty selects all.
    pub currencies: Vec<String>,
    /// Target frequency.
    pub frequency: Frequency,
    /// Output directory.
    pub out_folder: Option<PathBuf>,
    /// Output file format.
    pub out_format: OutputFormat,
}

impl Settings {
    /// Parses settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a JSON object of the
    /// expected shape.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the settings as a pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the saved range, defaulting to January 1 of `today`'s year
    /// through `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting start is after the end.
    pub fn date_range(&self, today: NaiveDate) -> Result<DateRange, DateRangeError> {
        let start = self
            .start
            .or_else(|| NaiveDate::from_ymd_opt(today.year(), 1, 1))
            .unwrap_or(today);
        let end = self.end.unwrap_or(today);
        DateRange::new(start, end)
    }

    /// Returns the output directory, treating an empty path as unset.
    #[must_use]
    pub fn output_folder(&self) -> Option<&Path> {
        self.out_folder
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

/// Accepts `YYYY-MM-DD`, mapping null, blank or invalid text to `None`.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|text| NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()))
}

/// Loads and saves [`Settings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store bound to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default settings path.
    ///
    /// Uses the `directories` crate to find the appropriate location:
    /// - Linux: `~/.config/kurflow/settings.json`
    /// - macOS: `~/Library/Application Support/kurflow/settings.json`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\kurflow\config\settings.json`
    ///
    /// Falls back to `~/.kurflow/settings.json` if the platform-specific
    /// location cannot be determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "kurflow")
            .map_or_else(dirs_fallback, |proj_dirs| proj_dirs.config_dir().to_path_buf())
            .join(SETTINGS_FILE_NAME)
    }

    /// Creates a store at the default path.
    #[must_use]
    pub fn with_default_path() -> Self {
        Self::new(Self::default_path())
    }

    /// Returns the settings file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the settings. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| SettingsError::ReadFile {
            path: self.path.clone(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| SettingsError::ParseFile {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Loads the settings, falling back to the defaults on any error.
    #[must_use]
    pub fn load_or_default(&self) -> Settings {
        self.load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable settings");
            Settings::default()
        })
    }

    /// Saves the settings, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = settings.to_json()?;
        fs::write(&self.path, json).map_err(|e| SettingsError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// Fallback for determining the configuration directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".kurflow")
}

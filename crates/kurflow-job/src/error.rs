//! Job and settings errors.

use kurflow_format::FormatError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can end a fetch job.
#[derive(Error, Debug)]
pub enum JobError {
    /// Another job is still running on this runner.
    #[error("A fetch job is already running")]
    AlreadyRunning,

    /// Writing the output file failed.
    #[error("Failed to export table to '{path}': {source}")]
    Export {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying format or I/O error.
        source: FormatError,
    },

    /// The job task panicked or was aborted.
    #[error("Job task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors that can occur while loading or saving settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to create the settings directory.
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        /// The path that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read the settings file.
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the settings file.
    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid JSON of the expected shape.
    #[error("Failed to parse settings file '{path}': {source}")]
    ParseFile {
        /// The path that could not be parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

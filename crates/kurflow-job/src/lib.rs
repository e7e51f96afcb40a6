//! Fetch job runner, export step and settings persistence for kurflow.
//!
//! This crate drives the fetch–resample–export pipeline on a background
//! task and keeps the user's last job settings:
//!
//! - [`FetchRequest`] - Parameters of one fetch job
//! - [`JobRunner`] - Starts at most one job at a time
//! - [`JobHandle`] - Progress receiver, cancellation and completion of a job
//! - [`ProgressEvent`] - Per-day progress report
//! - [`export_table`] - Writes a table under its conventional file name
//! - [`SettingsStore`] - Loads and saves [`Settings`]

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kurflow/kurflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod export;
mod job;
mod progress;
mod runner;
mod settings;

pub use error::{JobError, SettingsError};
pub use export::{FILE_PREFIX, export_table, output_file_name};
pub use job::{FetchRequest, JobId, JobOutcome, OutputTarget};
pub use progress::ProgressEvent;
pub use runner::{CancelToken, JobHandle, JobRunner, PROGRESS_CHANNEL_CAPACITY, run_fetch_job};
pub use settings::{SETTINGS_FILE_NAME, Settings, SettingsStore};

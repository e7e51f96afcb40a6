//! Argument parsing and progress display helpers for the kurflow CLI.

use chrono::NaiveDate;
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use kurflow_lib::prelude::*;

/// Output file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Xlsx,
    Csv,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Xlsx => Self::Xlsx,
            Format::Csv => Self::Csv,
        }
    }
}

/// Parses a date in ISO (`YYYY-MM-DD`) or Turkish (`DD.MM.YYYY`) notation.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d.%m.%Y"))
        .map_err(|_| format!("Invalid date '{s}', expected YYYY-MM-DD or DD.MM.YYYY"))
}

/// Parses a frequency identifier or its localized label.
pub(crate) fn parse_frequency(s: &str) -> Result<Frequency, String> {
    s.parse::<Frequency>().map_err(|e| e.to_string())
}

/// Creates the per-day progress bar, hidden in quiet mode.
pub(crate) fn day_progress_bar(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} days ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

//! Library for fetching and resampling TCMB exchange rates.
//!
//! This is a facade crate that re-exports functionality from the kurflow
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use kurflow_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let client = DownloadClient::with_defaults()?;
//!     let range = DateRange::new(
//!         chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         chrono::NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
//!     )?;
//!
//!     let daily = fetch_range(&client, range, &["USD", "EUR"], |date, ok| {
//!         println!("{date} {}", if ok { "✓" } else { "—" });
//!     })
//!     .await;
//!
//!     let monthly = resample(daily, Frequency::Monthly);
//!     println!("{} monthly rows", monthly.len());
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kurflow/kurflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use kurflow_types::*;

// Re-export currency registry
pub use kurflow_currencies::CurrencyRegistry;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use kurflow_fetch::{
    ClientConfig, DayBatch, DayOutcome, DownloadClient, DownloadError, ParseError, WantedCodes,
    day_stream, fetch_range, parse_document, parse_quote_field, url,
};

// Re-export resampling
#[cfg(feature = "resample")]
pub use kurflow_resample::{PeriodReducer, forward_fill, period_anchor, resample, twice_monthly};

// Re-export formatters
#[cfg(feature = "format")]
pub use kurflow_format::{
    CsvFormatter, FormatError, Formatter, INDEX_LABEL, OutputFormat, XlsxFormatter, column_label,
    parse_column_label, read_csv,
};

// Re-export job management
#[cfg(feature = "job")]
pub use kurflow_job::{
    CancelToken, FetchRequest, JobError, JobHandle, JobId, JobOutcome, JobRunner, OutputTarget,
    ProgressEvent, Settings, SettingsError, SettingsStore, export_table, output_file_name,
    run_fetch_job,
};

/// Prelude module for convenient imports.
///
/// ```
/// use kurflow_lib::prelude::*;
/// ```
pub mod prelude {
    pub use kurflow_types::{
        ColumnKey, Currency, DailyRecord, DateRange, DateRangeError, Frequency, Quote, QuoteField,
        RateRow, RateTable,
    };

    pub use kurflow_currencies::CurrencyRegistry;

    #[cfg(feature = "fetch")]
    pub use kurflow_fetch::{ClientConfig, DayOutcome, DownloadClient, day_stream, fetch_range};

    #[cfg(feature = "resample")]
    pub use kurflow_resample::{forward_fill, resample};

    #[cfg(feature = "format")]
    pub use kurflow_format::{CsvFormatter, Formatter, OutputFormat, XlsxFormatter};

    #[cfg(feature = "job")]
    pub use kurflow_job::{FetchRequest, JobOutcome, JobRunner, ProgressEvent, Settings, SettingsStore};
}

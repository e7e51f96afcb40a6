//! Core types for the kurflow exchange-rate fetcher.
//!
//! This crate provides the fundamental data structures used throughout kurflow:
//!
//! - [`Quote`] - The four buy/sell values of one currency on one day
//! - [`QuoteField`] - One of the four quote fields
//! - [`DailyRecord`] - A quote tagged with its date and currency code
//! - [`RateTable`] - Date-indexed table keyed by (currency, field) columns
//! - [`Frequency`] - Resampling frequency
//! - [`DateRange`] - Inclusive date range for data retrieval
//! - [`Currency`] - Selectable currency with display names

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kurflow/kurflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod currency;
mod date_range;
mod error;
mod frequency;
mod quote;
mod table;

pub use currency::Currency;
pub use date_range::{DateRange, DayIterator};
pub use error::DateRangeError;
pub use frequency::{Frequency, FrequencyParseError};
pub use quote::{DailyRecord, Quote, QuoteField};
pub use table::{ColumnKey, RateRow, RateTable};

//! HTTP client and feed parsing for the kurflow exchange-rate fetcher.
//!
//! This crate provides the data download pipeline:
//!
//! - [`url::feed_url`] - Constructs TCMB archive URLs
//! - [`DownloadClient`] - HTTP client with a bounded timeout and request pacing
//! - [`parse_document`] - XML feed document parsing
//! - [`day_stream`] - Sequential per-day download stream
//! - [`fetch_range`] - Downloads a date range into a [`kurflow_types::RateTable`]

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kurflow/kurflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod parse;
mod stream;
pub mod url;

pub use client::{ClientConfig, DownloadClient, DownloadError};
pub use parse::{ParseError, WantedCodes, parse_document, parse_quote_field};
pub use stream::{DayBatch, DayOutcome, day_stream, fetch_range};

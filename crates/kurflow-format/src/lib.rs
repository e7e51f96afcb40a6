//! CSV and XLSX export for kurflow exchange-rate tables.
//!
//! This crate writes [`kurflow_types::RateTable`]s to files:
//!
//! - [`CsvFormatter`] - BOM-prefixed UTF-8 CSV, readable back with [`read_csv`]
//! - [`XlsxFormatter`] - Single-sheet Excel workbook
//! - [`column_label`] - Flattens column keys into `CODE-Label` headers

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kurflow/kurflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod labels;
mod xlsx;

pub use crate::csv::{CsvFormatter, read_csv};
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use labels::{INDEX_LABEL, column_label, parse_column_label};
pub use xlsx::XlsxFormatter;

//! Gap filling and frequency resampling for kurflow exchange-rate tables.
//!
//! This crate turns daily tables into tables at a coarser frequency:
//!
//! - [`forward_fill`] - Carries the last known value into missing cells
//! - [`period_anchor`] - Maps a date to the anchor of its period
//! - [`PeriodReducer`] - Streaming last-value-per-period reducer
//! - [`resample`] - Full resampling entry point

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kurflow/kurflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod fill;
mod period;
mod resampler;

pub use fill::forward_fill;
pub use period::period_anchor;
pub use resampler::{PeriodReducer, resample, twice_monthly};

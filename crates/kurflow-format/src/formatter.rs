//! Output format abstraction.

use kurflow_types::RateTable;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

use crate::{CsvFormatter, XlsxFormatter};

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook.
    #[default]
    Xlsx,
    /// Comma-separated values.
    Csv,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Xlsx, Self::Csv]
    }

    /// Writes `table` to `writer` with this format's default formatter.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn write_table<W: Write + Send>(
        &self,
        table: &RateTable,
        writer: W,
    ) -> Result<(), FormatError> {
        match self {
            Self::Xlsx => XlsxFormatter::new().write_table(table, writer),
            Self::Csv => CsvFormatter::new().write_table(table, writer),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook generation error.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The first header cell is not the date column.
    #[error("Missing date column, found {0:?}")]
    MissingIndex(String),

    /// A header cell is not a known column label.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A column label appears twice.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A data cell could not be parsed.
    #[error("Invalid value {value:?} in line {line}")]
    InvalidCell {
        /// 1-based line number in the input.
        line: u64,
        /// Offending cell text.
        value: String,
    },
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes a rate table to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write + Send>(&self, table: &RateTable, writer: W)
    -> Result<(), FormatError>;

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("xlsx".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!("Excel".parse::<OutputFormat>().unwrap(), OutputFormat::Xlsx);
        assert_eq!(" CSV ".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!(matches!(
            "parquet".parse::<OutputFormat>(),
            Err(FormatError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_output_format_default_and_extension() {
        assert_eq!(OutputFormat::default(), OutputFormat::Xlsx);
        for format in OutputFormat::all() {
            assert_eq!(format.to_string(), format.extension());
        }
    }
}

//! CSV output format.

use chrono::NaiveDate;
use csv::{Position, ReaderBuilder, WriterBuilder};
use kurflow_types::{RateRow, RateTable};
use std::io::{Read, Write};
use std::iter;

use crate::{FormatError, Formatter, INDEX_LABEL, column_label, parse_column_label};

/// Byte order mark written in front of the header so spreadsheet
/// applications detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// CSV formatter.
///
/// Writes a header row (`Date` followed by one `CODE-Label` per column)
/// and one line per table row. Dates are `YYYY-MM-DD`, numbers use their
/// shortest round-trip form and missing values are empty cells.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: u8,
    /// Whether to prefix the output with a UTF-8 byte order mark.
    include_bom: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            include_bom: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to write a byte order mark.
    #[must_use]
    pub const fn with_bom(mut self, include: bool) -> Self {
        self.include_bom = include;
        self
    }
}

impl Formatter for CsvFormatter {
    fn write_table<W: Write + Send>(
        &self,
        table: &RateTable,
        mut writer: W,
    ) -> Result<(), FormatError> {
        if self.include_bom {
            writer.write_all(UTF8_BOM)?;
        }

        let mut out = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        let header = iter::once(INDEX_LABEL.to_string()).chain(table.columns().iter().map(column_label));
        out.write_record(header)?;

        for row in table.rows() {
            let cells = iter::once(row.date.format(DATE_FORMAT).to_string()).chain(
                row.values
                    .iter()
                    .map(|value| value.map(|v| v.to_string()).unwrap_or_default()),
            );
            out.write_record(cells)?;
        }

        out.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}

/// Reads a table written by [`CsvFormatter`] with the default delimiter.
///
/// A leading byte order mark is accepted.
///
/// # Errors
///
/// Returns an error if the header is not a date column followed by known,
/// unique column labels, or if a date or value cell cannot be parsed.
pub fn read_csv<R: Read>(reader: R) -> Result<RateTable, FormatError> {
    let mut input = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = input.headers()?.clone();
    let mut labels = headers.iter();

    let index = labels.next().unwrap_or_default().trim_start_matches('\u{feff}');
    if index != INDEX_LABEL {
        return Err(FormatError::MissingIndex(index.to_string()));
    }

    let mut columns = Vec::with_capacity(headers.len().saturating_sub(1));
    for label in labels {
        let key = parse_column_label(label)
            .ok_or_else(|| FormatError::UnknownColumn(label.to_string()))?;
        if columns.contains(&key) {
            return Err(FormatError::DuplicateColumn(label.to_string()));
        }
        columns.push(key);
    }

    let mut rows = Vec::new();
    for record in input.records() {
        let record = record?;
        let line = record.position().map_or(0, Position::line);
        let mut cells = record.iter();

        let date_text = cells.next().unwrap_or_default().trim();
        let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|_| {
            FormatError::InvalidCell {
                line,
                value: date_text.to_string(),
            }
        })?;

        let values = cells
            .map(|cell| parse_value(cell, line))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(RateRow::new(date, values));
    }

    Ok(RateTable::from_rows(columns, rows))
}

fn parse_value(cell: &str, line: u64) -> Result<Option<f64>, FormatError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| FormatError::InvalidCell {
            line,
            value: cell.to_string(),
        })
}

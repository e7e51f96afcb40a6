//! XLSX output format.

use kurflow_types::RateTable;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, XlsxError};
use std::io::Write;

use crate::{FormatError, Formatter, INDEX_LABEL, column_label};

/// Default worksheet name.
const SHEET_NAME: &str = "Kurlar";

const DATE_NUM_FORMAT: &str = "yyyy-mm-dd";
const DATE_COLUMN_WIDTH: f64 = 12.0;
const VALUE_COLUMN_WIDTH: f64 = 18.0;

/// Excel workbook formatter.
///
/// Produces a single worksheet with a bold header row, dates stored as
/// Excel dates, numbers as numbers and missing values as blank cells. The
/// header row and the date column are frozen.
#[derive(Debug, Clone)]
pub struct XlsxFormatter {
    sheet_name: String,
}

impl Default for XlsxFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxFormatter {
    /// Creates a new XLSX formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sheet_name: SHEET_NAME.to_string(),
        }
    }

    /// Sets the worksheet name.
    #[must_use]
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Builds the workbook and returns the encoded file contents.
    fn render(&self, table: &RateTable) -> Result<Vec<u8>, XlsxError> {
        let header = Format::new().set_bold();
        let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name)?;

        sheet.write_string_with_format(0, 0, INDEX_LABEL, &header)?;
        sheet.set_column_width(0, DATE_COLUMN_WIDTH)?;
        for (idx, key) in table.columns().iter().enumerate() {
            let col = column_number(idx + 1)?;
            sheet.write_string_with_format(0, col, column_label(key), &header)?;
            sheet.set_column_width(col, VALUE_COLUMN_WIDTH)?;
        }

        for (idx, row) in table.rows().iter().enumerate() {
            let line = row_number(idx + 1)?;
            sheet.write_datetime_with_format(line, 0, &row.date, &date_format)?;
            for (col_idx, value) in row.values.iter().enumerate() {
                if let Some(value) = value {
                    sheet.write_number(line, column_number(col_idx + 1)?, *value)?;
                }
            }
        }

        sheet.set_freeze_panes(1, 1)?;
        workbook.save_to_buffer()
    }
}

impl Formatter for XlsxFormatter {
    fn write_table<W: Write + Send>(
        &self,
        table: &RateTable,
        mut writer: W,
    ) -> Result<(), FormatError> {
        let bytes = self.render(table)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "xlsx"
    }
}

fn row_number(idx: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

fn column_number(idx: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

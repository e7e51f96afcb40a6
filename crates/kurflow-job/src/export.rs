//! Export step of a finished job.

use kurflow_format::{FormatError, OutputFormat};
use kurflow_types::{DateRange, Frequency, RateTable};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::JobError;

/// Common prefix of exported file names.
pub const FILE_PREFIX: &str = "TCMB_Kurlar";

/// Returns the conventional file name of an export.
///
/// Format: `TCMB_Kurlar_<YYYYMMDD>_<YYYYMMDD>_<Label>.<ext>`, where the
/// label is the frequency's localized label without spaces.
#[must_use]
pub fn output_file_name(range: DateRange, frequency: Frequency, format: OutputFormat) -> String {
    format!(
        "{FILE_PREFIX}_{}_{}_{}.{}",
        range.start.format("%Y%m%d"),
        range.end.format("%Y%m%d"),
        frequency.label().replace(' ', ""),
        format.extension()
    )
}

/// Writes `table` into `folder` under [`output_file_name`] and returns the
/// written path.
///
/// The folder is created if missing and an existing file is overwritten.
///
/// # Errors
///
/// Returns [`JobError::Export`] if the folder or file cannot be written or
/// the table cannot be encoded.
pub fn export_table(
    table: &RateTable,
    folder: &Path,
    range: DateRange,
    frequency: Frequency,
    format: OutputFormat,
) -> Result<PathBuf, JobError> {
    let path = folder.join(output_file_name(range, frequency, format));

    match write_file(table, folder, &path, format) {
        Ok(()) => {
            info!(path = %path.display(), rows = table.len(), "table exported");
            Ok(path)
        }
        Err(source) => Err(JobError::Export { path, source }),
    }
}

fn write_file(
    table: &RateTable,
    folder: &Path,
    path: &Path,
    format: OutputFormat,
) -> Result<(), FormatError> {
    fs::create_dir_all(folder)?;
    let writer = BufWriter::new(File::create(path)?);
    format.write_table(table, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kurflow_format::read_csv;
    use kurflow_types::{ColumnKey, QuoteField, RateRow};
    use tempfile::TempDir;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .unwrap()
    }

    fn sample() -> RateTable {
        RateTable::from_rows(
            vec![ColumnKey::new("USD", QuoteField::ForexBuying)],
            vec![RateRow::new(
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                vec![Some(30.3)],
            )],
        )
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name(range(), Frequency::Daily, OutputFormat::Xlsx),
            "TCMB_Kurlar_20240101_20240331_Günlük.xlsx"
        );
        assert_eq!(
            output_file_name(range(), Frequency::TwiceMonthly, OutputFormat::Csv),
            "TCMB_Kurlar_20240101_20240331_Ayda2Kez.csv"
        );
        assert_eq!(
            output_file_name(range(), Frequency::Quarterly, OutputFormat::Csv),
            "TCMB_Kurlar_20240101_20240331_3Aylık.csv"
        );
    }

    #[test]
    fn test_export_csv_creates_folder() {
        let temp_dir = TempDir::new().unwrap();
        let folder = temp_dir.path().join("nested").join("out");

        let path = export_table(&sample(), &folder, range(), Frequency::Monthly, OutputFormat::Csv)
            .unwrap();

        assert_eq!(path.parent().unwrap(), folder);
        let file = File::open(&path).unwrap();
        assert_eq!(read_csv(file).unwrap(), sample());
    }

    #[test]
    fn test_export_xlsx() {
        let temp_dir = TempDir::new().unwrap();

        let path = export_table(
            &sample(),
            temp_dir.path(),
            range(),
            Frequency::Monthly,
            OutputFormat::Xlsx,
        )
        .unwrap();

        assert!(path.to_string_lossy().ends_with("_Aylık.xlsx"));
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_export_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();

        let result = export_table(&sample(), &blocker, range(), Frequency::Daily, OutputFormat::Csv);
        assert!(matches!(result, Err(JobError::Export { .. })));
    }
}

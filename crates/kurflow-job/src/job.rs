//! Fetch job definitions.

use kurflow_format::OutputFormat;
use kurflow_types::{DateRange, Frequency, RateTable};
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a fetch job.
pub type JobId = Uuid;

/// Where and how a finished job writes its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// Output directory; created if missing.
    pub folder: PathBuf,
    /// File format.
    pub format: OutputFormat,
}

/// Parameters of one fetch job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Unique identifier for this job.
    pub id: JobId,
    /// Days to fetch.
    pub range: DateRange,
    /// Currency codes to keep; empty keeps all.
    pub currencies: Vec<String>,
    /// Target frequency of the result.
    pub frequency: Frequency,
    /// Export destination. Without one the table is only returned.
    pub output: Option<OutputTarget>,
}

impl FetchRequest {
    /// Creates a request without an export destination.
    #[must_use]
    pub fn new(range: DateRange, currencies: Vec<String>, frequency: Frequency) -> Self {
        Self {
            id: Uuid::new_v4(),
            range,
            currencies,
            frequency,
            output: None,
        }
    }

    /// Sets the export destination.
    #[must_use]
    pub fn with_output(mut self, folder: impl Into<PathBuf>, format: OutputFormat) -> Self {
        self.output = Some(OutputTarget {
            folder: folder.into(),
            format,
        });
        self
    }

    /// Returns true if every available currency is requested.
    #[must_use]
    pub fn is_all_currencies(&self) -> bool {
        self.currencies.is_empty()
    }
}

/// How a job ended, when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// Data was found; the table is resampled to the requested frequency.
    Completed {
        /// Resampled table.
        table: RateTable,
        /// Written file, if the request had an export destination.
        path: Option<PathBuf>,
    },
    /// No day of the range produced data. Nothing was resampled or written.
    NoData,
    /// The job was cancelled before all days were fetched.
    Cancelled,
}

impl JobOutcome {
    /// Returns the resampled table of a completed job.
    #[must_use]
    pub const fn table(&self) -> Option<&RateTable> {
        match self {
            Self::Completed { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Returns the exported file of a completed job.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Completed { path, .. } => path.as_ref(),
            _ => None,
        }
    }

    /// Returns the outcome as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::NoData => "no-data",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_requests_get_distinct_ids() {
        let a = FetchRequest::new(range(), Vec::new(), Frequency::Daily);
        let b = FetchRequest::new(range(), Vec::new(), Frequency::Daily);
        assert_ne!(a.id, b.id);
        assert!(a.is_all_currencies());
        assert!(a.output.is_none());
    }

    #[test]
    fn test_with_output() {
        let request = FetchRequest::new(range(), vec!["USD".to_string()], Frequency::Monthly)
            .with_output("/tmp/out", OutputFormat::Csv);

        let output = request.output.unwrap();
        assert_eq!(output.folder, PathBuf::from("/tmp/out"));
        assert_eq!(output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = JobOutcome::Completed {
            table: RateTable::empty(),
            path: Some(PathBuf::from("/tmp/x.csv")),
        };
        assert!(outcome.table().is_some());
        assert_eq!(outcome.path(), Some(&PathBuf::from("/tmp/x.csv")));
        assert_eq!(outcome.to_string(), "completed");

        assert!(JobOutcome::NoData.table().is_none());
        assert!(JobOutcome::Cancelled.path().is_none());
    }
}

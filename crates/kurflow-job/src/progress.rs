//! Per-day progress reporting.

use chrono::NaiveDate;
use kurflow_fetch::DayOutcome;

/// Progress report for one fetched day.
///
/// Events of one job are delivered in date order, one per day of the
/// requested range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// The day that was just processed.
    pub date: NaiveDate,
    /// How the day went.
    pub outcome: DayOutcome,
    /// Number of days processed so far, this one included.
    pub completed: usize,
    /// Number of days in the job.
    pub total: usize,
}

impl ProgressEvent {
    /// Marker shown for a day that produced data.
    pub const SUCCESS_MARKER: &'static str = "✓";

    /// Marker shown for any other day.
    pub const MISS_MARKER: &'static str = "—";

    /// Creates a new progress event.
    #[must_use]
    pub const fn new(date: NaiveDate, outcome: DayOutcome, completed: usize, total: usize) -> Self {
        Self {
            date,
            outcome,
            completed,
            total,
        }
    }

    /// Returns true if the day produced data.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Returns the completed share of the job, from 0 to 100.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }

    /// Returns the one-character status marker of the day.
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        if self.is_success() {
            Self::SUCCESS_MARKER
        } else {
            Self::MISS_MARKER
        }
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date.format("%d.%m.%Y"), self.marker())
    }
}

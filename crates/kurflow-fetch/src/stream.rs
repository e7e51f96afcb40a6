//! Sequential per-day download pipeline.

use std::pin::pin;

use chrono::NaiveDate;
use futures::stream::{self, Stream, StreamExt};
use kurflow_types::{DailyRecord, DateRange, RateTable};
use tracing::{debug, info};

use crate::url::feed_url_with_base;
use crate::{DownloadClient, WantedCodes, parse_document};

/// What happened when a single day was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    /// The document was parsed and at least one wanted currency was found.
    Fetched {
        /// Number of currencies extracted.
        currencies: usize,
    },
    /// The document was parsed but none of the wanted currencies were in it.
    NoMatches,
    /// The archive has no document for this day (HTTP 404), as on weekends
    /// and public holidays.
    NotPublished,
    /// Transport error, unexpected status or malformed document.
    Failed {
        /// Human-readable cause.
        reason: String,
    },
}

impl DayOutcome {
    /// Returns true if the day contributed data.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }

    /// Returns true if the day failed for a reason other than "nothing
    /// published" or "nothing matched".
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl std::fmt::Display for DayOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetched { currencies } => write!(f, "{currencies} currencies"),
            Self::NoMatches => write!(f, "no matching currencies"),
            Self::NotPublished => write!(f, "not published"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// The records fetched for one calendar day.
#[derive(Debug, Clone)]
pub struct DayBatch {
    /// The day this batch belongs to.
    pub date: NaiveDate,
    /// Extracted records, one per currency. Empty unless the day succeeded.
    pub records: Vec<DailyRecord>,
    /// How the day went.
    pub outcome: DayOutcome,
}

impl DayBatch {
    /// Creates a batch for a day that produced records.
    #[must_use]
    pub fn fetched(date: NaiveDate, records: Vec<DailyRecord>) -> Self {
        let outcome = if records.is_empty() {
            DayOutcome::NoMatches
        } else {
            DayOutcome::Fetched {
                currencies: records.len(),
            }
        };
        Self {
            date,
            records,
            outcome,
        }
    }

    /// Creates an empty batch with the given outcome.
    #[must_use]
    pub const fn without_records(date: NaiveDate, outcome: DayOutcome) -> Self {
        Self {
            date,
            records: Vec::new(),
            outcome,
        }
    }

    /// Returns true if the day contributed data.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Returns the number of records in the batch.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the batch holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Creates a stream yielding one [`DayBatch`] per day of `range`.
///
/// Days are fetched strictly one after another and yielded in date order.
/// A failed day never ends the stream; it is reported through its
/// [`DayOutcome`]. Consecutive requests are separated by the client's
/// configured request delay.
pub fn day_stream<'a>(
    client: &'a DownloadClient,
    range: DateRange,
    wanted: &'a WantedCodes,
) -> impl Stream<Item = DayBatch> + 'a {
    let delay = client.config().request_delay;
    let base_url = client.config().base_url.clone();

    stream::iter(range.days().enumerate()).then(move |(idx, date)| {
        let url = feed_url_with_base(&base_url, date);
        async move {
            if idx > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            fetch_day(client, date, &url, wanted).await
        }
    })
}

/// Downloads and parses the document of a single day.
async fn fetch_day(
    client: &DownloadClient,
    date: NaiveDate,
    url: &str,
    wanted: &WantedCodes,
) -> DayBatch {
    let body = match client.download(url).await {
        Ok(body) => body,
        Err(e) if e.is_not_found() => {
            debug!(%date, "no document published");
            return DayBatch::without_records(date, DayOutcome::NotPublished);
        }
        Err(e) => {
            debug!(%date, %url, error = %e, "download failed");
            return DayBatch::without_records(
                date,
                DayOutcome::Failed {
                    reason: e.to_string(),
                },
            );
        }
    };

    match parse_document(&body, wanted) {
        Ok(quotes) => {
            let records: Vec<DailyRecord> = quotes
                .into_iter()
                .map(|(code, quote)| DailyRecord::new(date, code, quote))
                .collect();
            debug!(%date, currencies = records.len(), "document parsed");
            DayBatch::fetched(date, records)
        }
        Err(e) => {
            debug!(%date, error = %e, "document could not be parsed");
            DayBatch::without_records(
                date,
                DayOutcome::Failed {
                    reason: e.to_string(),
                },
            )
        }
    }
}

/// Downloads every day of `range` and pivots the results into a table.
///
/// `codes` selects currencies (empty selects all). `on_progress` is called
/// once per day, in date order, with the day and whether it produced data.
/// If no day produced data the returned table is empty.
pub async fn fetch_range<S, F>(
    client: &DownloadClient,
    range: DateRange,
    codes: &[S],
    mut on_progress: F,
) -> RateTable
where
    S: AsRef<str>,
    F: FnMut(NaiveDate, bool),
{
    let wanted = WantedCodes::new(codes);
    let mut records = Vec::new();
    let mut fetched_days = 0usize;

    let mut batches = pin!(day_stream(client, range, &wanted));
    while let Some(batch) = batches.next().await {
        on_progress(batch.date, batch.is_success());
        if batch.is_success() {
            fetched_days += 1;
        }
        records.extend(batch.records);
    }

    info!(
        %range,
        fetched_days,
        total_days = range.total_days(),
        "range fetched"
    );
    RateTable::from_records(records)
}

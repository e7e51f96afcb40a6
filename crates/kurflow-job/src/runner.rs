//! Background execution of fetch jobs.

use futures::StreamExt;
use kurflow_fetch::{DownloadClient, WantedCodes, day_stream};
use kurflow_resample::resample;
use kurflow_types::RateTable;
use std::path::PathBuf;
use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{Instrument, Span, debug, info, info_span};

use crate::{
    FetchRequest, JobError, JobId, JobOutcome, OutputTarget, ProgressEvent, export_table,
};

/// Default capacity of a job's progress channel.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 64;

/// Cooperative cancellation flag shared between a job and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. The job stops before its next day.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Runs one fetch job to completion on the current task.
///
/// Days are fetched in order and one [`ProgressEvent`] per day is sent on
/// `progress`; a closed receiver does not stop the job. `cancel` is checked
/// before every day, and once set no further events are sent. If no day
/// produced data the result is [`JobOutcome::NoData`]; otherwise the table
/// is resampled to the requested frequency and, when the request has an
/// output target, exported.
///
/// # Errors
///
/// Returns [`JobError::Export`] if the export step fails.
pub async fn run_fetch_job(
    client: &DownloadClient,
    request: &FetchRequest,
    progress: &mpsc::Sender<ProgressEvent>,
    cancel: &CancelToken,
) -> Result<JobOutcome, JobError> {
    let span = info_span!("job", id = %request.id);
    execute(client, request, progress, cancel)
        .instrument(span)
        .await
}

async fn execute(
    client: &DownloadClient,
    request: &FetchRequest,
    progress: &mpsc::Sender<ProgressEvent>,
    cancel: &CancelToken,
) -> Result<JobOutcome, JobError> {
    info!(
        range = %request.range,
        currencies = request.currencies.len(),
        all_currencies = request.is_all_currencies(),
        frequency = request.frequency.as_str(),
        "job started"
    );

    let wanted = WantedCodes::new(request.currencies.as_slice());
    let total = request.range.total_days();
    let mut records = Vec::new();
    let mut completed = 0usize;

    let mut batches = pin!(day_stream(client, request.range, &wanted));
    loop {
        if cancel.is_cancelled() {
            info!(completed, total, "job cancelled");
            return Ok(JobOutcome::Cancelled);
        }
        let Some(batch) = batches.next().await else {
            break;
        };

        completed += 1;
        let event = ProgressEvent::new(batch.date, batch.outcome, completed, total);
        debug!(
            date = %event.date,
            outcome = %event.outcome,
            percent = event.percent(),
            "day processed"
        );
        records.extend(batch.records);
        if progress.send(event).await.is_err() {
            debug!("progress receiver closed");
        }
    }

    let raw = RateTable::from_records(records);
    if raw.is_empty() {
        info!("no data in range");
        return Ok(JobOutcome::NoData);
    }

    let table = resample(raw, request.frequency);
    let (table, path) = match request.output.clone() {
        Some(target) => {
            let (table, path) = export_blocking(table, target, request).await?;
            (table, Some(path?))
        }
        None => (table, None),
    };

    info!(rows = table.len(), columns = table.width(), "job completed");
    Ok(JobOutcome::Completed { table, path })
}

/// Writes `table` on the blocking pool and hands it back with the result.
async fn export_blocking(
    table: RateTable,
    target: OutputTarget,
    request: &FetchRequest,
) -> Result<(RateTable, Result<PathBuf, JobError>), JoinError> {
    let (range, frequency) = (request.range, request.frequency);
    let span = Span::current();
    tokio::task::spawn_blocking(move || {
        let path = span.in_scope(|| {
            export_table(&table, &target.folder, range, frequency, target.format)
        });
        (table, path)
    })
    .await
}

/// Starts fetch jobs on background tasks, one at a time.
#[derive(Debug, Clone)]
pub struct JobRunner {
    client: DownloadClient,
    active: Arc<AtomicBool>,
    channel_capacity: usize,
}

impl JobRunner {
    /// Creates a runner that fetches with `client`.
    #[must_use]
    pub fn new(client: DownloadClient) -> Self {
        Self {
            client,
            active: Arc::new(AtomicBool::new(false)),
            channel_capacity: PROGRESS_CHANNEL_CAPACITY,
        }
    }

    /// Sets the capacity of the progress channel (at least 1).
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Returns true while a job started by this runner is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Spawns `request` on a new tokio task.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::AlreadyRunning`] if a previous job has not
    /// finished yet.
    pub fn start(&self, request: FetchRequest) -> Result<JobHandle, JobError> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(JobError::AlreadyRunning);
        }

        let guard = ActiveGuard(Arc::clone(&self.active));
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let cancel = CancelToken::new();
        let id = request.id;

        let client = self.client.clone();
        let job_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            let outcome = run_fetch_job(&client, &request, &tx, &job_cancel).await;
            drop(guard);
            outcome
        });

        Ok(JobHandle {
            id,
            progress: rx,
            cancel,
            task,
        })
    }
}

/// Clears the runner's active flag when the job task ends, even by panic.
#[derive(Debug)]
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to a running job.
#[derive(Debug)]
pub struct JobHandle {
    id: JobId,
    progress: mpsc::Receiver<ProgressEvent>,
    cancel: CancelToken,
    task: JoinHandle<Result<JobOutcome, JobError>>,
}

impl JobHandle {
    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Receives the next progress event, or `None` once the job has sent
    /// its last one.
    pub async fn next_progress(&mut self) -> Option<ProgressEvent> {
        self.progress.recv().await
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns a token that cancels this job, for use from other tasks.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Waits for the job to finish. Undelivered progress events are dropped.
    ///
    /// # Errors
    ///
    /// Returns the job's error, or [`JobError::Join`] if the task panicked.
    pub async fn wait(self) -> Result<JobOutcome, JobError> {
        let Self { progress, task, .. } = self;
        drop(progress);
        task.await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kurflow_fetch::{ClientConfig, DayOutcome};
    use kurflow_format::OutputFormat;
    use kurflow_types::{ColumnKey, DateRange, Frequency, QuoteField};
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOCUMENT: &str = r#"<Tarih_Date Tarih="02.01.2024">
        <Currency Kod="USD"><ForexBuying>29,5</ForexBuying><ForexSelling>29,6</ForexSelling></Currency>
        <Currency Kod="EUR"><ForexBuying>32,1</ForexBuying><ForexSelling>32,2</ForexSelling></Currency>
    </Tarih_Date>"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn client_for(server: &MockServer, delay: Duration) -> DownloadClient {
        DownloadClient::new(ClientConfig {
            base_url: server.uri(),
            request_delay: delay,
            ..Default::default()
        })
        .unwrap()
    }

    async fn serve_document(server: &MockServer, url_path: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(DOCUMENT))
            .mount(server)
            .await;
    }

    fn request(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> FetchRequest {
        FetchRequest::new(
            DateRange::new(start, end).unwrap(),
            vec!["usd".to_string()],
            frequency,
        )
    }

    #[test_log::test(tokio::test)]
    async fn test_run_fetch_job_reports_every_day_in_order() {
        let server = MockServer::start().await;
        serve_document(&server, "/202401/02012024.xml").await;
        serve_document(&server, "/202401/04012024.xml").await;

        let client = client_for(&server, Duration::ZERO);
        let request = request(date(2024, 1, 2), date(2024, 1, 5), Frequency::Daily);
        let (tx, mut rx) = mpsc::channel(16);

        let outcome = run_fetch_job(&client, &request, &tx, &CancelToken::new())
            .await
            .unwrap();
        drop(tx);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        let dates: Vec<_> = events.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 2), date(2024, 1, 3), date(2024, 1, 4), date(2024, 1, 5)]
        );
        let markers: Vec<_> = events.iter().map(ProgressEvent::marker).collect();
        assert_eq!(markers, vec!["✓", "—", "✓", "—"]);
        assert_eq!(events.last().unwrap().completed, 4);
        assert!(events.iter().all(|e| e.total == 4));

        let table = outcome.table().unwrap();
        assert_eq!(table.currencies(), vec!["USD"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.value(date(2024, 1, 4), &ColumnKey::new("USD", QuoteField::ForexSelling)),
            Some(29.6)
        );
        assert!(outcome.path().is_none());
    }

    #[tokio::test]
    async fn test_run_fetch_job_without_data() {
        let server = MockServer::start().await;
        let client = client_for(&server, Duration::ZERO);
        let request = request(date(2024, 1, 6), date(2024, 1, 7), Frequency::Monthly);
        let (tx, mut rx) = mpsc::channel(16);

        let outcome = run_fetch_job(&client, &request, &tx, &CancelToken::new())
            .await
            .unwrap();
        drop(tx);

        assert_eq!(outcome, JobOutcome::NoData);
        let first = rx.recv().await.unwrap();
        assert_eq!(first.outcome, DayOutcome::NotPublished);
    }

    #[tokio::test]
    async fn test_run_fetch_job_exports() {
        let server = MockServer::start().await;
        serve_document(&server, "/202401/02012024.xml").await;
        let temp_dir = TempDir::new().unwrap();

        let client = client_for(&server, Duration::ZERO);
        let request = request(date(2024, 1, 1), date(2024, 1, 3), Frequency::Monthly)
            .with_output(temp_dir.path(), OutputFormat::Csv);
        let (tx, _rx) = mpsc::channel(16);

        let outcome = run_fetch_job(&client, &request, &tx, &CancelToken::new())
            .await
            .unwrap();

        let path = outcome.path().unwrap();
        assert!(path.ends_with("TCMB_Kurlar_20240101_20240103_Aylık.csv"));
        assert!(path.exists());
        assert_eq!(outcome.table().unwrap().first_date(), Some(date(2024, 1, 31)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_run_fetch_job_export_failure_is_fatal() {
        let server = MockServer::start().await;
        serve_document(&server, "/202401/02012024.xml").await;
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let client = client_for(&server, Duration::ZERO);
        let request = request(date(2024, 1, 2), date(2024, 1, 2), Frequency::Daily)
            .with_output(blocker.join("out"), OutputFormat::Xlsx);
        let (tx, _rx) = mpsc::channel(16);

        let err = run_fetch_job(&client, &request, &tx, &CancelToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, JobError::Export { .. }));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_sends_nothing() {
        let server = MockServer::start().await;
        let client = client_for(&server, Duration::ZERO);
        let request = request(date(2024, 1, 1), date(2024, 1, 31), Frequency::Daily);
        let (tx, mut rx) = mpsc::channel(64);
        let cancel = CancelToken::new();
        cancel.cancel();

        let outcome = run_fetch_job(&client, &request, &tx, &cancel).await.unwrap();
        drop(tx);

        assert_eq!(outcome, JobOutcome::Cancelled);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_runner_cancel_stops_between_days() {
        let server = MockServer::start().await;
        serve_document(&server, "/202401/02012024.xml").await;

        let runner = JobRunner::new(client_for(&server, Duration::from_millis(20)));
        let mut handle = runner
            .start(request(date(2024, 1, 1), date(2024, 3, 31), Frequency::Daily))
            .unwrap();

        let first = handle.next_progress().await.unwrap();
        assert_eq!(first.completed, 1);
        handle.cancel();

        let mut last_completed = first.completed;
        while let Some(event) = handle.next_progress().await {
            assert_eq!(event.completed, last_completed + 1);
            last_completed = event.completed;
        }

        assert!(last_completed < 91);
        assert_eq!(handle.wait().await.unwrap(), JobOutcome::Cancelled);
        assert!(!runner.is_running());
    }

    #[tokio::test]
    async fn test_runner_rejects_overlapping_jobs() {
        let server = MockServer::start().await;
        let runner = JobRunner::new(client_for(&server, Duration::from_millis(20)));

        let first = runner
            .start(request(date(2024, 1, 1), date(2024, 1, 10), Frequency::Daily))
            .unwrap();
        assert!(runner.is_running());

        let second = runner.start(request(date(2024, 2, 1), date(2024, 2, 2), Frequency::Daily));
        assert!(matches!(second, Err(JobError::AlreadyRunning)));

        assert_eq!(first.wait().await.unwrap(), JobOutcome::NoData);
        assert!(!runner.is_running());

        let third = runner
            .start(request(date(2024, 2, 1), date(2024, 2, 1), Frequency::Daily))
            .unwrap();
        assert_eq!(third.wait().await.unwrap(), JobOutcome::NoData);
    }
}

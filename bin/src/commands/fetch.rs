//! Fetch command implementation.
//!
//! This module runs a fetch job for the merged saved and command-line
//! settings, showing per-day progress and exporting the resampled table.

use crate::JobArgs;
use crate::display::day_progress_bar;
use anyhow::{Context, Result, bail};
use inquire::Confirm;
use kurflow_lib::prelude::*;
use std::time::Duration;

/// Options that only apply to a single fetch run.
#[derive(Debug)]
pub(crate) struct FetchOptions {
    pub(crate) base_url: Option<String>,
    pub(crate) timeout: u64,
    pub(crate) delay: u64,
    pub(crate) yes: bool,
    pub(crate) save_settings: bool,
    pub(crate) quiet: bool,
}

/// Fetch, resample and export exchange rates.
pub(crate) async fn fetch(store: &SettingsStore, args: JobArgs, options: FetchOptions) -> Result<()> {
    let mut settings = store.load_or_default();
    args.apply(&mut settings);

    let today = chrono::Local::now().date_naive();
    let range = settings
        .date_range(today)
        .context("End date must not be before the start date")?;

    let Some(folder) = settings.output_folder().map(ToOwned::to_owned) else {
        bail!("No output folder selected. Pass --out <DIR> or save one with `kurflow settings save --out <DIR>`");
    };

    let registry = CurrencyRegistry::global();
    settings.currencies = registry.normalize(&settings.currencies);

    if settings.currencies.is_empty() && !options.yes {
        let fetch_all = Confirm::new("No currency selected. Fetch all currencies?")
            .with_default(true)
            .prompt()?;
        if !fetch_all {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if options.save_settings {
        store
            .save(&settings)
            .with_context(|| format!("Failed to save settings to {}", store.path().display()))?;
    }

    let mut config = ClientConfig {
        timeout: Duration::from_secs(options.timeout),
        request_delay: Duration::from_millis(options.delay),
        ..Default::default()
    };
    if let Some(base_url) = options.base_url {
        config.base_url = base_url;
    }
    let client = DownloadClient::new(config)?;

    let request = FetchRequest::new(range, settings.currencies.clone(), settings.frequency)
        .with_output(folder, settings.out_format);
    tracing::info!(
        id = %request.id,
        %range,
        frequency = %settings.frequency,
        currencies = request.currencies.len(),
        "starting fetch job"
    );

    let runner = JobRunner::new(client);
    let mut handle = runner.start(request)?;

    let cancel = handle.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let progress = day_progress_bar(range.total_days(), options.quiet);
    progress.set_message(format!(
        "{} -> {} ({})",
        range.start.format("%d.%m.%Y"),
        range.end.format("%d.%m.%Y"),
        settings.frequency.label()
    ));

    while let Some(event) = handle.next_progress().await {
        progress.set_position(event.completed as u64);
        progress.set_message(event.to_string());
    }

    let result = handle.wait().await;
    interrupt.abort();

    match result {
        Ok(JobOutcome::Completed { table, path }) => {
            progress.finish_with_message(format!("Done: {} rows", table.len()));
            if let Some(path) = path {
                println!("Saved to {}", path.display());
            }
        }
        Ok(JobOutcome::NoData) => {
            progress.abandon_with_message("No data");
            println!("No data found for the selected range. Check the dates and currencies.");
        }
        Ok(JobOutcome::Cancelled) => {
            progress.abandon_with_message("Cancelled");
            println!("Fetch cancelled.");
        }
        Err(e) => {
            progress.abandon_with_message("Failed");
            return Err(e).context("Fetch job failed");
        }
    }

    Ok(())
}

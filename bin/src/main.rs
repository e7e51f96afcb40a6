//! kurflow CLI - TCMB daily exchange-rate fetcher.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use kurflow_lib::prelude::*;
use std::path::PathBuf;

mod commands;
mod display;
mod logging;

use display::{Format, parse_date, parse_frequency};

#[derive(Parser)]
#[command(name = "kurflow")]
#[command(about = "Fetch, resample and export TCMB daily exchange rates", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file. Defaults to the platform configuration directory.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch exchange rates for a date range and export them
    Fetch {
        #[command(flatten)]
        job: JobArgs,

        /// Archive base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Request timeout in seconds
        #[arg(long, default_value = "15")]
        timeout: u64,

        /// Pause between requests in milliseconds
        #[arg(long, default_value = "30")]
        delay: u64,

        /// Fetch all currencies without asking when none is selected
        #[arg(short, long)]
        yes: bool,

        /// Save the effective parameters as the new settings
        #[arg(long)]
        save_settings: bool,
    },

    /// List selectable currencies
    List {
        /// Search pattern (code, English or Turkish name)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print the archive URL of a day
    Url {
        /// Date (YYYY-MM-DD or DD.MM.YYYY)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Show or change saved settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

/// Actions on the settings file.
#[derive(Subcommand)]
enum SettingsAction {
    /// Print the saved settings
    Show,

    /// Print the settings file path
    Path,

    /// Update the saved settings
    Save {
        #[command(flatten)]
        job: JobArgs,
    },
}

/// Job parameters that can be given on the command line or saved.
#[derive(Args, Debug, Default)]
pub(crate) struct JobArgs {
    /// Start date (YYYY-MM-DD or DD.MM.YYYY). Defaults to January 1 of this year.
    #[arg(short, long, value_parser = parse_date)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD or DD.MM.YYYY). Defaults to today.
    #[arg(short, long, value_parser = parse_date)]
    end: Option<NaiveDate>,

    /// Currency codes, comma separated (e.g. USD,EUR). None selects all.
    #[arg(short, long, value_delimiter = ',')]
    currencies: Vec<String>,

    /// Target frequency (daily, business, weekly, monthly, quarterly, semiannual, annual, twice-monthly)
    #[arg(short, long, value_parser = parse_frequency)]
    frequency: Option<Frequency>,

    /// Output directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<Format>,
}

impl JobArgs {
    /// Overrides `settings` with every parameter given on the command line.
    pub(crate) fn apply(self, settings: &mut Settings) {
        if let Some(start) = self.start {
            settings.start = Some(start);
        }
        if let Some(end) = self.end {
            settings.end = Some(end);
        }
        if !self.currencies.is_empty() {
            settings.currencies = self.currencies;
        }
        if let Some(frequency) = self.frequency {
            settings.frequency = frequency;
        }
        if let Some(out) = self.out {
            settings.out_folder = Some(out);
        }
        if let Some(format) = self.format {
            settings.out_format = format.into();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let store = cli
        .settings
        .map_or_else(SettingsStore::with_default_path, SettingsStore::new);

    match command {
        Commands::Fetch {
            job,
            base_url,
            timeout,
            delay,
            yes,
            save_settings,
        } => {
            let options = commands::fetch::FetchOptions {
                base_url,
                timeout,
                delay,
                yes,
                save_settings,
                quiet: cli.quiet,
            };
            commands::fetch::fetch(&store, job, options).await
        }
        Commands::List { search } => commands::list::list_currencies(search.as_deref()),
        Commands::Url { date } => {
            commands::url::print_url(date);
            Ok(())
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&store),
            SettingsAction::Path => {
                commands::settings::print_path(&store);
                Ok(())
            }
            SettingsAction::Save { job } => commands::settings::save(&store, job),
        },
    }
}

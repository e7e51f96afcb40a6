//! Settings command implementation.
//!
//! This module handles inspecting and updating the saved job settings.

use crate::JobArgs;
use anyhow::{Context, Result};
use kurflow_lib::prelude::*;

/// Print the saved settings as JSON, followed by the file they came from.
pub(crate) fn show(store: &SettingsStore) -> Result<()> {
    let settings = store
        .load()
        .with_context(|| format!("Failed to load settings from {}", store.path().display()))?;

    println!("{}", settings.to_json()?);
    println!("\n# {}", store.path().display());
    Ok(())
}

/// Print the settings file path.
pub(crate) fn print_path(store: &SettingsStore) {
    println!("{}", store.path().display());
}

/// Merge the given parameters into the saved settings and write them back.
pub(crate) fn save(store: &SettingsStore, args: JobArgs) -> Result<()> {
    let mut settings = store.load_or_default();
    args.apply(&mut settings);
    settings.currencies = CurrencyRegistry::global().normalize(&settings.currencies);

    store
        .save(&settings)
        .with_context(|| format!("Failed to save settings to {}", store.path().display()))?;

    println!("Settings saved to {}", store.path().display());
    Ok(())
}

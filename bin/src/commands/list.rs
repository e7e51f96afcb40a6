//! List command implementation.
//!
//! This module handles listing selectable currencies with optional filtering.

use anyhow::Result;
use kurflow_lib::prelude::*;

/// List selectable currencies, optionally filtered by a search pattern.
pub(crate) fn list_currencies(search: Option<&str>) -> Result<()> {
    let registry = CurrencyRegistry::global();

    let currencies: Vec<_> = match search {
        Some(pattern) => registry.search(pattern),
        None => registry.all().collect(),
    };

    if currencies.is_empty() {
        println!("No currencies found.");
        return Ok(());
    }

    println!("{:<6} {:<28} {:<28}", "CODE", "NAME", "TURKISH NAME");
    println!("{}", "-".repeat(62));

    for currency in &currencies {
        println!(
            "{:<6} {:<28} {:<28}",
            currency.code(),
            currency.name(),
            currency.local_name()
        );
    }

    println!("\nTotal: {} currencies", currencies.len());
    Ok(())
}

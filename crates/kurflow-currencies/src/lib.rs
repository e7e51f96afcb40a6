//! Currency registry for the kurflow exchange-rate fetcher.
//!
//! This crate provides the list of currencies offered for selection, in the
//! order they are presented to users, with their English and Turkish names.
//!
//! # Example
//!
//! ```
//! use kurflow_currencies::CurrencyRegistry;
//!
//! let registry = CurrencyRegistry::global();
//!
//! // Lookup by code
//! if let Some(currency) = registry.get("usd") {
//!     println!("{}: {}", currency.code(), currency.local_name());
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/kurflow/kurflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::sync::OnceLock;

use kurflow_types::Currency;

/// The currency metadata JSON embedded at compile time.
const CURRENCIES_JSON: &str = include_str!("../data/currencies.json");

/// Global currency registry instance.
static REGISTRY: OnceLock<CurrencyRegistry> = OnceLock::new();

/// Registry of the currencies offered for selection.
#[derive(Debug)]
pub struct CurrencyRegistry {
    /// Currencies in presentation order.
    currencies: Vec<Currency>,
    /// Code to position in `currencies`.
    index: HashMap<String, usize>,
}

impl CurrencyRegistry {
    /// Returns the global currency registry.
    ///
    /// The registry is initialized lazily on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(Self::load)
    }

    /// Loads currencies from the embedded JSON data.
    fn load() -> Self {
        let currencies: Vec<Currency> =
            serde_json::from_str(CURRENCIES_JSON).expect("Invalid currencies.json");
        Self::from_currencies(currencies)
    }

    /// Builds a registry from an explicit list, keeping its order.
    #[must_use]
    pub fn from_currencies(currencies: Vec<Currency>) -> Self {
        let index = currencies
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.code().to_string(), idx))
            .collect();
        Self { currencies, index }
    }

    /// Looks up a currency by code (case-insensitive).
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Currency> {
        self.index
            .get(&code.trim().to_uppercase())
            .map(|idx| &self.currencies[*idx])
    }

    /// Returns true if the code is known.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Returns all currencies in presentation order.
    pub fn all(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.iter()
    }

    /// Returns the total number of currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// Searches currencies by code or name pattern (case-insensitive).
    pub fn search(&self, pattern: &str) -> Vec<&Currency> {
        let pattern = pattern.to_lowercase();
        self.currencies
            .iter()
            .filter(|c| {
                c.code().to_lowercase().contains(&pattern)
                    || c.name().to_lowercase().contains(&pattern)
                    || c.local_name().to_lowercase().contains(&pattern)
            })
            .collect()
    }

    /// Returns all currency codes in presentation order.
    pub fn codes(&self) -> Vec<&str> {
        self.currencies.iter().map(Currency::code).collect()
    }

    /// Normalizes user-supplied codes: trims, upper-cases, drops blanks and
    /// duplicates while keeping first-seen order.
    ///
    /// Codes missing from the registry are kept, since the feed publishes
    /// more currencies than are offered for selection, but are logged.
    pub fn normalize<S: AsRef<str>>(&self, codes: &[S]) -> Vec<String> {
        let mut normalized: Vec<String> = Vec::with_capacity(codes.len());
        for code in codes {
            let code = code.as_ref().trim().to_uppercase();
            if code.is_empty() || normalized.contains(&code) {
                continue;
            }
            if !self.contains(&code) {
                tracing::warn!(%code, "currency code is not in the selection list");
            }
            normalized.push(code);
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads() {
        let registry = CurrencyRegistry::global();
        assert_eq!(registry.len(), 21);
        assert_eq!(registry.codes()[0], "USD");
        assert_eq!(registry.codes()[20], "QAR");
    }

    #[test]
    fn test_get_case_insensitive() {
        let registry = CurrencyRegistry::global();
        assert!(registry.get("EUR").is_some());
        assert!(registry.get("eur").is_some());
        assert!(registry.get(" Eur ").is_some());
        assert!(registry.get("XYZ").is_none());
    }

    #[test]
    fn test_search() {
        let registry = CurrencyRegistry::global();
        let results = registry.search("dollar");
        let codes: Vec<_> = results.iter().map(|c| c.code()).collect();
        assert_eq!(codes, vec!["USD", "CAD", "AUD"]);

        assert_eq!(registry.search("sterlin").len(), 1);
    }

    #[test]
    fn test_normalize() {
        let registry = CurrencyRegistry::global();
        let codes = registry.normalize(&["usd", " EUR", "", "USD", "xdr"]);
        assert_eq!(codes, vec!["USD", "EUR", "XDR"]);
    }
}

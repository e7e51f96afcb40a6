//! Exchange-rate quote representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One of the four values published per currency.
///
/// Variants are declared in the alphabetical order of their feed element
/// names, which is also the column order within a currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuoteField {
    /// Banknote (cash) buying rate.
    BanknoteBuying,
    /// Banknote (cash) selling rate.
    BanknoteSelling,
    /// Forex buying rate.
    ForexBuying,
    /// Forex selling rate.
    ForexSelling,
}

impl QuoteField {
    /// Returns all fields in column order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::BanknoteBuying,
            Self::BanknoteSelling,
            Self::ForexBuying,
            Self::ForexSelling,
        ]
    }

    /// Returns the element name used in the feed document.
    #[must_use]
    pub const fn element_name(&self) -> &'static str {
        match self {
            Self::BanknoteBuying => "BanknoteBuying",
            Self::BanknoteSelling => "BanknoteSelling",
            Self::ForexBuying => "ForexBuying",
            Self::ForexSelling => "ForexSelling",
        }
    }

    /// Returns the localized column label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::BanknoteBuying => "Efektif Alış",
            Self::BanknoteSelling => "Efektif Satış",
            Self::ForexBuying => "Döviz Alış",
            Self::ForexSelling => "Döviz Satış",
        }
    }

    /// Looks up a field by its feed element name.
    #[must_use]
    pub fn from_element_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.element_name() == name)
    }

    /// Looks up a field by its localized column label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.label() == label)
    }
}

impl std::fmt::Display for QuoteField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element_name())
    }
}

/// The four quote values of one currency on one day.
///
/// Each value is optional: the feed leaves some fields empty (for example
/// currencies without a banknote market), and unparseable text is treated
/// the same way.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quote {
    /// Forex buying rate.
    pub forex_buying: Option<f64>,
    /// Forex selling rate.
    pub forex_selling: Option<f64>,
    /// Banknote buying rate.
    pub banknote_buying: Option<f64>,
    /// Banknote selling rate.
    pub banknote_selling: Option<f64>,
}

impl Quote {
    /// Creates a new quote.
    #[must_use]
    pub const fn new(
        forex_buying: Option<f64>,
        forex_selling: Option<f64>,
        banknote_buying: Option<f64>,
        banknote_selling: Option<f64>,
    ) -> Self {
        Self {
            forex_buying,
            forex_selling,
            banknote_buying,
            banknote_selling,
        }
    }

    /// Returns the value of the given field.
    #[must_use]
    pub const fn get(&self, field: QuoteField) -> Option<f64> {
        match field {
            QuoteField::ForexBuying => self.forex_buying,
            QuoteField::ForexSelling => self.forex_selling,
            QuoteField::BanknoteBuying => self.banknote_buying,
            QuoteField::BanknoteSelling => self.banknote_selling,
        }
    }

    /// Sets the value of the given field.
    pub const fn set(&mut self, field: QuoteField, value: Option<f64>) {
        match field {
            QuoteField::ForexBuying => self.forex_buying = value,
            QuoteField::ForexSelling => self.forex_selling = value,
            QuoteField::BanknoteBuying => self.banknote_buying = value,
            QuoteField::BanknoteSelling => self.banknote_selling = value,
        }
    }

    /// Returns true if no field carries a value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        QuoteField::all().iter().all(|f| self.get(*f).is_none())
    }
}

/// A quote for one currency on one date, as extracted from a feed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Publication date of the feed document.
    pub date: NaiveDate,
    /// Upper-case currency code (e.g. "USD").
    pub currency: String,
    /// The quote values.
    pub quote: Quote,
}

impl DailyRecord {
    /// Creates a new daily record.
    #[must_use]
    pub fn new(date: NaiveDate, currency: impl Into<String>, quote: Quote) -> Self {
        Self {
            date,
            currency: currency.into(),
            quote,
        }
    }
}

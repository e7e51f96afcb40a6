//! Resampling frequency definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Target frequency of the resampled rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One row per published day (no reduction).
    #[default]
    #[serde(alias = "Günlük")]
    Daily,
    /// Last row of each business day, weekends folded into Friday.
    #[serde(rename = "business", alias = "İşgünü")]
    BusinessDay,
    /// Last row of each week ending on Friday.
    #[serde(alias = "Haftalık")]
    Weekly,
    /// Last row of each calendar month.
    #[serde(alias = "Aylık")]
    Monthly,
    /// Last row of each calendar quarter.
    #[serde(alias = "3 Aylık")]
    Quarterly,
    /// Last row of each calendar half-year.
    #[serde(alias = "6 Aylık")]
    SemiAnnual,
    /// Last row of each calendar year.
    #[serde(alias = "Yıllık")]
    Annual,
    /// Rows nearest to the 1st and 15th of every month.
    #[serde(rename = "twice-monthly", alias = "Ayda 2 Kez")]
    TwiceMonthly,
}

impl Frequency {
    /// Returns the frequency as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::BusinessDay => "business",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::SemiAnnual => "semiannual",
            Self::Annual => "annual",
            Self::TwiceMonthly => "twice-monthly",
        }
    }

    /// Returns the localized label shown to users and used in file names.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Günlük",
            Self::BusinessDay => "İşgünü",
            Self::Weekly => "Haftalık",
            Self::Monthly => "Aylık",
            Self::Quarterly => "3 Aylık",
            Self::SemiAnnual => "6 Aylık",
            Self::Annual => "Yıllık",
            Self::TwiceMonthly => "Ayda 2 Kez",
        }
    }

    /// Returns true if rows are reduced to calendar period buckets.
    #[must_use]
    pub const fn is_periodic(&self) -> bool {
        !matches!(self, Self::Daily | Self::TwiceMonthly)
    }

    /// Returns all available frequencies.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Daily,
            Self::BusinessDay,
            Self::Weekly,
            Self::Monthly,
            Self::Quarterly,
            Self::SemiAnnual,
            Self::Annual,
            Self::TwiceMonthly,
        ]
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = FrequencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(freq) = Self::all().iter().find(|f| f.label() == trimmed) {
            return Ok(*freq);
        }

        match trimmed.to_lowercase().as_str() {
            "daily" | "d" | "day" => Ok(Self::Daily),
            "business" | "b" | "businessday" | "business-day" => Ok(Self::BusinessDay),
            "weekly" | "w" | "week" => Ok(Self::Weekly),
            "monthly" | "m" | "month" => Ok(Self::Monthly),
            "quarterly" | "q" | "quarter" => Ok(Self::Quarterly),
            "semiannual" | "semi-annual" | "half-yearly" | "2q" => Ok(Self::SemiAnnual),
            "annual" | "a" | "y" | "yearly" => Ok(Self::Annual),
            "twice-monthly" | "twicemonthly" | "semimonthly" | "sm" => Ok(Self::TwiceMonthly),
            _ => Err(FrequencyParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid frequency string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyParseError(String);

impl std::fmt::Display for FrequencyParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid frequency '{}', expected one of: daily, business, weekly, monthly, quarterly, semiannual, annual, twice-monthly",
            self.0
        )
    }
}

impl std::error::Error for FrequencyParseError {}

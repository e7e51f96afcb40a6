//! TCMB archive URL construction.

use chrono::{Datelike, NaiveDate};

/// Base URL of the TCMB daily exchange-rate archive.
pub const BASE_URL: &str = "https://www.tcmb.gov.tr/kurlar";

/// File extension of the daily feed documents.
pub const FEED_EXTENSION: &str = "xml";

/// Builds the URL of the feed document published for `date`.
///
/// URL format: `{BASE_URL}/{YYYY}{MM}/{DD}{MM}{YYYY}.xml`
///
/// # Example
///
/// ```
/// use kurflow_fetch::url::feed_url;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let url = feed_url(date);
/// assert_eq!(url, "https://www.tcmb.gov.tr/kurlar/202401/05012024.xml");
/// ```
#[must_use]
pub fn feed_url(date: NaiveDate) -> String {
    feed_url_with_base(BASE_URL, date)
}

/// Builds the feed URL for `date` under a custom base URL.
///
/// A trailing slash on `base` is ignored.
#[must_use]
pub fn feed_url_with_base(base: &str, date: NaiveDate) -> String {
    format!(
        "{}/{:04}{:02}/{:02}{:02}{:04}.{}",
        base.trim_end_matches('/'),
        date.year(),
        date.month(),
        date.day(),
        date.month(),
        date.year(),
        FEED_EXTENSION
    )
}

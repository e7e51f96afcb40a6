//! Period anchors for bucketed frequencies.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use kurflow_types::Frequency;

/// Returns the anchor date of the period `date` falls into.
///
/// - [`Frequency::Daily`]: the date itself
/// - [`Frequency::BusinessDay`]: the date on weekdays, the preceding Friday
///   on weekends
/// - [`Frequency::Weekly`]: the Friday on or after the date
/// - [`Frequency::Monthly`]: last day of the month
/// - [`Frequency::Quarterly`]: last day of March, June, September or December
/// - [`Frequency::SemiAnnual`]: June 30 or December 31
/// - [`Frequency::Annual`]: December 31
///
/// Returns `None` for [`Frequency::TwiceMonthly`], which has no fixed
/// periods, and for dates at the edge of the representable range.
#[must_use]
pub fn period_anchor(date: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    match frequency {
        Frequency::Daily => Some(date),
        Frequency::BusinessDay => match date.weekday() {
            Weekday::Sat => date.checked_sub_signed(TimeDelta::days(1)),
            Weekday::Sun => date.checked_sub_signed(TimeDelta::days(2)),
            _ => Some(date),
        },
        Frequency::Weekly => {
            let today = i64::from(date.weekday().num_days_from_monday());
            let friday = i64::from(Weekday::Fri.num_days_from_monday());
            date.checked_add_signed(TimeDelta::days((friday - today).rem_euclid(7)))
        }
        Frequency::Monthly => last_day_of_month(date.year(), date.month()),
        Frequency::Quarterly => last_day_of_month(date.year(), date.month().div_ceil(3) * 3),
        Frequency::SemiAnnual => {
            if date.month() <= 6 {
                NaiveDate::from_ymd_opt(date.year(), 6, 30)
            } else {
                NaiveDate::from_ymd_opt(date.year(), 12, 31)
            }
        }
        Frequency::Annual => NaiveDate::from_ymd_opt(date.year(), 12, 31),
        Frequency::TwiceMonthly => None,
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

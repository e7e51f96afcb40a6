//! Table resampling.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use kurflow_types::{Frequency, RateRow, RateTable};
use tracing::debug;

use crate::{forward_fill, period_anchor};

/// Days of the month a twice-monthly table is anchored on.
const TWICE_MONTHLY_DAYS: [u32; 2] = [1, 15];

/// Streaming period reducer.
///
/// Collapses date-ordered rows into one row per period, keeping the last
/// value seen in each column, and labels the result with the period anchor
/// (see [`period_anchor`]). Only periods that received at least one row are
/// emitted. Frequencies without fixed periods keep every row in a period of
/// its own.
#[derive(Debug)]
pub struct PeriodReducer {
    frequency: Frequency,
    current: Option<RateRow>,
}

impl PeriodReducer {
    /// Creates a new reducer for the given frequency.
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            current: None,
        }
    }

    /// Returns the frequency being reduced to.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Processes a row, potentially emitting a completed period.
    ///
    /// Rows must arrive in ascending date order. Returns `Some(row)` when
    /// `row` opens a new period and the previous one is complete.
    pub fn process(&mut self, row: &RateRow) -> Option<RateRow> {
        let anchor = self.anchor_for(row.date);

        match self.current.take() {
            Some(mut period) if period.date == anchor => {
                merge_latest(&mut period.values, &row.values);
                self.current = Some(period);
                None
            }
            Some(period) => {
                self.current = Some(row.relabeled(anchor));
                Some(period)
            }
            None => {
                self.current = Some(row.relabeled(anchor));
                None
            }
        }
    }

    /// Finishes reduction, returning the last partial period.
    #[must_use]
    pub fn finish(self) -> Option<RateRow> {
        self.current
    }

    fn anchor_for(&self, date: NaiveDate) -> NaiveDate {
        period_anchor(date, self.frequency).unwrap_or(date)
    }
}

/// Overwrites `period` with every non-empty value of `row`.
fn merge_latest(period: &mut [Option<f64>], row: &[Option<f64>]) {
    for (slot, value) in period.iter_mut().zip(row) {
        if value.is_some() {
            *slot = *value;
        }
    }
}

/// Resamples a daily table to `frequency`.
///
/// The table is forward filled first. [`Frequency::Daily`] returns the
/// filled table, [`Frequency::TwiceMonthly`] selects rows with
/// [`twice_monthly`] and every other frequency is reduced to the last value
/// per period. An empty table stays empty.
#[must_use]
pub fn resample(mut table: RateTable, frequency: Frequency) -> RateTable {
    if table.is_empty() {
        return RateTable::empty();
    }

    forward_fill(&mut table);
    let input_rows = table.len();

    let resampled = match frequency {
        Frequency::Daily => table,
        Frequency::TwiceMonthly => twice_monthly(&table),
        other => reduce_periods(table, other),
    };

    debug!(
        frequency = frequency.as_str(),
        input_rows,
        output_rows = resampled.len(),
        "table resampled"
    );
    resampled
}

fn reduce_periods(table: RateTable, frequency: Frequency) -> RateTable {
    let (columns, rows) = table.into_parts();
    let mut reducer = PeriodReducer::new(frequency);
    let mut reduced = Vec::new();

    for row in &rows {
        if let Some(period) = reducer.process(row) {
            reduced.push(period);
        }
    }
    reduced.extend(reducer.finish());

    RateTable::from_rows(columns, reduced)
}

/// Selects one row for the 1st and one for the 15th of every month that
/// has data.
///
/// For each anchor the row dated on it is used when present; otherwise the
/// earliest row after it, and failing that the latest row before it. The
/// chosen rows are relabeled with their anchor dates, so one source row may
/// appear under two anchors.
#[must_use]
pub fn twice_monthly(table: &RateTable) -> RateTable {
    let months: BTreeSet<(i32, u32)> = table.dates().map(|d| (d.year(), d.month())).collect();
    let rows = table.rows();

    let mut selected = Vec::with_capacity(months.len() * TWICE_MONTHLY_DAYS.len());
    for (year, month) in months {
        for day in TWICE_MONTHLY_DAYS {
            let Some(anchor) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            if let Some(row) = nearest_row(rows, anchor) {
                selected.push(row.relabeled(anchor));
            }
        }
    }

    RateTable::from_rows(table.columns().to_vec(), selected)
}

/// Finds the row on or after `anchor`, falling back to the last row before.
fn nearest_row(rows: &[RateRow], anchor: NaiveDate) -> Option<&RateRow> {
    let at_or_after = rows.partition_point(|row| row.date < anchor);
    rows.get(at_or_after).or_else(|| rows.last())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use kurflow_types::{ColumnKey, QuoteField};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usd() -> Vec<ColumnKey> {
        vec![ColumnKey::new("USD", QuoteField::ForexBuying)]
    }

    fn table(rows: &[(NaiveDate, Option<f64>)]) -> RateTable {
        RateTable::from_rows(
            usd(),
            rows.iter().map(|(d, v)| RateRow::new(*d, vec![*v])).collect(),
        )
    }

    fn dated_values(table: &RateTable) -> Vec<(NaiveDate, Option<f64>)> {
        table.rows().iter().map(|r| (r.date, r.values[0])).collect()
    }

    /// One row per day from `start` for `days` days, valued by day offset.
    fn daily(start: NaiveDate, days: i64) -> RateTable {
        let rows: Vec<_> = (0..days)
            .map(|i| (start + TimeDelta::days(i), Some(i as f64)))
            .collect();
        table(&rows)
    }

    #[test]
    fn test_reducer_emits_on_period_change() {
        let mut reducer = PeriodReducer::new(Frequency::Monthly);

        assert!(reducer.process(&RateRow::new(date(2024, 1, 30), vec![Some(1.0)])).is_none());
        assert!(reducer.process(&RateRow::new(date(2024, 1, 31), vec![Some(2.0)])).is_none());

        let january = reducer
            .process(&RateRow::new(date(2024, 2, 1), vec![Some(3.0)]))
            .unwrap();
        assert_eq!(january, RateRow::new(date(2024, 1, 31), vec![Some(2.0)]));

        let february = reducer.finish().unwrap();
        assert_eq!(february, RateRow::new(date(2024, 2, 29), vec![Some(3.0)]));
    }

    #[test]
    fn test_reducer_keeps_last_value_per_column() {
        let mut reducer = PeriodReducer::new(Frequency::Annual);
        reducer.process(&RateRow::new(date(2024, 3, 1), vec![Some(1.0), Some(5.0)]));
        reducer.process(&RateRow::new(date(2024, 4, 1), vec![Some(2.0), None]));

        let year = reducer.finish().unwrap();
        assert_eq!(year.date, date(2024, 12, 31));
        assert_eq!(year.values, vec![Some(2.0), Some(5.0)]);
    }

    #[test]
    fn test_reducer_finish_without_rows() {
        assert!(PeriodReducer::new(Frequency::Weekly).finish().is_none());
    }

    #[test]
    fn test_resample_empty_is_empty() {
        for frequency in Frequency::all() {
            assert!(resample(RateTable::empty(), *frequency).is_empty());
        }
    }

    #[test]
    fn test_resample_daily_is_identity_without_gaps() {
        let input = daily(date(2024, 1, 1), 10);
        assert_eq!(resample(input.clone(), Frequency::Daily), input);
    }

    #[test]
    fn test_resample_daily_fills_gaps() {
        let input = table(&[(date(2024, 1, 2), Some(1.0)), (date(2024, 1, 3), None)]);
        let output = resample(input, Frequency::Daily);
        assert_eq!(output.value(date(2024, 1, 3), &usd()[0]), Some(1.0));
    }

    #[test]
    fn test_resample_monthly_takes_month_end_rows() {
        // January and February 2024: 31 + 29 days
        let input = daily(date(2024, 1, 1), 60);
        let output = resample(input.clone(), Frequency::Monthly);

        assert_eq!(output.len(), 2);
        assert_eq!(
            dated_values(&output),
            vec![
                (date(2024, 1, 31), input.row(date(2024, 1, 31)).unwrap().values[0]),
                (date(2024, 2, 29), input.row(date(2024, 2, 29)).unwrap().values[0]),
            ]
        );
    }

    #[test]
    fn test_resample_weekly_skips_empty_weeks() {
        let input = table(&[
            (date(2024, 1, 1), Some(1.0)),
            (date(2024, 1, 3), Some(2.0)),
            (date(2024, 1, 22), Some(3.0)),
        ]);
        let output = resample(input, Frequency::Weekly);

        assert_eq!(
            dated_values(&output),
            vec![(date(2024, 1, 5), Some(2.0)), (date(2024, 1, 26), Some(3.0))]
        );
    }

    #[test]
    fn test_resample_business_day_merges_weekend() {
        let input = table(&[
            (date(2024, 1, 5), Some(1.0)),
            (date(2024, 1, 6), Some(2.0)),
            (date(2024, 1, 8), Some(3.0)),
        ]);
        let output = resample(input, Frequency::BusinessDay);

        assert_eq!(
            dated_values(&output),
            vec![(date(2024, 1, 5), Some(2.0)), (date(2024, 1, 8), Some(3.0))]
        );
    }

    #[test]
    fn test_resample_never_adds_rows_for_periods() {
        let input = daily(date(2023, 11, 1), 120);
        for frequency in Frequency::all().iter().filter(|f| f.is_periodic()) {
            assert!(resample(input.clone(), *frequency).len() <= input.len());
        }
    }

    #[test]
    fn test_twice_monthly_scenario() {
        let input = table(&[
            (date(2024, 1, 3), Some(3.0)),
            (date(2024, 1, 10), Some(10.0)),
            (date(2024, 1, 20), Some(20.0)),
            (date(2024, 2, 5), Some(35.0)),
        ]);
        let output = resample(input, Frequency::TwiceMonthly);

        assert_eq!(
            dated_values(&output),
            vec![
                (date(2024, 1, 1), Some(3.0)),
                (date(2024, 1, 15), Some(20.0)),
                (date(2024, 2, 1), Some(35.0)),
                (date(2024, 2, 15), Some(35.0)),
            ]
        );
    }

    #[test]
    fn test_twice_monthly_prefers_exact_row() {
        let input = table(&[
            (date(2024, 3, 1), Some(1.0)),
            (date(2024, 3, 15), Some(15.0)),
            (date(2024, 3, 16), Some(16.0)),
        ]);
        let output = twice_monthly(&input);

        assert_eq!(
            dated_values(&output),
            vec![(date(2024, 3, 1), Some(1.0)), (date(2024, 3, 15), Some(15.0))]
        );
    }

    #[test]
    fn test_twice_monthly_forward_fallback_crosses_months() {
        let input = table(&[(date(2024, 1, 10), Some(10.0)), (date(2024, 3, 20), Some(80.0))]);
        let output = resample(input, Frequency::TwiceMonthly);

        // February has no rows, so it gets no anchors.
        assert_eq!(
            dated_values(&output),
            vec![
                (date(2024, 1, 1), Some(10.0)),
                (date(2024, 1, 15), Some(80.0)),
                (date(2024, 3, 1), Some(80.0)),
                (date(2024, 3, 15), Some(80.0)),
            ]
        );
    }

    #[test]
    fn test_nearest_row_falls_back_backwards() {
        let input = table(&[(date(2024, 1, 2), Some(1.0)), (date(2024, 1, 9), Some(2.0))]);
        let rows = input.rows();

        assert_eq!(nearest_row(rows, date(2024, 1, 1)).unwrap().date, date(2024, 1, 2));
        assert_eq!(nearest_row(rows, date(2024, 1, 5)).unwrap().date, date(2024, 1, 9));
        assert_eq!(nearest_row(rows, date(2024, 1, 15)).unwrap().date, date(2024, 1, 9));
        assert!(nearest_row(&[], date(2024, 1, 15)).is_none());
    }
}

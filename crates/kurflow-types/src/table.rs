//! Date-indexed exchange-rate table.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DailyRecord, QuoteField};

/// Column key of a [`RateTable`]: one quote field of one currency.
///
/// Keys order by currency code first, then by field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    /// Upper-case currency code.
    pub currency: String,
    /// Quote field.
    pub field: QuoteField,
}

impl ColumnKey {
    /// Creates a new column key.
    #[must_use]
    pub fn new(currency: impl Into<String>, field: QuoteField) -> Self {
        Self {
            currency: currency.into(),
            field,
        }
    }
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.currency, self.field)
    }
}

/// One dated row of a [`RateTable`], holding one value slot per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    /// Row date.
    pub date: NaiveDate,
    /// Values, positionally aligned with the table's columns.
    pub values: Vec<Option<f64>>,
}

impl RateRow {
    /// Creates a new row.
    #[must_use]
    pub const fn new(date: NaiveDate, values: Vec<Option<f64>>) -> Self {
        Self { date, values }
    }

    /// Returns a copy of this row under a different date.
    #[must_use]
    pub fn relabeled(&self, date: NaiveDate) -> Self {
        Self {
            date,
            values: self.values.clone(),
        }
    }

    /// Returns true if every value slot is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// Exchange rates indexed by date (rows) and by (currency, field) (columns).
///
/// Invariants:
/// - row dates are strictly ascending, hence unique;
/// - every row has exactly one value slot per column.
///
/// A table without rows is *empty*, which callers treat as "no data for the
/// whole range". That is distinct from a table whose rows hold only nulls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RateTable {
    columns: Vec<ColumnKey>,
    rows: Vec<RateRow>,
}

impl RateTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Pivots daily records into a table.
    ///
    /// Records are grouped by date and spread into one column per observed
    /// (currency, field) pair, sorted by currency then field. Columns that
    /// never carry a value and rows whose values are all missing are dropped.
    /// No records yield an empty table.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = DailyRecord>,
    {
        let mut cells: BTreeMap<NaiveDate, BTreeMap<ColumnKey, f64>> = BTreeMap::new();
        let mut columns: BTreeSet<ColumnKey> = BTreeSet::new();

        for record in records {
            let day = cells.entry(record.date).or_default();
            for field in QuoteField::all() {
                let key = ColumnKey::new(record.currency.as_str(), *field);
                match record.quote.get(*field) {
                    Some(value) => {
                        columns.insert(key.clone());
                        day.insert(key, value);
                    }
                    None => {
                        day.remove(&key);
                    }
                }
            }
        }

        let columns: Vec<ColumnKey> = columns.into_iter().collect();
        let rows = cells
            .into_iter()
            .filter(|(_, day)| !day.is_empty())
            .map(|(date, day)| {
                let values = columns.iter().map(|key| day.get(key).copied()).collect();
                RateRow::new(date, values)
            })
            .collect();

        Self { columns, rows }
    }

    /// Builds a table from explicit columns and rows.
    ///
    /// Rows are sorted by date; when several rows share a date the last one
    /// wins. Rows shorter than the column list are padded with nulls and
    /// longer rows are truncated. Column keys must be unique.
    #[must_use]
    pub fn from_rows(columns: Vec<ColumnKey>, mut rows: Vec<RateRow>) -> Self {
        debug_assert!(
            columns.iter().collect::<BTreeSet<_>>().len() == columns.len(),
            "column keys must be unique"
        );

        let width = columns.len();
        rows.sort_by_key(|row| row.date);

        let mut normalized: Vec<RateRow> = Vec::with_capacity(rows.len());
        for mut row in rows {
            row.values.resize(width, None);
            match normalized.last_mut() {
                Some(last) if last.date == row.date => *last = row,
                _ => normalized.push(row),
            }
        }

        Self {
            columns,
            rows: normalized,
        }
    }

    /// Returns the column keys in order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    /// Returns the rows in ascending date order.
    #[must_use]
    pub fn rows(&self) -> &[RateRow] {
        &self.rows
    }

    /// Returns mutable access to each row's value slots, in date order.
    ///
    /// Dates and row widths cannot be changed through this iterator.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut [Option<f64>]> {
        self.rows.iter_mut().map(|row| row.values.as_mut_slice())
    }

    /// Consumes the table, returning its columns and rows.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ColumnKey>, Vec<RateRow>) {
        (self.columns, self.rows)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns the row dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|row| row.date)
    }

    /// Returns the first row date.
    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|row| row.date)
    }

    /// Returns the last row date.
    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|row| row.date)
    }

    /// Returns the position of a column.
    #[must_use]
    pub fn column_index(&self, key: &ColumnKey) -> Option<usize> {
        self.columns.iter().position(|k| k == key)
    }

    /// Returns the row for an exact date.
    #[must_use]
    pub fn row(&self, date: NaiveDate) -> Option<&RateRow> {
        self.rows
            .binary_search_by_key(&date, |row| row.date)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Returns the value at (date, column), if present.
    #[must_use]
    pub fn value(&self, date: NaiveDate, key: &ColumnKey) -> Option<f64> {
        let idx = self.column_index(key)?;
        self.row(date)?.values.get(idx).copied().flatten()
    }

    /// Returns the distinct currency codes, in column order.
    #[must_use]
    pub fn currencies(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = Vec::new();
        for key in &self.columns {
            if codes.last() != Some(&key.currency.as_str()) {
                codes.push(key.currency.as_str());
            }
        }
        codes
    }
}

//! Column header labels.

use kurflow_types::{ColumnKey, QuoteField};

/// Header of the date column.
pub const INDEX_LABEL: &str = "Date";

const SEPARATOR: char = '-';

/// Returns the header of a value column, e.g. `USD-Döviz Alış`.
#[must_use]
pub fn column_label(key: &ColumnKey) -> String {
    format!("{}{SEPARATOR}{}", key.currency, key.field.label())
}

/// Parses a header produced by [`column_label`].
///
/// Returns `None` if the label has no separator, an empty code or an
/// unknown field label.
#[must_use]
pub fn parse_column_label(label: &str) -> Option<ColumnKey> {
    let (code, field) = label.trim().split_once(SEPARATOR)?;
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    let field = QuoteField::from_label(field.trim())?;
    Some(ColumnKey::new(code.to_uppercase(), field))
}

//! Forward gap filling.

use kurflow_types::RateTable;

/// Fills missing cells with the most recent value above them in the same
/// column.
///
/// Leading gaps stay empty. Applying the fill twice gives the same table as
/// applying it once.
pub fn forward_fill(table: &mut RateTable) {
    let mut carried: Vec<Option<f64>> = vec![None; table.width()];

    for values in table.values_mut() {
        for (slot, last) in values.iter_mut().zip(carried.iter_mut()) {
            match slot {
                Some(value) => *last = Some(*value),
                None => *slot = *last,
            }
        }
    }
}

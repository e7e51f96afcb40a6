//! URL command implementation.

use chrono::NaiveDate;
use kurflow_lib::url::feed_url;

/// Print the archive URL of the document published for `date`.
pub(crate) fn print_url(date: NaiveDate) {
    println!("{}", feed_url(date));
}

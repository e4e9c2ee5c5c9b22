//! Free-text filter over the symbol and name fields.

use crate::domain::row::Row;

/// Keeps rows whose symbol or name contains `query`, case-insensitively.
///
/// A blank query is the identity: every row, in input order.
pub fn filter_rows<'a, R: Row>(rows: &'a [R], query: &str) -> Vec<&'a R> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }
    rows.iter().filter(|row| matches_query(*row, &needle)).collect()
}

/// `needle` must already be trimmed and lowercased.
pub fn matches_query<R: Row>(row: &R, needle: &str) -> bool {
    row.symbol().to_lowercase().contains(needle)
        || row
            .name()
            .is_some_and(|name| name.to_lowercase().contains(needle))
}

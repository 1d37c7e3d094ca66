//! Field projection.
//!
//! Configuration lists the fields it wants optimistically; a field the
//! source file does not carry is dropped without error.

use tracing::debug;

use oncograph_common::Table;

/// Keep the requested columns that exist in `table`, in requested order.
/// Repeated names are kept once.
pub fn project<S: AsRef<str>>(table: &Table, fields: &[S]) -> Table {
    let mut keep: Vec<&str> = Vec::with_capacity(fields.len());
    let mut absent: Vec<&str> = Vec::new();

    for field in fields.iter().map(AsRef::as_ref) {
        if keep.contains(&field) {
            continue;
        }
        if table.has_column(field) {
            keep.push(field);
        } else {
            absent.push(field);
        }
    }

    if !absent.is_empty() {
        debug!("Fields not in source, projected out: {:?}", absent);
    }

    // Every kept name was checked against the header above.
    table.select(&keep).unwrap_or_default()
}

//! Order-preserving deduplication.
//!
//! The first occurrence of a row wins and keeps its position, so output
//! order stays a function of source order. Deduplication is idempotent.

use std::hash::Hash;

use ahash::AHashSet;

use oncograph_common::{Result, Table};

/// New table without exact-duplicate rows.
pub fn drop_duplicates(table: &Table) -> Table {
    let rows = unique_by(table.raw_rows().iter(), |row| *row).cloned().collect();
    // Same header, rows taken from the table itself.
    table.with_rows(rows).unwrap_or_default()
}

/// New table with only `columns`, deduplicated on exactly those columns.
pub fn distinct<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Table> {
    Ok(drop_duplicates(&table.select(columns)?))
}

/// Lazily drop items whose key was already seen.
pub fn unique_by<I, K, F>(iter: I, mut key: F) -> impl Iterator<Item = I::Item>
where
    I: Iterator,
    K: Eq + Hash,
    F: FnMut(&I::Item) -> K,
{
    let mut seen: AHashSet<K> = AHashSet::new();
    iter.filter(move |item| seen.insert(key(item)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncograph_common::Value;
    use pretty_assertions::assert_eq;

    fn table() -> Table {
        Table::from_rows(
            ["patient", "sample"],
            vec![
                vec![Value::from("P1"), Value::from("S1")],
                vec![Value::from("P1"), Value::from("S2")],
                vec![Value::from("P1"), Value::from("S1")],
                vec![Value::from("P2"), Value::Null],
                vec![Value::from("P2"), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let d = drop_duplicates(&table());
        assert_eq!(d.len(), 3);
        assert_eq!(d.raw_rows()[1], vec![Value::from("P1"), Value::from("S2")]);
        assert_eq!(d.raw_rows()[2], vec![Value::from("P2"), Value::Null]);
    }

    #[test]
    fn test_idempotent() {
        let once = drop_duplicates(&table());
        let twice = drop_duplicates(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_distinct_on_subset() {
        let d = distinct(&table(), &["patient"]).unwrap();
        assert_eq!(d.len(), 2);
        assert!(distinct(&table(), &["variant"]).is_err());
    }

    #[test]
    fn test_unique_by_is_lazy_and_ordered() {
        let out: Vec<i32> = unique_by([3, 1, 3, 2, 1].into_iter(), |x| *x).collect();
        assert_eq!(out, vec![3, 1, 2]);
    }
}

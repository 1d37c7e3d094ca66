//! In-memory record set.
//!
//! A `Table` is an ordered list of column names plus rows of `Value`s of the
//! same width. Tables are never mutated once built: every transformation
//! returns a new table, so each pipeline stage can be tested in isolation.

use crate::error::{OncographError, Result};
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Empty table with the given header.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { columns: columns.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Build a table from a header and rows, checking every row's width.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row. Only used while a table is being built.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(OncographError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] { &self.columns }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of a column that must exist.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| OncographError::missing_column(name))
    }

    /// Rows as raw value slices, in table order.
    pub fn raw_rows(&self) -> &[Vec<Value>] { &self.rows }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// True if every non-null cell of the column reads as a number and at
    /// least one cell is non-null.
    pub fn is_numeric_column(&self, name: &str) -> bool {
        let Some(mut values) = self.column_values(name) else { return false };
        let mut seen_number = false;
        let all_numeric = values.all(|v| {
            if v.is_null() {
                return true;
            }
            let numeric = v.is_numeric();
            seen_number |= numeric;
            numeric
        });
        all_numeric && seen_number
    }

    /// New table with exactly the named columns, in the given order.
    /// Every name must exist.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        let indices = names
            .iter()
            .map(|n| self.require_column(n.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Table {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// New table with `name` set to `values`: replaced in place if the column
    /// exists, appended at the end otherwise.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Result<Table> {
        if values.len() != self.rows.len() {
            return Err(OncographError::RowWidth { expected: self.rows.len(), found: values.len() });
        }
        let mut out = self.clone();
        match self.column_index(name) {
            Some(idx) => {
                for (row, v) in out.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                out.columns.push(name.to_string());
                for (row, v) in out.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
        Ok(out)
    }

    /// New table keeping the rows for which `keep` returns true.
    pub fn filter<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&Record<'_>) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|values| keep(&Record { columns: &self.columns, values }))
            .cloned()
            .collect();
        Table { columns: self.columns.clone(), rows }
    }

    /// New table with the same header and the given rows.
    pub fn with_rows(&self, rows: Vec<Vec<Value>>) -> Result<Table> {
        Table::from_rows(self.columns.clone(), rows)
    }
}

/// A borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Record<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns.iter().position(|c| c == column).map(|i| &self.values[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Table {
        Table::from_rows(
            ["ID", "CHROM", "POS"],
            vec![
                vec![Value::from("."), Value::from("1"), Value::Int(100)],
                vec![Value::from("rs1"), Value::from("2"), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut t = Table::new(["a", "b"]);
        let err = t.push_row(vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(err, OncographError::RowWidth { expected: 2, found: 1 }));
    }

    #[test]
    fn test_select_reorders_and_requires_columns() {
        let t = sample();
        let s = t.select(&["POS", "ID"]).unwrap();
        assert_eq!(s.columns(), &["POS".to_string(), "ID".to_string()]);
        assert_eq!(s.raw_rows()[0], vec![Value::Int(100), Value::from(".")]);
        assert!(matches!(
            t.select(&["REF"]),
            Err(OncographError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_with_column_appends_or_replaces() {
        let t = sample();
        let appended = t.with_column("Gene", vec![Value::from("A"), Value::from("B")]).unwrap();
        assert_eq!(appended.columns().last().map(String::as_str), Some("Gene"));
        let replaced = t.with_column("POS", vec![Value::Int(1), Value::Int(2)]).unwrap();
        assert_eq!(replaced.columns().len(), 3);
        assert_eq!(replaced.raw_rows()[1][2], Value::Int(2));
    }

    #[test]
    fn test_numeric_column_detection() {
        let t = sample();
        assert!(t.is_numeric_column("POS"));
        assert!(t.is_numeric_column("CHROM"));
        assert!(!t.is_numeric_column("ID"));
        assert!(!t.is_numeric_column("missing"));
        let all_null = Table::from_rows(["x"], vec![vec![Value::Null]]).unwrap();
        assert!(!all_null.is_numeric_column("x"));
    }

    #[test]
    fn test_filter_returns_new_table() {
        let t = sample();
        let f = t.filter(|r| r.get("ID") != Some(&Value::from(".")));
        assert_eq!(f.len(), 1);
        assert_eq!(t.len(), 2);
    }
}

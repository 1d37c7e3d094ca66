//! Multi-value explosion.
//!
//! Source exports pack several facts into one cell (`samples = "s1;s2"`,
//! `readCounts = "10;20"`, `Gene.MANE = "A;B"`). Exploding replaces the row
//! with one row per element, copying every other cell unchanged.
//!
//! Targets are grouped. The targets of one [`ExplodeGroup`] are co-varying:
//! they are split together and paired by position, so `s1` goes with `10`
//! and `s2` with `20`, never `s1` with `20`. Separate groups are applied one
//! after another, which multiplies rows (cartesian product per row).
//!
//! Cells that are not strings (null, or a number built in code) are a
//! single-element list and pass through unchanged.

use tracing::debug;

use oncograph_common::{Result, Table, Value};

/// Where the exploded parts of a column are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Overwrite the source column.
    InPlace,
    /// Overwrite the source column and rename it (`samples` → `sample`).
    Renamed(String),
    /// Keep the source column and write the parts into a new column
    /// appended at the end (`Gene.MANE` → `Gene`).
    Helper(String),
}

/// One column to split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplodeTarget {
    pub column: String,
    pub delimiter: String,
    pub placement: Placement,
}

impl ExplodeTarget {
    pub fn new(column: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self { column: column.into(), delimiter: delimiter.into(), placement: Placement::InPlace }
    }

    pub fn renamed(mut self, to: impl Into<String>) -> Self {
        self.placement = Placement::Renamed(to.into());
        self
    }

    pub fn into_helper(mut self, helper: impl Into<String>) -> Self {
        self.placement = Placement::Helper(helper.into());
        self
    }
}

/// Targets split and re-aligned together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplodeGroup {
    pub targets: Vec<ExplodeTarget>,
}

impl ExplodeGroup {
    pub fn single(target: ExplodeTarget) -> Self {
        Self { targets: vec![target] }
    }

    pub fn covarying(targets: impl IntoIterator<Item = ExplodeTarget>) -> Self {
        Self { targets: targets.into_iter().collect() }
    }
}

/// Apply every group in order.
pub fn explode(table: &Table, groups: &[ExplodeGroup]) -> Result<Table> {
    let mut current = table.clone();
    for group in groups {
        current = explode_group(&current, group)?;
    }
    Ok(current)
}

fn explode_group(table: &Table, group: &ExplodeGroup) -> Result<Table> {
    // Targets whose column was projected out are skipped.
    let present: Vec<(&ExplodeTarget, usize)> = group
        .targets
        .iter()
        .filter_map(|t| table.column_index(&t.column).map(|idx| (t, idx)))
        .collect();
    if present.is_empty() {
        return Ok(table.clone());
    }

    let mut columns = table.columns().to_vec();
    let mut write_at = Vec::with_capacity(present.len());
    for (target, src_idx) in &present {
        match &target.placement {
            Placement::InPlace => write_at.push(*src_idx),
            Placement::Renamed(to) => {
                columns[*src_idx] = to.clone();
                write_at.push(*src_idx);
            }
            Placement::Helper(name) => match columns.iter().position(|c| c == name) {
                Some(existing) => write_at.push(existing),
                None => {
                    columns.push(name.clone());
                    write_at.push(columns.len() - 1);
                }
            },
        }
    }
    let added = columns.len() - table.columns().len();

    let mut rows = Vec::with_capacity(table.len());
    for (row_no, row) in table.raw_rows().iter().enumerate() {
        let parts: Vec<Vec<Value>> = present
            .iter()
            .map(|(target, idx)| split_cell(&row[*idx], &target.delimiter))
            .collect();
        let n = parts.iter().map(Vec::len).max().unwrap_or(1);
        if parts.iter().any(|p| p.len() != n) {
            debug!(
                row = row_no,
                lengths = ?parts.iter().map(Vec::len).collect::<Vec<_>>(),
                "Co-varying cells split into different lengths; padding with nulls"
            );
        }

        for k in 0..n {
            let mut out = row.clone();
            out.extend(std::iter::repeat(Value::Null).take(added));
            for (p, &idx) in parts.iter().zip(&write_at) {
                out[idx] = p.get(k).cloned().unwrap_or(Value::Null);
            }
            rows.push(out);
        }
    }

    Table::from_rows(columns, rows)
}

/// Split a string cell into parts; empty parts become null. Anything else is
/// a single part.
fn split_cell(cell: &Value, delimiter: &str) -> Vec<Value> {
    match cell {
        Value::Str(s) => s.split(delimiter).map(Value::parse).collect(),
        other => vec![other.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn variant_row() -> Table {
        Table::from_rows(
            ["ID", "samples", "readCounts", "Gene.MANE"],
            vec![vec![
                Value::from("."),
                Value::from("s1;s2"),
                Value::from("10;20"),
                Value::from("BRCA1;NONE"),
            ]],
        )
        .unwrap()
    }

    fn column(t: &Table, name: &str) -> Vec<Value> {
        t.column_values(name).unwrap().cloned().collect()
    }

    #[test]
    fn test_covarying_columns_stay_aligned() {
        let group = ExplodeGroup::covarying([
            ExplodeTarget::new("samples", ";").renamed("sample"),
            ExplodeTarget::new("readCounts", ";"),
        ]);
        let t = explode(&variant_row(), &[group]).unwrap();

        assert_eq!(t.len(), 2);
        assert!(t.has_column("sample"));
        assert!(!t.has_column("samples"));
        assert_eq!(column(&t, "sample"), vec![Value::from("s1"), Value::from("s2")]);
        assert_eq!(column(&t, "readCounts"), vec![Value::from("10"), Value::from("20")]);
    }

    #[test]
    fn test_separate_groups_multiply() {
        let groups = [
            ExplodeGroup::covarying([
                ExplodeTarget::new("samples", ";"),
                ExplodeTarget::new("readCounts", ";"),
            ]),
            ExplodeGroup::single(ExplodeTarget::new("Gene.MANE", ";").into_helper("Gene")),
        ];
        let t = explode(&variant_row(), &groups).unwrap();

        assert_eq!(t.len(), 4);
        assert_eq!(t.columns().last().map(String::as_str), Some("Gene"));
        assert_eq!(
            column(&t, "Gene"),
            vec![Value::from("BRCA1"), Value::from("NONE"), Value::from("BRCA1"), Value::from("NONE")]
        );
        // The source column is kept intact next to the helper.
        assert!(column(&t, "Gene.MANE").iter().all(|v| v == &Value::from("BRCA1;NONE")));
    }

    #[test]
    fn test_non_string_cells_pass_through() {
        let t = Table::from_rows(
            ["samples", "readCounts"],
            vec![
                vec![Value::Null, Value::Int(7)],
                vec![Value::from("s9"), Value::Null],
            ],
        )
        .unwrap();
        let group = ExplodeGroup::covarying([
            ExplodeTarget::new("samples", ";"),
            ExplodeTarget::new("readCounts", ";"),
        ]);
        let out = explode(&t, &[group]).unwrap();
        assert_eq!(out, t);
    }

    #[test]
    fn test_unequal_lengths_are_padded() {
        let t = Table::from_rows(
            ["samples", "readCounts"],
            vec![vec![Value::from("s1;s2;s3"), Value::from("1;2")]],
        )
        .unwrap();
        let group = ExplodeGroup::covarying([
            ExplodeTarget::new("samples", ";"),
            ExplodeTarget::new("readCounts", ";"),
        ]);
        let out = explode(&t, &[group]).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(column(&out, "readCounts"), vec![Value::from("1"), Value::from("2"), Value::Null]);
    }

    #[test]
    fn test_absent_target_is_skipped() {
        let group = ExplodeGroup::single(ExplodeTarget::new("Drugs", ", "));
        let out = explode(&variant_row(), &[group]).unwrap();
        assert_eq!(out, variant_row());
    }

    #[test]
    fn test_multi_character_delimiter() {
        let t = Table::from_rows(["Drugs"], vec![vec![Value::from("Olaparib, Niraparib")]]).unwrap();
        let out = explode(&t, &[ExplodeGroup::single(ExplodeTarget::new("Drugs", ", "))]).unwrap();
        assert_eq!(column(&out, "Drugs"), vec![Value::from("Olaparib"), Value::from("Niraparib")]);
    }
}

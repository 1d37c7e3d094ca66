//! Content-hash identifiers.
//!
//! Rows without a natural key get the MD5 hex digest of their substantive
//! content. The digest is order-sensitive, so the columns hashed are fixed
//! by a caller-supplied canonical order (the declaration order of the
//! adapter's field enum), never by the order columns happen to appear in a
//! loaded file or a configuration list.
//!
//! Text forms are concatenated without a separator; a null cell contributes
//! the empty string.

use md5::{Digest, Md5};

use oncograph_common::{Result, Table, Value};

/// Placeholder meaning "no identifier given, derive one".
pub const SENTINEL_ID: &str = ".";

/// Lowercase hex MD5 of the concatenated parts.
pub fn md5_hex<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Md5::new();
    for part in parts {
        hasher.update(part.as_ref().as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Derives identifiers from a fixed subset of columns.
#[derive(Debug, Clone)]
pub struct IdentifierDeriver {
    canonical_order: Vec<String>,
    excluded: Vec<String>,
}

impl IdentifierDeriver {
    /// `canonical_order` fixes which columns are hashed and in what order.
    pub fn new<I, S>(canonical_order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            canonical_order: canonical_order.into_iter().map(Into::into).collect(),
            excluded: Vec::new(),
        }
    }

    /// Columns never hashed: the id column itself and row-cardinality
    /// artifacts (sample id, read counts, exploded helper columns).
    pub fn excluding<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Columns of `table` that contribute to the digest, in hash order.
    pub fn hashed_columns<'a>(&'a self, table: &Table) -> Vec<&'a str> {
        self.canonical_order
            .iter()
            .filter(|c| !self.excluded.contains(c) && table.has_column(c))
            .map(String::as_str)
            .collect()
    }

    fn digests(&self, table: &Table) -> Vec<String> {
        let indices: Vec<usize> = self
            .hashed_columns(table)
            .into_iter()
            .filter_map(|c| table.column_index(c))
            .collect();
        table
            .raw_rows()
            .iter()
            .map(|row| md5_hex(indices.iter().map(|&i| row[i].text())))
            .collect()
    }

    /// New table where every sentinel id in `id_column` is replaced by the
    /// row digest. Other ids, null included, are left unchanged.
    pub fn fill_sentinel(&self, table: &Table, id_column: &str) -> Result<Table> {
        let id_idx = table.require_column(id_column)?;
        let sentinel = Value::from(SENTINEL_ID);
        let ids = table
            .raw_rows()
            .iter()
            .zip(self.digests(table))
            .map(|(row, digest)| {
                if row[id_idx] == sentinel { Value::Str(digest) } else { row[id_idx].clone() }
            })
            .collect();
        table.with_column(id_column, ids)
    }

    /// New table with the digest of every row written to `column`.
    pub fn derive_column(&self, table: &Table, column: &str) -> Result<Table> {
        let ids = self.digests(table).into_iter().map(Value::Str).collect();
        table.with_column(column, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CANONICAL: [&str; 6] = ["CHROM", "POS", "REF", "ALT", "FILTER", "Gene.MANE"];

    fn deriver() -> IdentifierDeriver {
        IdentifierDeriver::new(CANONICAL).excluding(["ID", "sample", "readCounts", "Gene"])
    }

    fn variants() -> Table {
        Table::from_rows(
            ["ID", "CHROM", "POS", "REF", "ALT", "sample", "Gene.MANE", "Gene"],
            vec![
                vec![
                    Value::from("."), Value::Int(1), Value::Int(100), Value::from("A"),
                    Value::from("T"), Value::from("sA"), Value::from("BRCA1"), Value::from("BRCA1"),
                ],
                vec![
                    Value::from("rs80357906"), Value::Int(17), Value::Int(43_057_062),
                    Value::from("G"), Value::from("C"), Value::from("sB"),
                    Value::from("BRCA1"), Value::from("BRCA1"),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_md5_hex_known_vectors() {
        assert_eq!(md5_hex([""; 0]), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex(["1", "100", "A", "T", "BRCA1"]), "ae729a85f5b4861837fd00b8527f9006");
        assert_eq!(md5_hex(["1100ATBRCA1"]), md5_hex(["1", "100", "A", "T", "BRCA1"]));
    }

    #[test]
    fn test_sentinel_replaced_by_canonical_digest() {
        let t = deriver().fill_sentinel(&variants(), "ID").unwrap();
        let ids: Vec<Value> = t.column_values("ID").unwrap().cloned().collect();
        assert_eq!(ids[0], Value::from("ae729a85f5b4861837fd00b8527f9006"));
        assert_eq!(ids[1], Value::from("rs80357906"));
    }

    #[test]
    fn test_hashed_columns_follow_canonical_order_not_table_order() {
        let t = variants().select(&["Gene.MANE", "ALT", "REF", "POS", "CHROM", "ID"]).unwrap();
        assert_eq!(deriver().hashed_columns(&t), vec!["CHROM", "POS", "REF", "ALT", "Gene.MANE"]);
        let filled = deriver().fill_sentinel(&t, "ID").unwrap();
        assert_eq!(
            filled.column_values("ID").unwrap().next(),
            Some(&Value::from("ae729a85f5b4861837fd00b8527f9006"))
        );
    }

    #[test]
    fn test_rows_differing_only_in_artifacts_share_an_id() {
        let t = variants()
            .with_column("sample", vec![Value::from("s1"), Value::from("s2")])
            .unwrap();
        let a = deriver().digests(&t.filter(|r| r.get("sample") == Some(&Value::from("s1"))));
        let changed = t.with_column("sample", vec![Value::from("zz"), Value::from("s2")]).unwrap();
        let b = deriver().digests(&changed.filter(|r| r.get("sample") == Some(&Value::from("zz"))));
        assert_eq!(a, b);
    }

    #[test]
    fn test_null_id_is_not_a_sentinel() {
        let t = variants().with_column("ID", vec![Value::Null, Value::from(".")]).unwrap();
        let filled = deriver().fill_sentinel(&t, "ID").unwrap();
        let ids: Vec<&Value> = filled.column_values("ID").unwrap().collect();
        assert!(ids[0].is_null());
        assert_eq!(ids[1].to_string().len(), 32);
    }

    #[test]
    fn test_derive_column_appends_digest() {
        let t = IdentifierDeriver::new(["sample", "Gene"]).derive_column(&variants(), "VARIANT_ID").unwrap();
        assert_eq!(t.columns().last().map(String::as_str), Some("VARIANT_ID"));
        let first = t.column_values("VARIANT_ID").unwrap().next().unwrap().to_string();
        assert_eq!(first, md5_hex(["sA", "BRCA1"]));
    }

    #[test]
    fn test_missing_id_column_is_an_error() {
        assert!(deriver().fill_sentinel(&variants(), "VARIANT").is_err());
    }
}

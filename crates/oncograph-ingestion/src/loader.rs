//! Delimited source-file loading.
//!
//! Source tables have one record per line and, except for the oncodash
//! part files, a header row. The delimiter is fixed per source (tab for
//! variant, copy-number and OncoKB exports, `;` for the clinical and
//! oncodash exports) and is load-bearing: reading a file with the wrong one
//! silently collapses every row into a single column.
//!
//! Cells go through [`Value::parse`], so they are either null or the source
//! text exactly as written. Ragged rows are an error, never padded: a schema
//! mismatch aborts the run.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info, instrument};

use oncograph_common::{Result, Table, Value};

/// Field delimiter of one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFormat {
    pub delimiter: u8,
}

impl SourceFormat {
    /// Tab-separated (variant calls, copy-number segments, OncoKB).
    pub const TSV: SourceFormat = SourceFormat { delimiter: b'\t' };
    /// Semicolon-separated (clinical and oncodash exports).
    pub const SEMICOLON: SourceFormat = SourceFormat { delimiter: b';' };
}

/// Load a source file with a header row.
#[instrument(skip(format))]
pub fn load_table(path: &Path, format: SourceFormat) -> Result<Table> {
    info!(delimiter = ?(format.delimiter as char), "Loading source table from {:?}", path);
    let file = File::open(path)?;
    let table = read_table(BufReader::new(file), format)?;
    log_loaded(&table);
    Ok(table)
}

/// Load a header-less source file, naming its columns `columns`.
#[instrument(skip(format, columns))]
pub fn load_headerless<S: AsRef<str>>(path: &Path, format: SourceFormat, columns: &[S]) -> Result<Table> {
    info!(delimiter = ?(format.delimiter as char), "Loading header-less source table from {:?}", path);
    let file = File::open(path)?;
    let table = read_headerless(BufReader::new(file), format, columns)?;
    log_loaded(&table);
    Ok(table)
}

fn log_loaded(table: &Table) {
    info!(
        rows = table.len(),
        columns = table.columns().len(),
        "Loaded source table"
    );
}

fn csv_reader<R: Read>(reader: R, format: SourceFormat, has_headers: bool) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(has_headers)
        .flexible(false)
        .from_reader(reader)
}

/// Read a delimited table from any reader (used by tests and by `load_table`).
pub fn read_table<R: Read>(reader: R, format: SourceFormat) -> Result<Table> {
    let mut csv_reader = csv_reader(reader, format, true);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    debug!("Header: {:?}", headers);

    fill(Table::new(headers), csv_reader)
}

/// Read a table whose first line is already data.
pub fn read_headerless<R: Read, S: AsRef<str>>(reader: R, format: SourceFormat, columns: &[S]) -> Result<Table> {
    let headers: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
    fill(Table::new(headers), csv_reader(reader, format, false))
}

fn fill<R: Read>(mut table: Table, mut csv_reader: csv::Reader<R>) -> Result<Table> {
    for result in csv_reader.records() {
        let record = result?;
        table.push_row(record.iter().map(Value::parse).collect())?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_read_tsv_keeps_source_text() {
        let tsv = "ID\tCHROM\tPOS\tsamples\n.\t1\t100\tsA;sB\nrs7\tX\t\tsC\n";
        let t = read_table(tsv.as_bytes(), SourceFormat::TSV).unwrap();
        assert_eq!(t.columns(), &["ID", "CHROM", "POS", "samples"].map(String::from));
        assert_eq!(
            t.raw_rows()[0],
            vec![Value::from("."), Value::from("1"), Value::from("100"), Value::from("sA;sB")]
        );
        assert_eq!(t.raw_rows()[1][2], Value::Null);
    }

    #[test]
    fn test_semicolon_format_keeps_commas_in_cells() {
        let csv = "patient;Histology\nP1;HGSC, high grade\n";
        let t = read_table(csv.as_bytes(), SourceFormat::SEMICOLON).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.raw_rows()[0][1], Value::from("HGSC, high grade"));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let tsv = "a\tb\n1\t2\n3\n";
        assert!(read_table(tsv.as_bytes(), SourceFormat::TSV).is_err());
    }

    #[test]
    fn test_load_table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Gene\tLevel\nKRAS\t1\n").unwrap();
        let t = load_table(file.path(), SourceFormat::TSV).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.raw_rows()[0], vec![Value::from("KRAS"), Value::from("1")]);
    }

    #[test]
    fn test_leading_zeros_survive_loading() {
        let tsv = "patient\tsamples\n007\t0042;1.50\n";
        let t = read_table(tsv.as_bytes(), SourceFormat::TSV).unwrap();
        assert_eq!(t.raw_rows()[0], vec![Value::from("007"), Value::from("0042;1.50")]);
    }

    #[test]
    fn test_headerless_first_line_is_data() {
        let csv = "GO_1:biological_process;GO_1;x;BiologicalProcess\nNone:biological_process;None;;BiologicalProcess\n";
        let t = read_headerless(csv.as_bytes(), SourceFormat::SEMICOLON, &["id", "name", "preferred_id", "label"]).unwrap();
        assert_eq!(t.columns(), &["id", "name", "preferred_id", "label"].map(String::from));
        assert_eq!(t.len(), 2);
        assert_eq!(t.raw_rows()[0][0], Value::from("GO_1:biological_process"));
        assert_eq!(t.raw_rows()[1][2], Value::Null);
    }

    #[test]
    fn test_headerless_width_must_match_names() {
        let csv = "a;b;c\n";
        assert!(read_headerless(csv.as_bytes(), SourceFormat::SEMICOLON, &["x", "y"]).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_table(Path::new("/definitely/not/here.tsv"), SourceFormat::TSV);
        assert!(err.is_err());
    }
}

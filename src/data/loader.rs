//! CSV Loader Module
//! Reads selected CSV files with Polars and merges them into one table.

use crate::config::TextEncoding;
use crate::data::FileRef;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("File is not valid {encoding}")]
    Decode { encoding: &'static str },
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] PolarsError),
}

/// A selected file that was skipped during loading.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadError {
    pub file: String,
    pub reason: String,
}

impl LoadError {
    /// Message shown inline in the control panel.
    pub fn message(&self) -> String {
        format!("Error loading {}. Please check the file encoding.", self.file)
    }
}

/// Result of merging a selection: the combined table (if any rows survived)
/// and one error per skipped file.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub table: Option<DataFrame>,
    pub errors: Vec<LoadError>,
}

/// Loads CSV files using a fixed text encoding.
pub struct DataLoader {
    encoding: TextEncoding,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(TextEncoding::default())
    }
}

impl DataLoader {
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }

    /// Load a single CSV file into a DataFrame.
    pub fn load_csv(&self, path: &Path) -> Result<DataFrame, LoaderError> {
        let bytes = std::fs::read(path)?;
        let text = self.decode(bytes)?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            // Scan every row; a late text value widens the column.
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()?;

        Ok(df)
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<String, LoaderError> {
        match self.encoding {
            TextEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
            TextEncoding::Utf8 => String::from_utf8(bytes).map_err(|_| LoaderError::Decode {
                encoding: self.encoding.name(),
            }),
        }
    }

    /// Load every selected file in order and concatenate the rows.
    ///
    /// Files that fail to load are skipped and reported. Columns are unioned;
    /// rows from a file lacking a column get nulls there.
    pub fn merge(&self, files: &[FileRef]) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        let mut frames: Vec<LazyFrame> = Vec::with_capacity(files.len());

        for file in files {
            match self.load_csv(&file.path) {
                Ok(df) => {
                    log::debug!(
                        "Loaded {}: {} rows, {} columns",
                        file.name,
                        df.height(),
                        df.width()
                    );
                    frames.push(df.lazy());
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", file.name, e);
                    outcome.errors.push(LoadError {
                        file: file.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if frames.is_empty() {
            return outcome;
        }

        let args = UnionArgs {
            to_supertypes: true,
            ..Default::default()
        };
        match concat_lf_diagonal(frames, args).and_then(|lf| lf.collect()) {
            Ok(df) if df.height() > 0 && df.width() > 0 => {
                log::info!(
                    "Combined {} files: {} rows, {} columns",
                    files.len() - outcome.errors.len(),
                    df.height(),
                    df.width()
                );
                outcome.table = Some(df);
            }
            Ok(_) => log::info!("Combined table is empty"),
            Err(e) => {
                log::warn!("Failed to combine selection: {}", e);
                outcome.errors.push(LoadError {
                    file: files
                        .iter()
                        .map(|f| f.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                    reason: e.to_string(),
                });
            }
        }

        outcome
    }
}

/// Column names of a DataFrame in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Render a single cell for display, with nulls shown as "None".
pub fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => "None".to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &[u8]) -> FileRef {
        let path = dir.path().join(name);
        fs::write(&path, content).expect("write fixture");
        FileRef {
            name: name.to_string(),
            path,
        }
    }

    #[test]
    fn merges_rows_and_unions_columns() {
        let dir = tempfile::tempdir().expect("temp dir");
        let a = write_csv(&dir, "a.csv", b"a,b\n1,2\n3,4\n");
        let b = write_csv(&dir, "b.csv", b"b,c\n5,6\n7,8\n9,10\n");

        let outcome = DataLoader::default().merge(&[a, b]);
        assert!(outcome.errors.is_empty());
        let df = outcome.table.expect("combined table");

        assert_eq!(column_names(&df), vec!["a", "b", "c"]);
        assert_eq!(df.height(), 5);

        let col_a = df.column("a").unwrap();
        let col_c = df.column("c").unwrap();
        for i in 0..2 {
            assert!(col_c.get(i).unwrap().is_null());
            assert!(!col_a.get(i).unwrap().is_null());
        }
        for i in 2..5 {
            assert!(col_a.get(i).unwrap().is_null());
            assert!(!col_c.get(i).unwrap().is_null());
        }
    }

    #[test]
    fn preserves_selection_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let first = write_csv(&dir, "first.csv", b"v\n1\n2\n");
        let second = write_csv(&dir, "second.csv", b"v\n3\n");

        let df = DataLoader::default()
            .merge(&[second, first])
            .table
            .expect("combined table");
        let values: Vec<Option<i64>> = df
            .column("v")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn row_count_is_sum_of_inputs() {
        let dir = tempfile::tempdir().expect("temp dir");
        let files = vec![
            write_csv(&dir, "one.csv", b"x,y\n1,1\n"),
            write_csv(&dir, "two.csv", b"x,y\n2,2\n3,3\n"),
            write_csv(&dir, "three.csv", b"x,z\n4,4\n5,5\n6,6\n"),
        ];
        let df = DataLoader::default().merge(&files).table.unwrap();
        assert_eq!(df.height(), 6);
        assert_eq!(column_names(&df), vec!["x", "y", "z"]);
    }

    #[test]
    fn decode_failure_skips_only_that_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let files = vec![
            write_csv(&dir, "good1.csv", b"x\n1\n2\n"),
            write_csv(&dir, "bad.csv", b"x\n\xff\xfe\n"),
            write_csv(&dir, "good2.csv", b"x\n3\n"),
        ];

        let outcome = DataLoader::new(TextEncoding::Utf8).merge(&files);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].file, "bad.csv");
        assert_eq!(
            outcome.errors[0].message(),
            "Error loading bad.csv. Please check the file encoding."
        );
        assert_eq!(outcome.table.unwrap().height(), 3);
    }

    #[test]
    fn latin1_accepts_any_byte() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = write_csv(&dir, "accents.csv", b"name,n\ncaf\xe9,1\n");

        let df = DataLoader::default().merge(&[file]).table.unwrap();
        let name = df.column("name").unwrap().get(0).unwrap();
        assert_eq!(format_cell(&name), "café");
    }

    #[test]
    fn all_failures_yield_no_table() {
        let dir = tempfile::tempdir().expect("temp dir");
        let bad = write_csv(&dir, "bad.csv", b"\xff\n");
        let missing = FileRef {
            name: "missing.csv".to_string(),
            path: dir.path().join("missing.csv"),
        };

        let outcome = DataLoader::new(TextEncoding::Utf8).merge(&[bad, missing]);
        assert!(outcome.table.is_none());
        assert_eq!(outcome.errors.len(), 2);
    }

    #[test]
    fn empty_selection_yields_no_table() {
        let outcome = DataLoader::default().merge(&[]);
        assert!(outcome.table.is_none());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn header_only_file_is_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = write_csv(&dir, "header.csv", b"a,b\n");
        assert!(DataLoader::default().merge(&[file]).table.is_none());
    }

    #[test]
    fn late_text_value_keeps_column_as_text() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut content = String::from("id,value\n");
        for i in 0..10_000 {
            content.push_str(&format!("{},{}\n", i, i * 2));
        }
        content.push_str("10000,abc\n");
        let file = write_csv(&dir, "late.csv", content.as_bytes());

        let outcome = DataLoader::default().merge(&[file]);
        assert!(outcome.errors.is_empty());
        let df = outcome.table.expect("combined table");
        assert_eq!(df.height(), 10_001);

        let value = df.column("value").unwrap();
        assert_eq!(value.dtype(), &DataType::String);
        assert_eq!(format_cell(&value.get(10_000).unwrap()), "abc");
        assert_eq!(format_cell(&value.get(3).unwrap()), "6");
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn malformed_row_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let good = write_csv(&dir, "good.csv", b"a\n1\n");
        let bad = write_csv(&dir, "bad.csv", b"a,b\n1,2\n3,4,5,6\n");

        let outcome = DataLoader::default().merge(&[good, bad]);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].file, "bad.csv");
        assert_eq!(outcome.table.expect("good file survives").height(), 1);
    }
}

//! Reading seed CSV files.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use log::{debug, warn};

use crate::{
    coerce::FieldValue,
    error::{Result, SeedError},
};

/// A decoded, parsed seed file.
///
/// The first line is the header; records are addressed by column name.
#[derive(Debug)]
pub struct SeedSource {
    path: PathBuf,
    columns: HashMap<String, usize>,
    records: Vec<SeedRecord>,
}

/// One data row of a seed file.
#[derive(Debug, Clone)]
pub struct SeedRecord {
    line: u64,
    fields: Vec<String>,
}

impl SeedSource {
    /// Reads and parses `path`, decoding it with `encoding`.
    ///
    /// A byte-order mark overrides `encoding`. Columns listed in
    /// `expected_columns` but absent from the header are logged; their values
    /// read as blank.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::FileSystem` if the file cannot be read and
    /// `SeedError::Csv` if it is not valid CSV.
    pub fn open(path: &Path, encoding: &'static Encoding, expected_columns: &[&str]) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| SeedError::file_system(path, e))?;
        let (text, used, had_errors) = encoding.decode(&bytes);
        if had_errors {
            warn!(
                "{} contains bytes that are not valid {}; they were replaced",
                path.display(),
                used.name()
            );
        }

        let csv_error = |source: csv::Error| SeedError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(Cursor::new(text.as_bytes()));

        let columns: HashMap<String, usize> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .enumerate()
            .map(|(index, name)| (name.trim().to_string(), index))
            .collect();

        for column in expected_columns {
            if !columns.contains_key(*column) {
                warn!("{} has no '{}' column", path.display(), column);
            }
        }

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            records.push(SeedRecord {
                line: record.position().map_or(0, |p| p.line()),
                fields: record.iter().map(String::from).collect(),
            });
        }

        debug!("Read {} records from {}", records.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            columns,
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn records(&self) -> &[SeedRecord] {
        &self.records
    }

    /// The field of `record` under `column` as written, `None` when blank
    /// or absent.
    pub fn get<'r>(&self, record: &'r SeedRecord, column: &str) -> Option<&'r str> {
        let index = *self.columns.get(column)?;
        record
            .fields
            .get(index)
            .map(String::as_str)
            .filter(|field| !field.trim().is_empty())
    }

    /// The normalized value of `record` under `column`.
    pub fn value(&self, record: &SeedRecord, column: &str) -> FieldValue {
        FieldValue::from_raw(self.get(record, column))
    }
}

impl SeedRecord {
    /// 1-based line number of the record in its file.
    pub fn line(&self) -> u64 {
        self.line
    }
}

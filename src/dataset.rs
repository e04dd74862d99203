//! In-memory tables.
//!
//! [`RawTable`] holds the listing exactly as decoded from the input file.
//! [`Table`] is the normalized, typed form every query runs against; it is
//! built once by the normalizer and never mutated afterwards. Filters and
//! aggregations borrow it and return freshly allocated results.

use std::path::Path;

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use log::info;

use crate::{
    data::{ColumnType, Value},
    error::AnalysisError,
    io_utils,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Reads the whole file. Any I/O, decoding, or row-shape failure aborts
    /// the load; no partial table is returned.
    pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        let headers = io_utils::reader_headers(&mut reader, encoding)
            .with_context(|| format!("Reading headers from {path:?}"))?;
        if headers.iter().all(|h| h.trim().is_empty()) {
            bail!("Input {path:?} has no header row");
        }

        let mut rows = Vec::new();
        for (idx, record) in reader.byte_records().enumerate() {
            let record = record.with_context(|| format!("Reading row {} in {path:?}", idx + 2))?;
            let decoded = io_utils::decode_record(&record, encoding)
                .with_context(|| format!("Decoding row {} in {path:?}", idx + 2))?;
            rows.push(decoded);
        }
        info!(
            "Loaded {} row(s) across {} column(s) from {:?}",
            rows.len(),
            headers.len(),
            path
        );
        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub type Row = Vec<Option<Value>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    types: Vec<ColumnType>,
    rows: Vec<Row>,
}

impl Table {
    pub(crate) fn from_parts(columns: Vec<String>, types: Vec<ColumnType>, rows: Vec<Row>) -> Self {
        debug_assert_eq!(columns.len(), types.len());
        Self {
            columns,
            types,
            rows,
        }
    }

    /// A table with the same schema holding `rows`.
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            columns: self.columns.clone(),
            types: self.types.clone(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column_index(name).map(|idx| self.types[idx])
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn require_column(&self, name: &str) -> Result<usize, AnalysisError> {
        self.column_index(name)
            .ok_or_else(|| AnalysisError::unknown(name))
    }

    pub fn require_numeric_column(&self, name: &str) -> Result<usize, AnalysisError> {
        let idx = self.require_column(name)?;
        if self.types[idx].is_numeric() {
            Ok(idx)
        } else {
            Err(AnalysisError::non_numeric(name))
        }
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    /// Values of one column in row order; absent cells are `None`.
    pub fn column_values(&self, name: &str) -> Result<Vec<Option<&Value>>, AnalysisError> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_ref()).collect())
    }

    /// Keeps only `names`, in the order given.
    pub fn select(&self, names: &[&str]) -> Result<Table, AnalysisError> {
        let indices = names
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<_>, _>>()?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Ok(Table {
            columns: indices.iter().map(|&idx| self.columns[idx].clone()).collect(),
            types: indices.iter().map(|&idx| self.types[idx]).collect(),
            rows,
        })
    }

    pub fn display_row(&self, row: usize) -> Vec<String> {
        self.rows
            .get(row)
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| cell.as_ref().map(Value::as_display).unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Renders every cell back to text, absent cells as empty strings.
    pub fn to_raw(&self) -> RawTable {
        RawTable {
            headers: self.columns.clone(),
            rows: (0..self.rows.len()).map(|idx| self.display_row(idx)).collect(),
        }
    }
}

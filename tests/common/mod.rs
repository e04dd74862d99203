#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use restaurant_insights::{
    dataset::{RawTable, Table},
    normalize::{self, NormalizedDataset},
};
use tempfile::{TempDir, tempdir};

pub const RESTAURANTS: &str = "restaurants.csv";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Loads and normalizes the shared restaurant fixture.
pub fn fixture_dataset() -> NormalizedDataset {
    normalize::load_and_normalize(&fixture_path(RESTAURANTS), b',', UTF_8)
        .expect("normalize fixture")
}

pub fn fixture_table() -> Table {
    fixture_dataset().table
}

/// Builds a raw table from string literals.
pub fn raw_table(headers: &[&str], rows: &[Vec<&str>]) -> RawTable {
    RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    )
}

/// Values of `column` rendered as text, in row order.
pub fn column_text(table: &Table, column: &str) -> Vec<String> {
    table
        .column_values(column)
        .expect("column exists")
        .into_iter()
        .map(|value| value.map(|v| v.as_display()).unwrap_or_default())
        .collect()
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crawl_logging::{crawl_debug, crawl_warn};

use crate::RankError;

/// Rows from one or more CSV files under a merged header.
///
/// Columns keep the order in which they were first seen; a row from a file
/// without some column holds an empty cell there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Concatenate every `*.csv` directly inside `dir`, in file name order.
    pub fn load_dir(dir: &Path) -> Result<Self, RankError> {
        let entries = fs::read_dir(dir).map_err(|source| RankError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| RankError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv && path.is_file() {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(RankError::NoInput(dir.to_path_buf()));
        }
        files.sort();

        let mut table = Table::default();
        for file in &files {
            table.append_file(file)?;
        }
        crawl_debug!(
            "loaded {} row(s) from {} file(s) in {:?}",
            table.len(),
            files.len(),
            dir
        );
        Ok(table)
    }

    pub fn append_file(&mut self, path: &Path) -> Result<(), RankError> {
        let csv_err = |source| RankError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(csv_err)?;

        let columns: Vec<usize> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|name| self.column_or_insert(name))
            .collect();

        let mut short_rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            if record.len() < columns.len() {
                short_rows += 1;
            }
            let mut row = vec![String::new(); self.headers.len()];
            for (value, &column) in record.iter().zip(&columns) {
                row[column] = value.to_string();
            }
            self.rows.push(row);
        }
        if short_rows > 0 {
            crawl_warn!("{} short row(s) in {:?} padded with empty cells", short_rows, path);
        }
        Ok(())
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_or_insert(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }
}

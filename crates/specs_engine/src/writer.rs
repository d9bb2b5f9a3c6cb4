use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crawl_logging::crawl_trace;
use specs_core::{FieldSchema, PersistError, VehicleRecord};

use crate::filename::category_filename;

/// Appends records to per-category CSV files, one row per call.
///
/// Every call opens the file in append mode, so the writer holds no state
/// between rows. The header (the full schema, in order) is written when the
/// file is absent or empty, which keeps it the first and only header line
/// even when two callers resolve to the same path one after the other. Not
/// meant for concurrent appends to one path.
#[derive(Debug, Clone)]
pub struct IncrementalWriter {
    output_dir: PathBuf,
    schema: FieldSchema,
}

impl IncrementalWriter {
    pub fn new(output_dir: impl Into<PathBuf>, schema: FieldSchema) -> Self {
        Self {
            output_dir: output_dir.into(),
            schema,
        }
    }

    pub fn path_for(&self, category: &str) -> PathBuf {
        self.output_dir.join(category_filename(category))
    }

    /// Append one row to the category's file, creating directories and the
    /// header as needed. Returns the file path.
    pub fn append(&self, category: &str, record: &VehicleRecord) -> Result<PathBuf, PersistError> {
        let path = self.path_for(category);
        self.append_to(&path, record)?;
        Ok(path)
    }

    pub fn append_to(&self, path: &Path, record: &VehicleRecord) -> Result<(), PersistError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let needs_header = match fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(err) if err.kind() == io::ErrorKind::NotFound => true,
            Err(err) => return Err(err.into()),
        };

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::Writer::from_writer(file);
        if needs_header {
            crawl_trace!("writing header to {:?}", path);
            writer.write_record(self.schema.names())?;
        }
        writer.write_record(record.values_in(&self.schema))?;
        writer.flush()?;
        Ok(())
    }
}

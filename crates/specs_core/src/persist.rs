use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {path:?} missing or not writable: {message}")]
    OutputDir { path: PathBuf, message: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl PersistError {
    fn output_dir(path: &Path, message: impl ToString) -> Self {
        PersistError::OutputDir {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Ensure the output directory exists (creating parents) and is writable.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::output_dir(dir, e))?;
        if !meta.is_dir() {
            return Err(PersistError::output_dir(dir, "path is not a directory"));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::output_dir(dir, e))?;
    }
    // Writability probe; the temp file is removed on drop.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::output_dir(dir, e))?;
    Ok(())
}

/// Replace `{dir}/{filename}` in one step by writing a sibling temp file and
/// renaming it over the target. Readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn write(&self, filename: &str, content: impl AsRef<[u8]>) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_ref())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

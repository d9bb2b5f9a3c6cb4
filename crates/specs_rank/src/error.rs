use std::io;
use std::path::PathBuf;

use specs_core::PersistError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed csv in {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("no .csv files found in {0:?}")]
    NoInput(PathBuf),
    #[error("column {0:?} not present in the input")]
    MissingColumn(String),
    #[error("cannot render output: {0}")]
    Render(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

//! Ranking stage over the per-category spec files.
//!
//! Loads every CSV in a directory into one [`Table`], turns the interesting
//! columns into numbers, penalizes holes in the data and scores each row by
//! the length of its normalized attribute vector.
mod error;
mod measure;
mod rank;
mod report;
mod table;

pub use error::RankError;
pub use measure::parse_measure;
pub use rank::{rank, RankSettings, RankedRow, Ranking};
pub use report::{render_rows, write_best};
pub use table::Table;

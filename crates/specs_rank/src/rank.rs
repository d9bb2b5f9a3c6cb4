use crawl_logging::crawl_info;
use serde::{Deserialize, Serialize};

use crate::measure::parse_measure;
use crate::{RankError, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankSettings {
    /// Numeric attributes that make up a row's score.
    pub columns: Vec<String>,
    /// Tokens removed from a cell before it is parsed as a number.
    pub units: Vec<String>,
    pub top_n: usize,
    /// Text written in place of a value that was missing in the input.
    pub missing_marker: String,
}

impl Default for RankSettings {
    fn default() -> Self {
        Self {
            columns: ["city", "highway", "fuel tank capacity", "max cargo capacity"]
                .map(String::from)
                .to_vec(),
            units: ["mpg", "gal.", "cu.ft."].map(String::from).to_vec(),
            top_n: 100,
            missing_marker: String::new(),
        }
    }
}

/// One input row with its cleaned values and score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    /// Position of the row in the source [`Table`].
    pub row: usize,
    /// Cleaned value per ranked column; `None` where the input had a hole.
    pub values: Vec<Option<f64>>,
    /// Values after the missing-data penalty, before normalization.
    pub penalized: Vec<f64>,
    pub normalized: Vec<f64>,
    pub score: f64,
}

impl RankedRow {
    pub fn is_missing(&self, column: usize) -> bool {
        self.values.get(column).is_some_and(Option::is_none)
    }
}

/// Every row of a table, best score first. Equal scores keep input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    columns: Vec<String>,
    /// Column indices into the source table, parallel to `columns`.
    table_columns: Vec<usize>,
    total_rows: usize,
    rows: Vec<RankedRow>,
}

/// Score every row of `table` on `settings.columns`.
///
/// A hole in a column is replaced by the negated column maximum (0 for a
/// column with no values at all), so a row missing data sinks instead of
/// being ignored. Each column is then min-max scaled to `[0, 1]`; a column
/// whose values are all equal scales to 0. The score is the Euclidean length
/// of the scaled vector.
pub fn rank(table: &Table, settings: &RankSettings) -> Result<Ranking, RankError> {
    let table_columns = settings
        .columns
        .iter()
        .map(|name| {
            table
                .column(name)
                .ok_or_else(|| RankError::MissingColumn(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let cleaned: Vec<Vec<Option<f64>>> = table
        .rows()
        .map(|row| {
            table_columns
                .iter()
                .map(|&col| parse_measure(&row[col], &settings.units))
                .collect()
        })
        .collect();

    let width = table_columns.len();
    let penalties: Vec<f64> = (0..width)
        .map(|col| {
            let max = cleaned
                .iter()
                .filter_map(|values| values[col])
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));
            -max.unwrap_or(0.0)
        })
        .collect();

    let penalized: Vec<Vec<f64>> = cleaned
        .iter()
        .map(|values| {
            values
                .iter()
                .zip(&penalties)
                .map(|(value, penalty)| value.unwrap_or(*penalty))
                .collect()
        })
        .collect();

    let bounds: Vec<(f64, f64)> = (0..width)
        .map(|col| {
            penalized.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
                (lo.min(row[col]), hi.max(row[col]))
            })
        })
        .collect();

    let mut rows: Vec<RankedRow> = cleaned
        .into_iter()
        .zip(penalized)
        .enumerate()
        .map(|(row, (values, penalized))| {
            let normalized: Vec<f64> = penalized
                .iter()
                .zip(&bounds)
                .map(|(&v, &(lo, hi))| if hi > lo { (v - lo) / (hi - lo) } else { 0.0 })
                .collect();
            let score = normalized.iter().map(|v| v * v).sum::<f64>().sqrt();
            RankedRow {
                row,
                values,
                penalized,
                normalized,
                score,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.score.total_cmp(&a.score));

    let ranking = Ranking {
        columns: settings.columns.clone(),
        table_columns,
        total_rows: table.len(),
        rows,
    };
    for (column, missing) in ranking.missing_counts() {
        crawl_info!(
            "{} out of {} rows in the column '{}' are missing",
            missing,
            ranking.total_rows,
            column
        );
    }
    Ok(ranking)
}

impl Ranking {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Table index of the `position`-th ranked column.
    pub fn table_column(&self, position: usize) -> Option<usize> {
        self.table_columns.get(position).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[RankedRow] {
        &self.rows
    }

    /// The best `n` rows overall.
    pub fn top(&self, n: usize) -> &[RankedRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// The `n` rows with the largest value in one ranked column, holes last.
    pub fn top_by_column(&self, column: &str, n: usize) -> Result<Vec<&RankedRow>, RankError> {
        let col = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| RankError::MissingColumn(column.to_string()))?;

        let mut rows: Vec<&RankedRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| {
            b.penalized[col]
                .total_cmp(&a.penalized[col])
                .then(a.row.cmp(&b.row))
        });
        rows.truncate(n);
        Ok(rows)
    }

    /// Holes per ranked column, in column order.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let missing = self.rows.iter().filter(|r| r.is_missing(col)).count();
                (name.clone(), missing)
            })
            .collect()
    }
}

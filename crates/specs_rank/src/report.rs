use std::path::{Path, PathBuf};

use crawl_logging::crawl_info;
use specs_core::AtomicFileWriter;

use crate::{RankError, RankSettings, RankedRow, Ranking, Table};

/// CSV bytes for `rows`: a leading 1-based `rank`, every table column, and a
/// trailing `score`.
///
/// Ranked columns carry their cleaned numeric value; cells that were missing
/// in the input show `settings.missing_marker` instead of the penalty.
pub fn render_rows(
    table: &Table,
    ranking: &Ranking,
    rows: &[&RankedRow],
    settings: &RankSettings,
) -> Result<Vec<u8>, RankError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let render = |err: csv::Error| RankError::Render(err.to_string());

    let mut header = Vec::with_capacity(table.headers().len() + 2);
    header.push("rank");
    header.extend(table.headers().iter().map(String::as_str));
    header.push("score");
    writer.write_record(&header).map_err(render)?;

    for (position, ranked) in rows.iter().enumerate() {
        let Some(source) = table.row(ranked.row) else {
            continue;
        };
        let mut cells: Vec<String> = Vec::with_capacity(source.len() + 2);
        cells.push((position + 1).to_string());
        cells.extend(source.iter().cloned());
        for (col, value) in ranked.values.iter().enumerate() {
            if let Some(idx) = ranking.table_column(col) {
                cells[idx + 1] = match value {
                    Some(v) => v.to_string(),
                    None => settings.missing_marker.clone(),
                };
            }
        }
        cells.push(format!("{:.6}", ranked.score));
        writer.write_record(&cells).map_err(render)?;
    }

    writer
        .into_inner()
        .map_err(|err| RankError::Render(err.error().to_string()))
}

/// Write the best `settings.top_n` rows to `output`, creating its directory.
/// The file is replaced in one step.
pub fn write_best(
    table: &Table,
    ranking: &Ranking,
    settings: &RankSettings,
    output: &Path,
) -> Result<PathBuf, RankError> {
    let best: Vec<&RankedRow> = ranking.top(settings.top_n).iter().collect();
    let bytes = render_rows(table, ranking, &best, settings)?;

    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let filename = output
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| RankError::Render(format!("{output:?} is not a file path")))?;

    let path = AtomicFileWriter::new(dir).write(filename, bytes)?;
    crawl_info!("wrote {} best pick(s) to {:?}", best.len(), path);
    Ok(path)
}

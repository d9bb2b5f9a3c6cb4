use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use crawl_logging::{crawl_info, crawl_warn};
use serde::{Deserialize, Serialize};
use specs_core::{AtomicFileWriter, CategorySummary};

pub const SUMMARY_FILENAME: &str = "crawl_summary.json";

/// What one `crawl` invocation did, saved next to the CSV files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub cancelled: bool,
    pub records_written: usize,
    pub categories: Vec<CategorySummary>,
}

impl CrawlReport {
    pub fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        cancelled: bool,
        mut categories: Vec<CategorySummary>,
    ) -> Self {
        categories.sort_by(|a, b| a.category.cmp(&b.category));
        let records_written = categories.iter().map(|c| c.records_written).sum();
        Self {
            started_at,
            finished_at,
            cancelled,
            records_written,
            categories,
        }
    }

    pub fn write(&self, output_dir: &Path) -> anyhow::Result<PathBuf> {
        let json = serde_json::to_string_pretty(self)?;
        let path = AtomicFileWriter::new(output_dir).write(SUMMARY_FILENAME, json)?;
        Ok(path)
    }

    pub fn log(&self) {
        let elapsed = self.finished_at - self.started_at;
        crawl_info!(
            "crawl finished in {}s: {} record(s) across {} brand(s)",
            elapsed.num_seconds(),
            self.records_written,
            self.categories.len()
        );
        for summary in self.categories.iter().filter(|s| !s.is_clean()) {
            crawl_warn!(
                "[{}] {} listing(s) skipped, {} detail page(s) failed{}{}",
                summary.category.to_uppercase(),
                summary.skipped_listings.len(),
                summary.failed_details.len(),
                summary
                    .root_skipped
                    .as_ref()
                    .map(|s| format!(", root skipped: {}", s.reason))
                    .unwrap_or_default(),
                summary
                    .stopped
                    .map(|reason| format!(", stopped early: {reason:?}"))
                    .unwrap_or_default()
            );
        }
    }
}

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::state::CrawlPhase;

/// A URL that was skipped or failed, with the reason in plain words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub url: String,
    pub reason: String,
}

impl SkippedItem {
    pub fn new(url: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Why a category stopped before attempting every detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    Deadline,
    Cancelled,
}

/// Outcome of one category's crawl pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub output_path: PathBuf,
    pub phase: CrawlPhase,
    pub listings_found: usize,
    pub details_found: usize,
    pub records_written: usize,
    /// Set when the category root yielded no listing pages (fetch or parse
    /// failure, or no section passing the classification filter).
    pub root_skipped: Option<SkippedItem>,
    /// Listing pages that yielded no detail links (fetch failure or no model years).
    pub skipped_listings: Vec<SkippedItem>,
    /// Detail pages that produced no row.
    pub failed_details: Vec<SkippedItem>,
    pub stopped: Option<StopReason>,
}

impl CategorySummary {
    pub fn new(category: impl Into<String>, output_path: PathBuf) -> Self {
        Self {
            category: category.into(),
            output_path,
            phase: CrawlPhase::default(),
            listings_found: 0,
            details_found: 0,
            records_written: 0,
            root_skipped: None,
            skipped_listings: Vec::new(),
            failed_details: Vec::new(),
            stopped: None,
        }
    }

    /// True when every discovered item was handled without a warning.
    pub fn is_clean(&self) -> bool {
        self.root_skipped.is_none()
            && self.skipped_listings.is_empty()
            && self.failed_details.is_empty()
            && self.stopped.is_none()
    }
}

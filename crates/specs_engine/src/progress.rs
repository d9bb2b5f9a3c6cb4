use std::sync::mpsc;

use crawl_logging::{crawl_debug, crawl_info};
use specs_core::CrawlPhase;

use crate::CrawlEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: CrawlEvent);
}

/// Forwards every event to a channel; a dropped receiver is ignored.
pub struct ChannelProgressSink {
    tx: mpsc::Sender<CrawlEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<CrawlEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: CrawlEvent) {
        let _ = self.tx.send(event);
    }
}

/// Operator console progress, one line per phase and per finished category.
/// Skips and failures are already logged as warnings where they happen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: CrawlEvent) {
        match event {
            CrawlEvent::PhaseEntered {
                category,
                phase,
                pending,
            } => {
                let tag = category.to_uppercase();
                let pending = pending.unwrap_or(0);
                match phase {
                    CrawlPhase::DiscoveringListings => {
                        crawl_info!("[+][{}] Gathering all model links...", tag)
                    }
                    CrawlPhase::DiscoveringDetails => crawl_info!(
                        "[+][{}] Gathering all specs links from {} model page(s)...",
                        tag,
                        pending
                    ),
                    CrawlPhase::ExtractingAndWriting => crawl_info!(
                        "[+][{}] Starting scraping data for {} link(s)",
                        tag,
                        pending
                    ),
                    CrawlPhase::Done => {}
                }
            }
            CrawlEvent::RecordWritten { category, url } => {
                crawl_debug!("[+][{}] wrote {}", category.to_uppercase(), url)
            }
            CrawlEvent::CategoryFinished(summary) => crawl_info!(
                "[+][{}] Finished scraping: {} of {} record(s) written to {:?}",
                summary.category.to_uppercase(),
                summary.records_written,
                summary.details_found,
                summary.output_path
            ),
            CrawlEvent::ListingSkipped { .. } | CrawlEvent::DetailFailed { .. } => {}
        }
    }
}

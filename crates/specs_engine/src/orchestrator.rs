use std::sync::Arc;
use std::time::Duration;

use crawl_logging::{crawl_error, crawl_warn};
use specs_core::{CategorySummary, CrawlConfig, CrawlPhase, Link, SkippedItem, StopReason};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::fetch::Fetcher;
use crate::links::{fetch_detail_links, fetch_listing_links};
use crate::progress::ProgressSink;
use crate::record::fetch_record;
use crate::writer::IncrementalWriter;
use crate::CrawlEvent;

/// Runs the three extraction stages for one category, strictly in sequence,
/// and writes each record as soon as it is extracted.
///
/// A failure on one listing or detail page is recorded in the summary and the
/// loop moves on; `run` always ends in [`CrawlPhase::Done`].
pub struct CategoryCrawler {
    fetcher: Arc<dyn Fetcher>,
    config: Arc<CrawlConfig>,
    writer: IncrementalWriter,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
    deadline: Option<Duration>,
}

impl CategoryCrawler {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        config: Arc<CrawlConfig>,
        writer: IncrementalWriter,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            fetcher,
            config,
            writer,
            sink,
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Stop starting new fetches once `deadline` has elapsed for a category.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn run(&self, category: &str) -> CategorySummary {
        let mut run = CategoryRun {
            summary: CategorySummary::new(category, self.writer.path_for(category)),
            deadline: self.deadline.map(|d| Instant::now() + d),
        };

        self.enter(&mut run, CrawlPhase::DiscoveringListings, None);
        let listings = self.discover_listings(&mut run).await;

        self.enter(&mut run, CrawlPhase::DiscoveringDetails, Some(listings.len()));
        let details = self.discover_details(&mut run, &listings).await;

        self.enter(&mut run, CrawlPhase::ExtractingAndWriting, Some(details.len()));
        self.extract_and_write(&mut run, &details).await;

        self.enter(&mut run, CrawlPhase::Done, None);
        self.sink
            .emit(CrawlEvent::CategoryFinished(run.summary.clone()));
        run.summary
    }

    fn enter(&self, run: &mut CategoryRun, phase: CrawlPhase, pending: Option<usize>) {
        debug_assert!(phase == run.summary.phase || phase == run.summary.phase.next());
        run.summary.phase = phase;
        self.sink.emit(CrawlEvent::PhaseEntered {
            category: run.summary.category.clone(),
            phase,
            pending,
        });
    }

    async fn discover_listings(&self, run: &mut CategoryRun) -> Vec<Link> {
        if self.should_stop(run) {
            return Vec::new();
        }
        let category = run.summary.category.clone();
        let root = Link::category_root(self.config.category_root_url(&category));

        match fetch_listing_links(self.fetcher.as_ref(), &self.config, &category).await {
            Ok(links) if links.is_empty() => {
                crawl_warn!(
                    "[{}] no {:?} sections found at {} - skipping",
                    category.to_uppercase(),
                    self.config.classification.token,
                    root
                );
                run.summary.root_skipped = Some(SkippedItem::new(
                    &root.url,
                    format!(
                        "no section matching {:?}",
                        self.config.classification.token
                    ),
                ));
                Vec::new()
            }
            Ok(links) => {
                run.summary.listings_found = links.len();
                links
            }
            Err(err) => {
                crawl_warn!("[{}] category root {} unusable: {}", category.to_uppercase(), root, err);
                run.summary.root_skipped = Some(SkippedItem::new(&root.url, &err));
                Vec::new()
            }
        }
    }

    async fn discover_details(&self, run: &mut CategoryRun, listings: &[Link]) -> Vec<Link> {
        let mut details = Vec::new();
        for listing in listings {
            if self.should_stop(run) {
                break;
            }
            let reason = match fetch_detail_links(self.fetcher.as_ref(), &self.config, listing).await {
                Ok(links) if !links.is_empty() => {
                    details.extend(links);
                    continue;
                }
                Ok(_) => "no model years listed".to_string(),
                Err(err) => err.to_string(),
            };
            crawl_warn!(
                "[{}] no specs links from {}: {}",
                run.summary.category.to_uppercase(),
                listing,
                reason
            );
            run.summary
                .skipped_listings
                .push(SkippedItem::new(&listing.url, &reason));
            self.sink.emit(CrawlEvent::ListingSkipped {
                category: run.summary.category.clone(),
                url: listing.url.clone(),
                reason,
            });
        }
        run.summary.details_found = details.len();
        details
    }

    async fn extract_and_write(&self, run: &mut CategoryRun, details: &[Link]) {
        let category = run.summary.category.clone();
        for detail in details {
            if self.should_stop(run) {
                break;
            }
            let outcome = match fetch_record(self.fetcher.as_ref(), &self.config, &detail.url).await {
                Ok(record) => self
                    .writer
                    .append(&category, &record)
                    .map_err(|err| {
                        crawl_error!("[{}] failed to write {}: {}", category.to_uppercase(), detail, err);
                        format!("write failed: {err}")
                    }),
                Err(err) => {
                    crawl_warn!("[{}] skipping {}: {}", category.to_uppercase(), detail, err);
                    Err(err.to_string())
                }
            };

            match outcome {
                Ok(_) => {
                    run.summary.records_written += 1;
                    self.sink.emit(CrawlEvent::RecordWritten {
                        category: category.clone(),
                        url: detail.url.clone(),
                    });
                }
                Err(reason) => {
                    run.summary
                        .failed_details
                        .push(SkippedItem::new(&detail.url, &reason));
                    self.sink.emit(CrawlEvent::DetailFailed {
                        category: category.clone(),
                        url: detail.url.clone(),
                        reason,
                    });
                }
            }
        }
    }

    // Checked before every fetch; records the first reason seen.
    fn should_stop(&self, run: &mut CategoryRun) -> bool {
        if run.summary.stopped.is_some() {
            return true;
        }
        let reason = if self.cancel.is_cancelled() {
            StopReason::Cancelled
        } else if run.deadline.is_some_and(|d| Instant::now() >= d) {
            StopReason::Deadline
        } else {
            return false;
        };
        crawl_warn!(
            "[{}] stopping early ({:?}) during {}",
            run.summary.category.to_uppercase(),
            reason,
            run.summary.phase
        );
        run.summary.stopped = Some(reason);
        true
    }
}

struct CategoryRun {
    summary: CategorySummary,
    deadline: Option<Instant>,
}

//! Vehicle specs engine: page fetching, extraction, CSV persistence and the
//! per-category crawl pipeline.
mod decode;
mod document;
mod engine;
mod fetch;
mod filename;
mod links;
mod orchestrator;
mod progress;
mod record;
mod resilience;
mod types;
mod writer;

pub use decode::{decode_body, DecodedBody};
pub use document::{parse_document, DocumentView, NodeHandle, ParseError, Query, ScraperDocument};
pub use engine::{CrawlEngine, EngineConfig, EngineError};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use filename::category_filename;
pub use links::{detail_links_from, fetch_detail_links, fetch_listing_links, listing_links_from};
pub use orchestrator::CategoryCrawler;
pub use progress::{ChannelProgressSink, LogProgressSink, ProgressSink};
pub use record::{fetch_record, record_from};
pub use resilience::{LimitedFetcher, RetryPolicy, RetryingFetcher};
pub use types::{CrawlEvent, ExtractError, FailureKind, FetchError, FetchedPage};
pub use writer::IncrementalWriter;

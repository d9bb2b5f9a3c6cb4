//! Vehicle specs core: schema, records, crawl configuration, the per-category
//! phase machine and atomic file output shared by the crawl and ranking stages.
mod config;
mod link;
mod persist;
mod record;
mod schema;
mod state;
mod summary;

pub use config::{ClassificationFilter, ConfigError, CrawlConfig, SiteLayout};
pub use link::{Link, LinkRole};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use record::{RecordBuilder, VehicleRecord};
pub use schema::{normalize_label, FieldSchema, SEED_FIELDS};
pub use state::CrawlPhase;
pub use summary::{CategorySummary, SkippedItem, StopReason};

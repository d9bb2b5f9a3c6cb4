use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-category crawl phases. Transitions are strictly forward; a failure on
/// one item never moves the machine anywhere but to the next phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrawlPhase {
    #[default]
    DiscoveringListings,
    DiscoveringDetails,
    ExtractingAndWriting,
    Done,
}

impl CrawlPhase {
    /// Next phase; `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            CrawlPhase::DiscoveringListings => CrawlPhase::DiscoveringDetails,
            CrawlPhase::DiscoveringDetails => CrawlPhase::ExtractingAndWriting,
            CrawlPhase::ExtractingAndWriting | CrawlPhase::Done => CrawlPhase::Done,
        }
    }

    pub fn is_done(self) -> bool {
        self == CrawlPhase::Done
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CrawlPhase::DiscoveringListings => "discovering listings",
            CrawlPhase::DiscoveringDetails => "discovering details",
            CrawlPhase::ExtractingAndWriting => "extracting and writing",
            CrawlPhase::Done => "done",
        };
        f.write_str(label)
    }
}

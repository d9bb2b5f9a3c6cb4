use std::fmt;

use specs_core::{CategorySummary, CrawlPhase};
use thiserror::Error;

use crate::document::ParseError;

/// Decoded page body plus what we learned about the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub encoding: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl FailureKind {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            FailureKind::Network | FailureKind::Timeout => true,
            FailureKind::HttpStatus(code) => *code == 429 || (500..600).contains(code),
            _ => false,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => f.write_str("malformed url"),
            FailureKind::HttpStatus(code) => write!(f, "server answered {code}"),
            FailureKind::Timeout => f.write_str("timed out"),
            FailureKind::RedirectLimitExceeded => f.write_str("too many redirects"),
            FailureKind::TooLarge {
                max_bytes,
                actual: Some(actual),
            } => write!(f, "body of {actual} bytes exceeds the {max_bytes} byte cap"),
            FailureKind::TooLarge { max_bytes, .. } => {
                write!(f, "body exceeds the {max_bytes} byte cap")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "served as {content_type}, not html")
            }
            FailureKind::Network => f.write_str("connection failed"),
        }
    }
}

/// Why a single page did not yield what the stage needed from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
    #[error("required field {field:?} missing on {url}")]
    SchemaMismatch { field: String, url: String },
}

/// Progress notifications emitted while a category is crawled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    PhaseEntered {
        category: String,
        phase: CrawlPhase,
        /// Items the phase is about to work through, when known.
        pending: Option<usize>,
    },
    ListingSkipped {
        category: String,
        url: String,
        reason: String,
    },
    DetailFailed {
        category: String,
        url: String,
        reason: String,
    },
    RecordWritten {
        category: String,
        url: String,
    },
    CategoryFinished(CategorySummary),
}

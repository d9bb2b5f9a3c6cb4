use std::sync::Arc;
use std::time::Duration;

use crawl_logging::{crawl_debug, crawl_warn};
use futures_util::StreamExt;
use reqwest::{header, Response, Url};

use crate::decode::decode_body;
use crate::{FailureKind, FetchError, FetchedPage};

const USER_AGENT: &str = concat!("vehicle-specs/", env!("CARGO_PKG_VERSION"));

/// Limits applied to every catalog request.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Whole request, body included.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    /// Largest body accepted, checked against `Content-Length` and while streaming.
    pub max_bytes: u64,
    /// Media types (without parameters) a page may be served as.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: ["text/html", "application/xhtml+xml"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// The single point of network I/O: URL in, decoded page body out.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

#[async_trait::async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        (**self).fetch(url).await
    }
}

/// Plain HTTP GET over one shared `reqwest::Client`, whose connection pool
/// serves every category. No retries here.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    /// Status, declared size and media type; returns the `Content-Type` header.
    fn check_response(&self, response: &Response) -> Result<Option<String>, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(declared) = response.content_length() {
            self.ensure_within_cap(declared)?;
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        match content_type.as_deref() {
            Some(ct) if !self.accepts(ct) => Err(FetchError::new(
                FailureKind::UnsupportedContentType {
                    content_type: ct.to_owned(),
                },
                "not an html page",
            )),
            _ => Ok(content_type),
        }
    }

    fn accepts(&self, content_type: &str) -> bool {
        let media_type = content_type
            .split_once(';')
            .map_or(content_type, |(media, _)| media)
            .trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(media_type))
    }

    fn ensure_within_cap(&self, len: u64) -> Result<(), FetchError> {
        if len <= self.settings.max_bytes {
            return Ok(());
        }
        Err(FetchError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(len),
            },
            "response too large",
        ))
    }

    // Length is re-checked against the cap after every chunk.
    async fn read_body(&self, response: Response) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            self.ensure_within_cap((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let target = Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        crawl_debug!("GET {}", target);
        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let content_type = self.check_response(&response)?;
        let final_url = response.url().to_string();
        let raw = self.read_body(response).await?;

        let decoded = decode_body(&raw, content_type.as_deref());
        if decoded.had_errors {
            crawl_warn!(
                "{} is not valid {}; malformed bytes replaced",
                url,
                decoded.encoding_label
            );
        }

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            content_type,
            encoding: decoded.encoding_label,
            body: decoded.text,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}

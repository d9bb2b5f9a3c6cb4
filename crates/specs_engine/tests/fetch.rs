use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use specs_engine::{
    FailureKind, FetchError, FetchSettings, FetchedPage, Fetcher, LimitedFetcher, ReqwestFetcher,
    RetryPolicy, RetryingFetcher,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("client builds")
}

fn quick_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn fetcher_returns_decoded_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acura"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/acura", server.uri());
    let page = fetcher(FetchSettings::default()).fetch(&url).await.unwrap();

    assert_eq!(page.url, url);
    assert_eq!(page.final_url, url);
    assert_eq!(page.body, "<html>ok</html>");
    assert_eq!(page.encoding, "UTF-8");
    assert!(page.content_type.unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn declared_legacy_charset_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/citroen"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"Citro\xebn".to_vec(), "text/html; charset=windows-1252"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/citroen", server.uri());
    let page = fetcher(FetchSettings::default()).fetch(&url).await.unwrap();
    assert_eq!(page.body, "Citroën");
    assert_eq!(page.encoding, "windows-1252");
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = fetcher(FetchSettings::default()).fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert!(!err.kind.is_retryable());
}

#[tokio::test]
async fn fetcher_rejects_invalid_url() {
    let err = fetcher(FetchSettings::default())
        .fetch("not a url")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("slow", "text/html"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let url = format!("{}/slow", server.uri());
    let err = fetcher(settings).fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert!(err.kind.is_retryable());
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("01234567890", "text/html"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let url = format!("{}/large", server.uri());
    let err = fetcher(settings).fetch(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_non_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let url = format!("{}/feed", server.uri());
    let err = fetcher(FetchSettings::default()).fetch(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "application/json".to_string()
        }
    );
}

#[tokio::test]
async fn retry_recovers_from_transient_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>back</p>", "text/html"))
        .mount(&server)
        .await;

    let retrying = RetryingFetcher::new(fetcher(FetchSettings::default()), quick_retry());
    let url = format!("{}/flaky", server.uri());
    let page = retrying.fetch(&url).await.unwrap();

    assert_eq!(page.body, "<p>back</p>");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn retry_gives_up_after_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let retrying = RetryingFetcher::new(fetcher(FetchSettings::default()), quick_retry());
    let url = format!("{}/down", server.uri());
    let err = retrying.fetch(&url).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(502));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn permanent_failures_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let retrying = RetryingFetcher::new(fetcher(FetchSettings::default()), quick_retry());
    let url = format!("{}/gone", server.uri());
    let err = retrying.fetch(&url).await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

/// Records how many fetches overlap.
#[derive(Default)]
struct SlowFetcher {
    active: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait::async_trait]
impl Fetcher for SlowFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(FetchedPage {
            url: url.to_string(),
            final_url: url.to_string(),
            content_type: None,
            encoding: "UTF-8".to_string(),
            body: String::new(),
        })
    }
}

#[tokio::test]
async fn limited_fetcher_caps_requests_in_flight() {
    let inner = Arc::new(SlowFetcher::default());
    let limited = LimitedFetcher::new(Arc::clone(&inner), 2);

    let urls: Vec<String> = (0..6).map(|i| format!("https://x/{i}")).collect();
    let results = join_all(urls.iter().map(|url| limited.fetch(url))).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(inner.peak.load(Ordering::SeqCst), 2);
    assert_eq!(limited.available_permits(), 2);
}

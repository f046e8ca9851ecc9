use stadtfeed::fetcher::{FetchError, FetchSettings, HttpFetcher, PageFetcher};
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn fetcher(retries: u32) -> HttpFetcher {
    HttpFetcher::new(&FetchSettings {
        retries,
        retry_delay: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{route}", server.uri())).unwrap()
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/aktuelles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html><body><h2>Meldung</h2></body></html>".as_bytes())
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = fetcher(3)
        .fetch_html(&url(&mock_server, "/aktuelles"))
        .await
        .unwrap();

    assert!(body.contains("<h2>Meldung</h2>"));
}

#[tokio::test]
async fn test_fetch_404_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fehlt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = fetcher(3).fetch_html(&url(&mock_server, "/fehlt")).await;

    match result {
        Err(FetchError::Http { status, retriable }) => {
            assert_eq!(status.as_u16(), 404);
            assert!(!retriable);
        }
        other => panic!("Expected HTTP 404 error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_500_retried_until_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wackelig"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wackelig"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html><body>Endlich</body></html>".as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let body = fetcher(3)
        .fetch_html(&url(&mock_server, "/wackelig"))
        .await
        .unwrap();

    assert!(body.contains("Endlich"));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_fetch_500_gives_up_after_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/kaputt"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let result = fetcher(2).fetch_html(&url(&mock_server, "/kaputt")).await;

    match result {
        Err(FetchError::Http { status, retriable }) => {
            assert_eq!(status.as_u16(), 503);
            assert!(retriable);
        }
        other => panic!("Expected HTTP 503 error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/langsam"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html></html>".as_bytes())
                .insert_header("Content-Type", "text/html")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&FetchSettings {
        retries: 0,
        retry_delay: Duration::from_millis(10),
        timeout: Duration::from_millis(200),
    })
    .unwrap();

    let result = fetcher.fetch_html(&url(&mock_server, "/langsam")).await;

    assert!(matches!(result, Err(FetchError::RequestTimeout)), "{result:?}");
}

#[tokio::test]
async fn test_fetch_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alt"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/neu"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/neu"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html><body>Neue Adresse</body></html>".as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let body = fetcher(0).fetch_html(&url(&mock_server, "/alt")).await.unwrap();

    assert!(body.contains("Neue Adresse"));
}

#[tokio::test]
async fn test_fetch_gzip_compression() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let original_content = "<html><body>Dieser Inhalt ist komprimiert!</body></html>";

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(original_content.as_bytes()).unwrap();
    let compressed_data = encoder.finish().unwrap();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gzipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed_data)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let body = fetcher(0)
        .fetch_html(&url(&mock_server, "/gzipped"))
        .await
        .unwrap();

    assert!(body.contains("Dieser Inhalt ist komprimiert!"));
}

#[tokio::test]
async fn test_fetch_latin1_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"<html><body>Gr\xfc\xdfe aus der Stra\xdfe</body></html>".to_vec())
                .insert_header("Content-Type", "text/html; charset=ISO-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let body = fetcher(0)
        .fetch_html(&url(&mock_server, "/latin1"))
        .await
        .unwrap();

    assert!(body.contains("Grüße aus der Straße"));
}

#[tokio::test]
async fn test_fetch_unsupported_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bild"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0xFF, 0xD8, 0xFF]) // JPEG header
                .insert_header("Content-Type", "image/jpeg"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = fetcher(3).fetch_html(&url(&mock_server, "/bild")).await;

    match result {
        Err(FetchError::UnsupportedContentType(content_type)) => {
            assert_eq!(content_type, "image/jpeg");
        }
        other => panic!("Expected UnsupportedContentType error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_body_too_large() {
    let mock_server = MockServer::start().await;

    // 6MB > 5MB limit
    let large_body = "x".repeat(6 * 1024 * 1024);

    Mock::given(method("GET"))
        .and(path("/gross"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(large_body.as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let result = fetcher(0).fetch_html(&url(&mock_server, "/gross")).await;

    match result {
        Err(FetchError::BodyTooLarge(size)) => {
            assert_eq!(size, 6 * 1024 * 1024);
        }
        other => panic!("Expected BodyTooLarge error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_retry_classification() {
    assert!(!FetchError::BodyTooLarge(1000).should_retry());
    assert!(!FetchError::UnsupportedContentType("image/png".to_string()).should_retry());
    assert!(!FetchError::Client("bad tls config".to_string()).should_retry());

    assert!(FetchError::Connect("connection refused".to_string()).should_retry());
    assert!(FetchError::ConnectTimeout.should_retry());
    assert!(FetchError::RequestTimeout.should_retry());

    assert!(!FetchError::from_status(reqwest::StatusCode::NOT_FOUND).should_retry());
    assert!(FetchError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS).should_retry());
    assert!(FetchError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR).should_retry());
}

use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

use stadtfeed::{
    extractor::ReadabilityReader,
    fetcher::{FetchSettings, HttpFetcher},
    listing::ListingSelectors,
    pipeline::{Pipeline, PipelineSettings},
    tracking::JsonFileRepository,
};

pub const LISTING: &str = r#"<!DOCTYPE html>
<html lang="de"><head><meta charset="utf-8"><title>Aktuelles</title></head>
<body>
  <header><nav><a href="/">Startseite</a></nav></header>
  <main>
    <ul class="newslist">
      <li class="news-item">
        <h3 class="news-title">Gemeinderat beschließt Haushalt</h3>
        <a href="/aktuelles/haushalt">Weiterlesen</a>
        <p class="news-teaser">Der Doppelhaushalt ist verabschiedet.</p>
        <time datetime="2025-12-09">9. Dezember 2025</time>
      </li>
      <li class="news-item">
        <h3 class="news-title">Weihnachtsmarkt öffnet</h3>
        <a href="aktuelles/weihnachtsmarkt">Weiterlesen</a>
        <span class="news-date">27. November 2025</span>
      </li>
      <li class="news-item">
        <h3 class="news-title">Sperrung der Kriegsstraße</h3>
        <a href="/aktuelles/sperrung">Weiterlesen</a>
        <span class="news-date">01.12.2025</span>
      </li>
    </ul>
  </main>
  <footer>Impressum</footer>
</body></html>"#;

pub fn detail_page(headline: &str, paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
    format!(
        r#"<!DOCTYPE html><html lang="de"><head><title>{headline}</title>
<script>trackVisit();</script></head>
<body><nav><a href="/">Startseite</a> | <a href="/aktuelles">Aktuelles</a></nav>
<article><h1>{headline}</h1>{body}</article>
<footer>Impressum | Datenschutz</footer></body></html>"#
    )
}

pub async fn mount_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(html.into_bytes())
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

pub fn pipeline(server: &MockServer, feed_path: &std::path::Path, tracking_path: &std::path::Path) -> Pipeline {
    let fetcher = HttpFetcher::new(&FetchSettings {
        retries: 1,
        retry_delay: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    Pipeline::new(
        Arc::new(fetcher),
        Arc::new(ReadabilityReader),
        Arc::new(JsonFileRepository::new(tracking_path)),
        ListingSelectors::default(),
        PipelineSettings {
            listing_url: Url::parse(&format!("{}/aktuelles", server.uri())).unwrap(),
            feed_path: feed_path.to_path_buf(),
            feed_title: "Stadt Karlsruhe – Aktuelles".to_string(),
            max_items: 50,
            concurrency: 2,
        },
    )
}

use std::fs;
use url::Url;

use crate::extractor::{ExtractError, ReadabilityReader, Reader, ReaderOutput, extract};

/// Reader returning a fixed result, so each strategy can be driven directly.
struct StubReader(Option<ReaderOutput>);

impl Reader for StubReader {
    fn parse(&self, _html: &str, _url: &Url) -> Option<ReaderOutput> {
        self.0.clone()
    }
}

fn html_reader(html: &str) -> StubReader {
    StubReader(Some(ReaderOutput {
        title: None,
        content_html: Some(html.to_string()),
        text_content: None,
    }))
}

fn text_reader(text: &str) -> StubReader {
    StubReader(Some(ReaderOutput {
        title: None,
        content_html: None,
        text_content: Some(text.to_string()),
    }))
}

fn page_url() -> Url {
    Url::parse("https://www.karlsruhe.de/aktuelles/meldung-4711.html").unwrap()
}

const PAGE: &str = "<html><body><article><p>Strukturell gefundener Artikeltext über den Gemeinderat.</p></article></body></html>";

#[test]
fn test_extract_article_fixture() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/article.html")
        .expect("Failed to read test fixture");

    let content = extract(&html, &page_url(), &ReadabilityReader).unwrap();

    assert!(content.contains("Radverkehrsplan"));
    assert!(content.contains("ersten Bauabschnitte"));
    assert!(content.contains("https://www.karlsruhe.de/verkehr/radverkehrsplan"));
    assert!(!content.contains("<script"));
    assert!(!content.contains("<style"));
    assert!(!content.contains("<nav"));
    assert!(!content.contains("Werbung"));
    assert!(!content.contains("Impressum"));
    assert!(!content.contains("onclick"));
    assert!(!content.contains("onerror"));
    assert!(!content.contains("style="));
}

#[test]
fn test_extract_layout_only_fixture() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/layout_only.html")
        .expect("Failed to read test fixture");

    let content = extract(&html, &page_url(), &StubReader(None)).unwrap();

    assert!(content.contains("Sperrung der Kriegsstraße"));
    assert!(!content.contains("Aktuelles"));
    assert!(!content.contains("Impressum"));
    assert!(!content.contains("style="));
}

#[test]
fn test_reject_empty_page_fixture() {
    let html = fs::read_to_string("src/extractor/tests/fixtures/empty.html")
        .expect("Failed to read test fixture");

    let result = extract(&html, &page_url(), &ReadabilityReader);

    assert_eq!(
        result,
        Err(ExtractError::ExtractionFailed {
            url: page_url().to_string()
        })
    );
}

#[test]
fn test_empty_input() {
    assert_eq!(
        extract(" \n\t", &page_url(), &StubReader(None)),
        Err(ExtractError::EmptyInput)
    );
}

#[test]
fn test_reader_paragraphs_are_preserved() {
    let reader = html_reader(
        "<div><p>Erster Absatz über die Innenstadt.</p><p>Zweiter Absatz über den Zoo.</p></div>",
    );

    let content = extract(PAGE, &page_url(), &reader).unwrap();

    assert!(content.contains("<p>Erster Absatz über die Innenstadt.</p>"));
    assert!(content.contains("<p>Zweiter Absatz über den Zoo.</p>"));
    assert!(!content.contains("Strukturell"));
}

#[test]
fn test_reader_plain_text_becomes_paragraphs() {
    let reader = text_reader("Erster Block mit Text.\n\nZweiter Block hier.\n\n\nDritter   Block\n ist da.");

    let content = extract(PAGE, &page_url(), &reader).unwrap();

    assert_eq!(
        content,
        "<p>Erster Block mit Text.</p><p>Zweiter Block hier.</p><p>Dritter Block ist da.</p>"
    );
}

#[test]
fn test_reader_output_is_sanitized() {
    let reader = html_reader(
        r#"<p onclick="steal()" style="color:red">Hallo Karlsruhe, dies ist ein Test.</p><p>   </p><script>alert(1)</script><style>p{}</style>"#,
    );

    let content = extract(PAGE, &page_url(), &reader).unwrap();

    assert_eq!(content, "<p>Hallo Karlsruhe, dies ist ein Test.</p>");
}

#[test]
fn test_short_reader_content_falls_back_to_structure() {
    let reader = html_reader("<p>Kurz</p>");

    let content = extract(PAGE, &page_url(), &reader).unwrap();

    assert!(content.contains("Strukturell gefundener Artikeltext"));
}

#[test]
fn test_wordless_reader_content_falls_back_to_structure() {
    let reader = html_reader("<p>!! -- ?? ... ** ## !! -- ?? .. 12 34 56</p>");

    let content = extract(PAGE, &page_url(), &reader).unwrap();

    assert!(content.contains("Strukturell gefundener Artikeltext"));
}

#[test]
fn test_short_reader_text_falls_back_to_structure() {
    let reader = text_reader("zu kurz");

    let content = extract(PAGE, &page_url(), &reader).unwrap();

    assert!(content.contains("Strukturell gefundener Artikeltext"));
}

#[test]
fn test_nothing_valid_fails() {
    let html = "<html><body><p>kurz</p></body></html>";

    assert_eq!(
        extract(html, &page_url(), &html_reader("<p>auch kurz</p>")),
        Err(ExtractError::ExtractionFailed {
            url: page_url().to_string()
        })
    );
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Kaputt</title><body><p>Nicht geschlossene Tags gibt es hier<div>Und noch mehr Inhalt";

    let content = extract(html, &page_url(), &StubReader(None)).unwrap();

    assert!(content.contains("Nicht geschlossene Tags"));
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = extract(&html, &page_url(), &ReadabilityReader);
        }

        #[test]
        fn test_output_never_has_scripts(body in "[a-zA-Z <>/=\"]{0,200}") {
            let html = format!("<html><body><main>{body}<script>x()</script></main></body></html>");
            if let Ok(content) = extract(&html, &page_url(), &StubReader(None)) {
                prop_assert!(!content.contains("<script"));
            }
        }
    }
}

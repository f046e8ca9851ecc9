use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static HEADER_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>;]+)"#).unwrap());

/// Bytes inspected for `<meta>` declarations and heuristic detection.
const SNIFF_LEN: usize = 4096;

/// Decode a response body to UTF-8.
///
/// The charset comes from the `Content-Type` header, then a `<meta>`
/// declaration near the top of the document, then `chardetng` detection.
/// Undecodable sequences are replaced rather than failing the fetch.
pub fn decode_body(content_type: &str, body: &[u8]) -> String {
    let encoding = detect_encoding(content_type, body);
    let (decoded, used, had_errors) = encoding.decode(body);
    if had_errors {
        warn!(encoding = used.name(), "Body contained invalid sequences, replaced");
    }
    decoded.into_owned()
}

pub fn detect_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    if let Some(encoding) = label_encoding(&HEADER_CHARSET_REGEX, content_type) {
        return encoding;
    }

    let head = &body[..body.len().min(SNIFF_LEN)];
    if let Some(encoding) = label_encoding(&META_CHARSET_REGEX, &String::from_utf8_lossy(head)) {
        return encoding;
    }

    if std::str::from_utf8(body).is_ok() {
        return UTF_8;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(head, body.len() <= SNIFF_LEN);
    detector.guess(Some(b"de".as_slice()), true)
}

fn label_encoding(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

//! Atom 1.0 rendering of the article collection.

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

use crate::article::Article;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const GENERATOR: &str = "stadtfeed";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to write feed xml: {0}")]
    Xml(String),

    #[error("feed file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Feed-level metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedMeta {
    pub title: String,
    /// Page the feed mirrors. Doubles as the feed id.
    pub link: Url,
    /// Fallback for `<updated>` when there are no entries.
    pub generated_at: DateTime<Utc>,
}

/// Render `articles` in the given order as an Atom document.
pub fn render_atom(meta: &FeedMeta, articles: &[Article]) -> Result<String, FeedError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_error)?;

    let mut feed = BytesStart::new("feed");
    feed.push_attribute(("xmlns", ATOM_NS));
    writer.write_event(Event::Start(feed)).map_err(xml_error)?;

    let updated = articles
        .iter()
        .map(|a| a.date.with_timezone(&Utc))
        .max()
        .unwrap_or(meta.generated_at);

    write_text(&mut writer, "id", meta.link.as_str())?;
    write_text(&mut writer, "title", &meta.title)?;
    write_link(&mut writer, &meta.link)?;
    write_text(&mut writer, "updated", &timestamp(&updated))?;
    write_text(&mut writer, "generator", GENERATOR)?;

    for article in articles {
        write_entry(&mut writer, article)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("feed")))
        .map_err(xml_error)?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    String::from_utf8(out).map_err(xml_error)
}

/// Render and write the feed, creating parent directories as needed.
#[instrument(skip_all, fields(path = %path.display(), entries = articles.len()))]
pub async fn write_atom(path: &Path, meta: &FeedMeta, articles: &[Article]) -> Result<(), FeedError> {
    let xml = render_atom(meta, articles)?;
    let io_error = |source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    fs::write(path, xml.as_bytes()).await.map_err(io_error)?;

    info!(bytes = xml.len(), "Wrote feed");
    Ok(())
}

fn write_entry<W: Write>(writer: &mut Writer<W>, article: &Article) -> Result<(), FeedError> {
    writer
        .write_event(Event::Start(BytesStart::new("entry")))
        .map_err(xml_error)?;

    let published = timestamp(&article.date.with_timezone(&Utc));
    write_text(writer, "id", &format!("urn:md5:{}", article.id))?;
    write_text(writer, "title", &article.title)?;
    write_link(writer, &article.link)?;
    write_text(writer, "published", &published)?;
    write_text(writer, "updated", &published)?;
    write_text(writer, "summary", &article.description)?;

    let mut content = BytesStart::new("content");
    content.push_attribute(("type", "html"));
    writer.write_event(Event::Start(content)).map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(&xml_safe(&article.content))))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("content")))
        .map_err(xml_error)?;

    writer
        .write_event(Event::End(BytesEnd::new("entry")))
        .map_err(xml_error)?;
    Ok(())
}

fn write_text<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<(), FeedError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(&xml_safe(text))))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)?;
    Ok(())
}

fn write_link<W: Write>(writer: &mut Writer<W>, href: &Url) -> Result<(), FeedError> {
    let mut link = BytesStart::new("link");
    link.push_attribute(("rel", "alternate"));
    link.push_attribute(("href", href.as_str()));
    writer.write_event(Event::Empty(link)).map_err(xml_error)
}

fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Drop control characters XML 1.0 cannot carry.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .collect()
}

fn xml_error(err: impl std::fmt::Display) -> FeedError {
    FeedError::Xml(err.to_string())
}

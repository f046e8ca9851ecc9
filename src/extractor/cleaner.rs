use ammonia::{Builder, UrlRelative};
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink;
use url::Url;

/// Elements dropped together with everything inside them.
pub const DISALLOWED_TAGS: [&str; 7] = [
    "script", "style", "nav", "iframe", "noscript", "footer", "header",
];

/// Sanitize candidate article HTML.
///
/// Disallowed elements are removed with their content. Ammonia's attribute
/// allow-list drops every `on*` handler and `style` attribute, and relative
/// `href`/`src` values are rewritten against `base_url`. Paragraphs left
/// without text are removed last.
pub fn sanitize(html: &str, base_url: &Url) -> String {
    let mut builder = Builder::default();
    builder
        .rm_tags(&["nav", "footer", "header"])
        .add_clean_content_tags(&DISALLOWED_TAGS)
        .url_relative(UrlRelative::RewriteWithBase(base_url.clone()));
    let clean_html = builder.clean(html).to_string();

    remove_empty_paragraphs(&clean_html)
}

/// Detach every disallowed element below `root`.
pub fn strip_disallowed(root: &NodeRef) {
    let Ok(matches) = root.select(&DISALLOWED_TAGS.join(", ")) else {
        return;
    };
    let doomed: Vec<_> = matches.collect();
    for element in doomed {
        element.as_node().detach();
    }
}

/// Serialized children of `node`.
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

fn remove_empty_paragraphs(html: &str) -> String {
    let document = kuchiki::parse_html().one(html);

    if let Ok(paragraphs) = document.select("p") {
        let empty: Vec<_> = paragraphs
            .filter(|p| p.as_node().text_contents().trim().is_empty())
            .collect();
        for p in empty {
            p.as_node().detach();
        }
    }

    match document.select_first("body") {
        Ok(body) => inner_html(body.as_node()),
        Err(()) => inner_html(&document),
    }
}

//! Markup mode
//!
//! Single regex pass over `<img>` elements, reading the URL attribute plus
//! the metadata attributes the callers actually send. Elements without a
//! `src` are skipped, not errored; a document with no images yields an empty
//! set.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExtractError;
use crate::node::ImageNode;

static IMG_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("img tag pattern"));

// name="double" | name='single' | name=bare
static ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([a-z][a-z0-9_:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("attribute pattern")
});

/// Scan `doc` for image elements and emit one node per element with a
/// resolvable URL attribute.
pub fn extract_from_markup(doc: &str) -> Result<Vec<ImageNode>, ExtractError> {
    if doc.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    let mut nodes = Vec::new();
    for tag in IMG_TAG.find_iter(doc) {
        let tag = tag.as_str();
        let Some(url) = attribute(tag, "src") else {
            continue;
        };
        if url.is_empty() {
            continue;
        }

        let mut node = ImageNode::new(url);
        node.alt = attribute(tag, "alt").unwrap_or_default();
        node.title = attribute(tag, "title").unwrap_or_default();
        node.description = attribute(tag, "data-description").unwrap_or_default();
        node.width = attribute(tag, "width");
        node.height = attribute(tag, "height");
        node.css_class = attribute(tag, "class");
        nodes.push(node);
    }
    Ok(nodes)
}

/// Read a named attribute out of a single tag's text.
fn attribute(tag: &str, name: &str) -> Option<String> {
    for captures in ATTR.captures_iter(tag) {
        if !captures[1].eq_ignore_ascii_case(name) {
            continue;
        }
        let value = captures
            .get(2)
            .or_else(|| captures.get(3))
            .or_else(|| captures.get(4))
            .map(|m| m.as_str().to_string());
        return value;
    }
    None
}

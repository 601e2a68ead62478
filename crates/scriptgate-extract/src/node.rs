//! Image reference records
//!
//! `ImageNode` is the unit every extraction mode produces. `kind` is always
//! derived from the URL, never accepted from the caller.

use serde::Serialize;

/// Prefix marking a URL that embeds the image bytes directly.
pub const INLINE_DATA_PREFIX: &str = "data:image/";

/// Whether a reference embeds its bytes or points elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// `data:image/...` URL carrying the bytes inline
    Inline,
    /// Any other URL
    External,
}

impl ImageKind {
    /// Classify a URL by the inline-data prefix test
    #[inline]
    #[must_use]
    pub fn classify(url: &str) -> Self {
        if url.starts_with(INLINE_DATA_PREFIX) {
            Self::Inline
        } else {
            Self::External
        }
    }
}

/// One discovered image reference with its available metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    /// Always non-empty: references without a resolvable URL are discarded
    /// during extraction, never emitted
    pub url: String,
    pub alt: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    pub kind: ImageKind,
}

impl ImageNode {
    /// Create a bare node for `url`, classifying it as it is built
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = ImageKind::classify(&url);
        Self {
            url,
            alt: String::new(),
            title: String::new(),
            description: String::new(),
            width: None,
            height: None,
            css_class: None,
            kind,
        }
    }
}

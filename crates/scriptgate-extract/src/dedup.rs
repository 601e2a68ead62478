//! Result-set deduplication
//!
//! Two policies exist across endpoint variants and are never blended within
//! one response: full-record equality keeps duplicate URLs whose metadata
//! differs; URL-only keeps the first-seen node per URL.

use std::collections::HashSet;

use serde::Serialize;

use crate::node::{ImageKind, ImageNode};

/// Deduplication key for a combined result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Full field-equality: same URL with different metadata stays distinct
    FullRecord,
    /// URL alone; the first-seen node wins
    UrlFirstSeen,
}

/// Deduplicate in input order; the first occurrence always wins.
#[must_use]
pub fn dedup(nodes: Vec<ImageNode>, policy: DedupPolicy) -> Vec<ImageNode> {
    match policy {
        DedupPolicy::FullRecord => {
            let mut seen: HashSet<ImageNode> = HashSet::with_capacity(nodes.len());
            nodes
                .into_iter()
                .filter(|node| seen.insert(node.clone()))
                .collect()
        }
        DedupPolicy::UrlFirstSeen => {
            let mut seen: HashSet<String> = HashSet::with_capacity(nodes.len());
            nodes
                .into_iter()
                .filter(|node| seen.insert(node.url.clone()))
                .collect()
        }
    }
}

/// The legacy split response shape: URLs only, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UrlSplit {
    pub external: Vec<String>,
    pub inline: Vec<String>,
}

/// Group node URLs by classification, preserving order.
#[must_use]
pub fn split_urls(nodes: &[ImageNode]) -> UrlSplit {
    let mut split = UrlSplit::default();
    for node in nodes {
        match node.kind {
            ImageKind::External => split.external.push(node.url.clone()),
            ImageKind::Inline => split.inline.push(node.url.clone()),
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn node(url: &str, alt: &str) -> ImageNode {
        let mut node = ImageNode::new(url);
        node.alt = alt.to_string();
        node
    }

    #[test]
    fn full_record_keeps_distinct_metadata() {
        let nodes = vec![node("a.png", "one"), node("a.png", "two"), node("a.png", "one")];
        let out = dedup(nodes, DedupPolicy::FullRecord);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn url_policy_keeps_first_seen() {
        let nodes = vec![node("a.png", "one"), node("a.png", "two"), node("b.png", "")];
        let out = dedup(nodes, DedupPolicy::UrlFirstSeen);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].alt, "one");
    }

    #[test]
    fn split_groups_by_kind_in_order() {
        let nodes = vec![
            node("a.png", ""),
            node("data:image/png;base64,AA", ""),
            node("b.png", ""),
        ];
        let split = split_urls(&nodes);
        assert_eq!(split.external, vec!["a.png", "b.png"]);
        assert_eq!(split.inline, vec!["data:image/png;base64,AA"]);
    }

    fn arb_node() -> impl Strategy<Value = ImageNode> {
        ("[a-c]\\.png|data:image/png;base64,A{1,3}", "[a-b]{0,2}")
            .prop_map(|(url, alt)| node(&url, &alt))
    }

    proptest! {
        // Running extraction twice and concatenating, then deduplicating,
        // must equal deduplicating a single run.
        #[test]
        fn dedup_is_idempotent_under_either_key(nodes in prop::collection::vec(arb_node(), 0..20)) {
            for policy in [DedupPolicy::FullRecord, DedupPolicy::UrlFirstSeen] {
                let single = dedup(nodes.clone(), policy);
                let mut doubled = nodes.clone();
                doubled.extend(nodes.clone());
                prop_assert_eq!(dedup(doubled, policy), single.clone());
                prop_assert_eq!(dedup(single.clone(), policy), single);
            }
        }
    }
}

//! Structured-tree mode
//!
//! Walks a caller-supplied tree of elements depth-first in pre-order,
//! collecting image references found in each element's settings. Traversal
//! runs over an explicit stack with a depth/node budget, so adversarially
//! deep input fails with a reported error instead of a stack fault.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{BudgetKind, ExtractError};
use crate::node::ImageNode;

/// Settings keys that may carry an image reference, in precedence order.
const IMAGE_KEYS: [&str; 5] = ["backgroundImage", "background_image", "image", "imageUrl", "src"];

/// A node in the caller-supplied document tree. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Element {
    /// Optional mapping that may contain image-reference fields
    pub settings: Option<Map<String, Value>>,
    /// Ordered child elements
    pub elements: Option<Vec<Element>>,
}

/// Explicit traversal budget
#[derive(Debug, Clone)]
pub struct TreeBudget {
    /// Maximum nesting depth
    pub max_depth: usize,
    /// Maximum total visited elements
    pub max_nodes: usize,
}

impl Default for TreeBudget {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_nodes: 10_000,
        }
    }
}

/// Parse the raw `elements` payload. The top level must be a sequence.
pub fn elements_from_value(value: Value) -> Result<Vec<Element>, ExtractError> {
    if !value.is_array() {
        return Err(ExtractError::Format(
            "top-level payload must be a sequence of elements".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| ExtractError::Format(e.to_string()))
}

/// Walk `roots` and collect every image reference within the budget.
///
/// Pre-order, depth-first; sibling order is preserved from input order so
/// first-seen-wins deduplication is reproducible.
pub fn extract_from_tree(
    roots: &[Element],
    budget: &TreeBudget,
) -> Result<Vec<ImageNode>, ExtractError> {
    let mut nodes = Vec::new();
    let mut visited = 0usize;

    // Children are pushed in reverse so pop order matches input order.
    let mut stack: Vec<(&Element, usize)> = roots.iter().rev().map(|e| (e, 1)).collect();

    while let Some((element, depth)) = stack.pop() {
        if depth > budget.max_depth {
            return Err(ExtractError::BudgetExceeded {
                kind: BudgetKind::Depth,
                limit: budget.max_depth,
            });
        }
        visited += 1;
        if visited > budget.max_nodes {
            return Err(ExtractError::BudgetExceeded {
                kind: BudgetKind::Nodes,
                limit: budget.max_nodes,
            });
        }

        if let Some(settings) = &element.settings {
            if let Some(node) = image_from_settings(settings) {
                nodes.push(node);
            }
        }

        if let Some(children) = &element.elements {
            for child in children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    Ok(nodes)
}

/// Read the first usable image reference out of a settings mapping.
/// References without a resolvable URL are discarded.
fn image_from_settings(settings: &Map<String, Value>) -> Option<ImageNode> {
    for key in IMAGE_KEYS {
        match settings.get(key) {
            Some(Value::String(url)) if !url.is_empty() => {
                return Some(ImageNode::new(url.clone()));
            }
            Some(Value::Object(fields)) => {
                if let Some(node) = image_from_object(fields) {
                    return Some(node);
                }
            }
            _ => {}
        }
    }
    None
}

fn image_from_object(fields: &Map<String, Value>) -> Option<ImageNode> {
    let url = fields.get("url").and_then(Value::as_str)?;
    if url.is_empty() {
        return None;
    }

    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    // width/height arrive as strings or numbers across caller variants.
    let dimension = |key: &str| match fields.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let mut node = ImageNode::new(url);
    node.alt = text("alt");
    node.title = text("title");
    node.description = text("description");
    node.width = dimension("width");
    node.height = dimension("height");
    node.css_class = fields
        .get("cssClass")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ImageKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn leaf_with_background(url: &str) -> Element {
        let mut settings = Map::new();
        settings.insert("backgroundImage".to_string(), json!(url));
        Element {
            settings: Some(settings),
            elements: None,
        }
    }

    fn nested(depth: usize, leaf: Element) -> Element {
        let mut current = leaf;
        for _ in 0..depth {
            current = Element {
                settings: None,
                elements: Some(vec![current]),
            };
        }
        current
    }

    #[test]
    fn reference_at_third_level_is_found() {
        let tree = nested(3, leaf_with_background("https://a.test/bg.png"));
        let nodes = extract_from_tree(&[tree], &TreeBudget::default()).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].url, "https://a.test/bg.png");
        assert_eq!(nodes[0].kind, ImageKind::External);
    }

    #[test]
    fn adversarially_deep_tree_fails_bounded() {
        let tree = nested(10_000, leaf_with_background("x.png"));
        let err = extract_from_tree(&[tree], &TreeBudget::default()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::BudgetExceeded {
                kind: BudgetKind::Depth,
                ..
            }
        ));
    }

    #[test]
    fn node_budget_caps_wide_trees() {
        let children: Vec<Element> = (0..100).map(|_| Element::default()).collect();
        let root = Element {
            settings: None,
            elements: Some(children),
        };
        let budget = TreeBudget {
            max_depth: 64,
            max_nodes: 50,
        };
        let err = extract_from_tree(&[root], &budget).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::BudgetExceeded {
                kind: BudgetKind::Nodes,
                ..
            }
        ));
    }

    #[test]
    fn preorder_sibling_order_is_preserved() {
        let roots = vec![
            leaf_with_background("first.png"),
            nested(1, leaf_with_background("second.png")),
            leaf_with_background("third.png"),
        ];
        let nodes = extract_from_tree(&roots, &TreeBudget::default()).unwrap();
        let urls: Vec<&str> = nodes.iter().map(|n| n.url.as_str()).collect();
        assert_eq!(urls, vec!["first.png", "second.png", "third.png"]);
    }

    #[test]
    fn object_reference_carries_metadata() {
        let mut settings = Map::new();
        settings.insert(
            "image".to_string(),
            json!({
                "url": "data:image/png;base64,AAAA",
                "alt": "logo",
                "width": 120,
                "height": "60",
                "cssClass": "brand"
            }),
        );
        let element = Element {
            settings: Some(settings),
            elements: None,
        };
        let nodes = extract_from_tree(&[element], &TreeBudget::default()).unwrap();
        let node = &nodes[0];
        assert_eq!(node.kind, ImageKind::Inline);
        assert_eq!(node.alt, "logo");
        assert_eq!(node.width.as_deref(), Some("120"));
        assert_eq!(node.height.as_deref(), Some("60"));
        assert_eq!(node.css_class.as_deref(), Some("brand"));
    }

    #[test]
    fn settings_without_url_emit_nothing() {
        let mut settings = Map::new();
        settings.insert("image".to_string(), json!({ "alt": "no url" }));
        settings.insert("color".to_string(), json!("#fff"));
        let element = Element {
            settings: Some(settings),
            elements: None,
        };
        let nodes = extract_from_tree(&[element], &TreeBudget::default()).unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn top_level_must_be_a_sequence() {
        let err = elements_from_value(json!({ "settings": {} })).unwrap_err();
        assert!(matches!(err, ExtractError::Format(_)));

        let ok = elements_from_value(json!([{ "settings": {} }])).unwrap();
        assert_eq!(ok.len(), 1);
    }
}

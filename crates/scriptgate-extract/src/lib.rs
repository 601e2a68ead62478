//! scriptgate-extract - Extraction Walker
//!
//! Discovers image references in caller-supplied documents:
//! - Markup mode scans `<img>` elements and their metadata attributes
//! - Structured-tree mode walks nested elements under an explicit
//!   depth/node budget
//! - Every reference is classified inline vs external and the combined set
//!   is deduplicated under one declared policy per caller
//!
//! Both modes are pure, request-scoped computations: no shared state, no IO.

pub mod dedup;
pub mod error;
pub mod markup;
pub mod node;
pub mod tree;

pub use dedup::{dedup, split_urls, DedupPolicy, UrlSplit};
pub use error::{BudgetKind, ExtractError};
pub use markup::extract_from_markup;
pub use node::{ImageKind, ImageNode, INLINE_DATA_PREFIX};
pub use tree::{elements_from_value, extract_from_tree, Element, TreeBudget};

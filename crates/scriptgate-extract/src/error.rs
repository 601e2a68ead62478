//! Error types for the extraction walker

/// Traversal budget dimension that was exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BudgetKind {
    /// Tree nesting depth
    #[error("depth")]
    Depth,
    /// Total visited nodes
    #[error("node")]
    Nodes,
}

/// Extraction error type
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Input document was empty or whitespace-only
    #[error("empty document")]
    EmptyDocument,

    /// Markup scan raised a structural fault
    #[error("markup parse failed: {0}")]
    Markup(String),

    /// Structured-tree payload has the wrong shape
    #[error("invalid document tree: {0}")]
    Format(String),

    /// Adversarially deep or large input exceeded the traversal budget
    #[error("traversal budget exceeded: {kind} limit {limit}")]
    BudgetExceeded { kind: BudgetKind, limit: usize },
}

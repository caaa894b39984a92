//! The statement-store contract consumed by the entity engine.

use std::sync::Arc;

use rdfview_core::{Node, Statement, Value};

/// Errors from graph store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    #[error("Store is read-only")]
    ReadOnly,
}

/// A statement pattern. `None` in any position matches everything.
///
/// For the context position `None` means "any context", not "the default graph".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorePattern {
    pub subject: Option<Node>,
    pub predicate: Option<Node>,
    pub object: Option<Value>,
    pub context: Option<Node>,
}

impl StorePattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: &Node) -> Self {
        self.subject = Some(subject.clone());
        self
    }

    pub fn predicate(mut self, predicate: &Node) -> Self {
        self.predicate = Some(predicate.clone());
        self
    }

    pub fn object(mut self, object: &Value) -> Self {
        self.object = Some(object.clone());
        self
    }

    /// Restrict to one context when given; leave as a wildcard otherwise.
    pub fn context(mut self, context: Option<&Node>) -> Self {
        self.context = context.cloned();
        self
    }

    /// Whether a statement matches every bound position of this pattern.
    pub fn matches(&self, st: &Statement) -> bool {
        self.subject.as_ref().map_or(true, |s| *s == st.subject)
            && self.predicate.as_ref().map_or(true, |p| *p == st.predicate)
            && self.object.as_ref().map_or(true, |o| *o == st.object)
            && self
                .context
                .as_ref()
                .map_or(true, |c| st.context.as_ref() == Some(c))
    }
}

/// A store of subject–predicate–object statements, optionally in named contexts.
///
/// Implementations must tolerate shared access through `&self`; writers to
/// the same (subject, predicate) key are expected to be serialized either by
/// the store or by the caller.
pub trait GraphStore: Send + Sync {
    /// All statements matching the pattern.
    fn filter(&self, pattern: &StorePattern) -> Result<Vec<Statement>, StoreError>;

    /// Add a statement. An absent context means the default graph.
    /// Returns whether the statement was newly added.
    fn add(
        &self,
        subject: &Node,
        predicate: &Node,
        object: &Value,
        context: Option<&Node>,
    ) -> Result<bool, StoreError>;

    /// Remove every statement matching (subject, predicate, object?, context?).
    /// Returns whether anything was removed.
    fn remove(
        &self,
        subject: &Node,
        predicate: &Node,
        object: Option<&Value>,
        context: Option<&Node>,
    ) -> Result<bool, StoreError>;

    /// Total number of statements across all contexts.
    fn size(&self) -> Result<usize, StoreError>;

    /// Whether at least one statement matches the pattern.
    fn contains(&self, pattern: &StorePattern) -> Result<bool, StoreError> {
        Ok(!self.filter(pattern)?.is_empty())
    }
}

/// Shared, externally owned store handle. Clone is cheap.
pub type SharedStore = Arc<dyn GraphStore>;

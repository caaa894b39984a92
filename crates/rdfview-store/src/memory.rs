//! In-memory quad store.

use std::collections::BTreeSet;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use rdfview_core::{Node, Statement, Value};

use crate::store::{GraphStore, StoreError, StorePattern};

/// Thread-safe in-memory statement store.
///
/// Statements are kept in a single ordered set (subject, predicate, object,
/// context), so iteration order is deterministic and subject-bound lookups
/// are range scans. Writers are serialized by the internal lock.
#[derive(Default)]
pub struct MemoryStore {
    statements: RwLock<BTreeSet<Statement>>,
    read_only: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject (or re-allow) all subsequent writes.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

/// Smallest possible statement for a subject in the set ordering.
fn subject_lower_bound(subject: &Node) -> Statement {
    let min_node = Node::Iri(String::new());
    Statement {
        subject: subject.clone(),
        predicate: min_node.clone(),
        object: Value::Resource(min_node),
        context: None,
    }
}

fn matching(set: &BTreeSet<Statement>, pattern: &StorePattern) -> Vec<Statement> {
    match &pattern.subject {
        Some(subject) => set
            .range((Bound::Included(subject_lower_bound(subject)), Bound::Unbounded))
            .take_while(|st| &st.subject == subject)
            .filter(|st| pattern.matches(st))
            .cloned()
            .collect(),
        None => set.iter().filter(|st| pattern.matches(st)).cloned().collect(),
    }
}

impl GraphStore for MemoryStore {
    fn filter(&self, pattern: &StorePattern) -> Result<Vec<Statement>, StoreError> {
        Ok(matching(&self.statements.read(), pattern))
    }

    fn add(
        &self,
        subject: &Node,
        predicate: &Node,
        object: &Value,
        context: Option<&Node>,
    ) -> Result<bool, StoreError> {
        self.check_writable()?;
        if !predicate.is_iri() {
            return Err(StoreError::InvalidStatement(format!(
                "predicate {predicate} is not an IRI"
            )));
        }

        let st = Statement {
            subject: subject.clone(),
            predicate: predicate.clone(),
            object: object.clone(),
            context: context.cloned(),
        };
        let added = self.statements.write().insert(st);
        tracing::trace!(%subject, %predicate, %object, added, "add");
        Ok(added)
    }

    fn remove(
        &self,
        subject: &Node,
        predicate: &Node,
        object: Option<&Value>,
        context: Option<&Node>,
    ) -> Result<bool, StoreError> {
        self.check_writable()?;
        let pattern = StorePattern {
            subject: Some(subject.clone()),
            predicate: Some(predicate.clone()),
            object: object.cloned(),
            context: context.cloned(),
        };

        let mut set = self.statements.write();
        let doomed = matching(&set, &pattern);
        for st in &doomed {
            set.remove(st);
        }
        tracing::trace!(%subject, %predicate, removed = doomed.len(), "remove");
        Ok(!doomed.is_empty())
    }

    fn size(&self) -> Result<usize, StoreError> {
        Ok(self.statements.read().len())
    }
}

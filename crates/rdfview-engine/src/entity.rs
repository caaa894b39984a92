//! Minimal entity representation: one resource, one type, one store.
//!
//! [`EntityCore`] exposes raw property CRUD keyed by predicate. It knows
//! nothing about schemas or converters; the dispatcher layers those on top.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use rdfview_core::{vocab, Node, Value};
use rdfview_store::{SharedStore, StorePattern};

use crate::error::{Result, ViewError};

/// Whether binding should create the entity or only look for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMode {
    /// Add the type statement; fail if it already exists.
    Create,
    /// Bind only if the type statement exists. Never mutates.
    Lookup,
}

/// Result of binding a resource to a type.
#[derive(Debug, Clone)]
pub enum Binding {
    Bound(EntityCore),
    /// No entity of the requested type exists at the resource.
    Detached,
}

impl Binding {
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }

    pub fn into_bound(self) -> Option<EntityCore> {
        match self {
            Self::Bound(core) => Some(core),
            Self::Detached => None,
        }
    }
}

/// A resource bound to a type in a shared store.
///
/// Reads are scoped to `context` when one is set and span every graph
/// otherwise. Writes go to `context`, or to the default graph.
#[derive(Clone)]
pub struct EntityCore {
    resource: Node,
    type_id: Node,
    parent_type_ids: Vec<Node>,
    store: SharedStore,
    context: Option<Node>,
}

impl EntityCore {
    /// Run the construction protocol for `(resource, type_id)`.
    ///
    /// `Create` fails with [`ViewError::DuplicateEntity`] when the resource
    /// already carries exactly this type in any graph, so the store never
    /// holds two type statements for one entity. `Lookup` only sees
    /// `context` (every graph when unset) and never fails on absence; it
    /// yields [`Binding::Detached`] instead.
    pub fn bind(
        store: &SharedStore,
        resource: &Node,
        type_id: &Node,
        parent_type_ids: Vec<Node>,
        context: Option<&Node>,
        mode: BindMode,
    ) -> Result<Binding> {
        let type_pred = vocab::rdf::type_();
        let type_value = Value::Resource(type_id.clone());
        let scope = match mode {
            BindMode::Create => None,
            BindMode::Lookup => context,
        };
        let pattern = StorePattern::new()
            .subject(resource)
            .predicate(&type_pred)
            .object(&type_value)
            .context(scope);
        let exists = store.contains(&pattern)?;

        match (mode, exists) {
            (BindMode::Create, true) => {
                return Err(ViewError::DuplicateEntity {
                    resource: resource.clone(),
                    type_id: type_id.clone(),
                });
            }
            (BindMode::Create, false) => {
                store.add(resource, &type_pred, &type_value, context)?;
                tracing::debug!(%resource, %type_id, "Created entity");
            }
            (BindMode::Lookup, false) => {
                tracing::debug!(%resource, %type_id, "Entity not found");
                return Ok(Binding::Detached);
            }
            (BindMode::Lookup, true) => {}
        }

        Ok(Binding::Bound(Self {
            resource: resource.clone(),
            type_id: type_id.clone(),
            parent_type_ids,
            store: store.clone(),
            context: context.cloned(),
        }))
    }

    pub fn resource(&self) -> &Node {
        &self.resource
    }

    pub fn type_id(&self) -> &Node {
        &self.type_id
    }

    /// Declared supertypes of the bound type, transitively.
    pub fn parent_type_ids(&self) -> &[Node] {
        &self.parent_type_ids
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn context(&self) -> Option<&Node> {
        self.context.as_ref()
    }

    fn pattern(&self, predicate: &Node) -> StorePattern {
        StorePattern::new()
            .subject(&self.resource)
            .predicate(predicate)
            .context(self.context.as_ref())
    }

    // ── Reads ─────────────────────────────────────────────────────

    /// One of the values for `predicate`, if any. Which one is unspecified.
    pub fn get_property(&self, predicate: &Node) -> Result<Option<Value>> {
        Ok(self
            .store
            .filter(&self.pattern(predicate))?
            .into_iter()
            .next()
            .map(|st| st.object))
    }

    /// Every distinct value for `predicate`.
    pub fn get_properties(&self, predicate: &Node) -> Result<BTreeSet<Value>> {
        Ok(self
            .store
            .filter(&self.pattern(predicate))?
            .into_iter()
            .map(|st| st.object)
            .collect())
    }

    // ── Writes ────────────────────────────────────────────────────

    /// Replace every value for `predicate` with `value`.
    /// Returns whether the final add introduced a new statement.
    pub fn set_property(&self, value: &Value, predicate: &Node) -> Result<bool> {
        self.clear_property(predicate)?;
        self.add_property(value, predicate)
    }

    /// Replace every value for `predicate` with `values`.
    ///
    /// Not atomic: a store failure part way through leaves whatever was
    /// already written.
    pub fn set_properties<'a>(
        &self,
        values: impl IntoIterator<Item = &'a Value>,
        predicate: &Node,
    ) -> Result<()> {
        self.clear_property(predicate)?;
        for value in values {
            self.add_property(value, predicate)?;
        }
        Ok(())
    }

    pub fn add_property(&self, value: &Value, predicate: &Node) -> Result<bool> {
        let added = self
            .store
            .add(&self.resource, predicate, value, self.context.as_ref())?;
        tracing::trace!(resource = %self.resource, %predicate, %value, added, "add_property");
        Ok(added)
    }

    /// Remove the `(resource, predicate, value)` statement.
    pub fn remove_property(&self, value: &Value, predicate: &Node) -> Result<bool> {
        Ok(self
            .store
            .remove(&self.resource, predicate, Some(value), self.context.as_ref())?)
    }

    /// Remove every value for `predicate`.
    pub fn clear_property(&self, predicate: &Node) -> Result<bool> {
        Ok(self
            .store
            .remove(&self.resource, predicate, None, self.context.as_ref())?)
    }
}

impl PartialEq for EntityCore {
    fn eq(&self, other: &Self) -> bool {
        self.resource == other.resource && self.type_id == other.type_id
    }
}

impl Eq for EntityCore {}

impl Hash for EntityCore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource.hash(state);
        self.type_id.hash(state);
    }
}

impl fmt::Debug for EntityCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCore")
            .field("resource", &self.resource)
            .field("type_id", &self.type_id)
            .field("context", &self.context)
            .finish()
    }
}

impl fmt::Display for EntityCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} a {}", self.resource, self.type_id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rdfview_core::Literal;
    use rdfview_store::{GraphStore, MemoryStore};

    use super::*;

    fn node(s: &str) -> Node {
        Node::iri_unchecked(format!("http://example.org/{s}"))
    }

    fn lit(s: &str) -> Value {
        Value::from(Literal::string(s))
    }

    fn bind(store: &SharedStore, mode: BindMode) -> Result<Binding> {
        EntityCore::bind(store, &node("r"), &node("T"), Vec::new(), None, mode)
    }

    #[test]
    fn construction_protocol() {
        let store: SharedStore = Arc::new(MemoryStore::new());

        assert!(!bind(&store, BindMode::Lookup).unwrap().is_bound());
        assert_eq!(store.size().unwrap(), 0);

        let core = bind(&store, BindMode::Create).unwrap().into_bound().unwrap();
        assert_eq!(core.resource(), &node("r"));
        assert_eq!(store.size().unwrap(), 1);

        assert!(matches!(
            bind(&store, BindMode::Create),
            Err(ViewError::DuplicateEntity { .. })
        ));
        assert_eq!(store.size().unwrap(), 1);

        let again = bind(&store, BindMode::Lookup).unwrap().into_bound().unwrap();
        assert_eq!(again, core);
    }

    #[test]
    fn create_in_context_is_scoped() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let g = node("g");
        EntityCore::bind(&store, &node("r"), &node("T"), Vec::new(), Some(&g), BindMode::Create)
            .unwrap();

        // Visible through the wildcard and through its own graph only.
        assert!(bind(&store, BindMode::Lookup).unwrap().is_bound());
        let other = node("h");
        let miss = EntityCore::bind(
            &store,
            &node("r"),
            &node("T"),
            Vec::new(),
            Some(&other),
            BindMode::Lookup,
        )
        .unwrap();
        assert!(!miss.is_bound());

        // Another graph cannot add a second type statement.
        let err = EntityCore::bind(
            &store,
            &node("r"),
            &node("T"),
            Vec::new(),
            Some(&other),
            BindMode::Create,
        )
        .unwrap_err();
        assert!(matches!(err, ViewError::DuplicateEntity { .. }));
        assert_eq!(store.size().unwrap(), 1);
    }

    #[test]
    fn property_primitives() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let core = bind(&store, BindMode::Create).unwrap().into_bound().unwrap();
        let p = node("p");

        assert_eq!(core.get_property(&p).unwrap(), None);
        assert!(core.set_property(&lit("v1"), &p).unwrap());
        assert!(core.set_property(&lit("v2"), &p).unwrap());
        assert_eq!(core.get_property(&p).unwrap(), Some(lit("v2")));
        assert_eq!(core.get_properties(&p).unwrap().len(), 1);

        assert!(core.add_property(&lit("v3"), &p).unwrap());
        assert!(!core.add_property(&lit("v3"), &p).unwrap());
        assert_eq!(core.get_properties(&p).unwrap().len(), 2);

        assert!(core.remove_property(&lit("v2"), &p).unwrap());
        assert!(!core.remove_property(&lit("v2"), &p).unwrap());
        assert_eq!(
            core.get_properties(&p).unwrap(),
            BTreeSet::from([lit("v3")])
        );

        core.set_properties(&[lit("a"), lit("b"), lit("c")], &p).unwrap();
        assert_eq!(core.get_properties(&p).unwrap().len(), 3);

        assert!(core.clear_property(&p).unwrap());
        assert!(!core.clear_property(&p).unwrap());
        assert!(core.get_properties(&p).unwrap().is_empty());
    }

    #[test]
    fn store_failures_propagate() {
        let memory = Arc::new(MemoryStore::new());
        let store: SharedStore = memory.clone();
        let core = bind(&store, BindMode::Create).unwrap().into_bound().unwrap();

        memory.set_read_only(true);
        assert!(matches!(
            core.add_property(&lit("x"), &node("p")),
            Err(ViewError::Store(_))
        ));
    }
}

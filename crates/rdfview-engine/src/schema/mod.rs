//! Type schemas: which accessor keys a type has, and how each maps onto
//! the graph.
//!
//! Schemas arrive as plain values (built in code or loaded from JSON) and
//! are checked once when gathered into a [`SchemaSet`]. After that the
//! dispatcher trusts them.

mod load;
mod validate;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rdfview_core::Node;
use serde::{Deserialize, Serialize};

use crate::convert::{NativeType, ValueConverterRegistry};
use crate::error::SchemaError;

pub use load::SchemaDocument;

// ── Descriptors ───────────────────────────────────────────────────

/// What a property's values are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Scalar data converted through the registry.
    Literal(NativeType),
    /// References to entities of the given type.
    Entity(Node),
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(native_type) => write!(f, "literal {native_type}"),
            Self::Entity(type_id) => write!(f, "entity {type_id}"),
        }
    }
}

/// How one accessor key maps onto the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub predicate: Node,
    /// At most one value per resource when set.
    #[serde(default)]
    pub functional: bool,
    pub target: TargetKind,
}

impl PropertyDescriptor {
    pub fn literal(predicate: Node, functional: bool, native_type: NativeType) -> Self {
        Self {
            predicate,
            functional,
            target: TargetKind::Literal(native_type),
        }
    }

    pub fn entity(predicate: Node, functional: bool, target_type: Node) -> Self {
        Self {
            predicate,
            functional,
            target: TargetKind::Entity(target_type),
        }
    }

    pub fn cardinality(&self) -> &'static str {
        if self.functional {
            "functional"
        } else {
            "non-functional"
        }
    }
}

/// Declared shape of one domain type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSchema {
    pub id: Node,
    /// Directly declared supertypes, in declaration order.
    #[serde(default)]
    pub supertypes: Vec<Node>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDescriptor>,
}

impl TypeSchema {
    pub fn new(id: Node) -> Self {
        Self {
            id,
            supertypes: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_supertype(mut self, supertype: Node) -> Self {
        self.supertypes.push(supertype);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, descriptor: PropertyDescriptor) -> Self {
        self.properties.insert(key.into(), descriptor);
        self
    }
}

// ── Resolved schemas ──────────────────────────────────────────────

/// A validated schema with its supertype closure and inherited properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub schema: TypeSchema,
    /// Transitive declared supertypes, depth-first, without duplicates.
    pub supertypes: Vec<Node>,
    /// Own properties plus inherited ones. The nearest declaration of a key wins.
    pub properties: BTreeMap<String, PropertyDescriptor>,
}

impl ResolvedType {
    pub fn id(&self) -> &Node {
        &self.schema.id
    }

    pub fn property(&self, key: &str) -> Result<&PropertyDescriptor, SchemaError> {
        self.properties
            .get(key)
            .ok_or_else(|| SchemaError::UnknownProperty {
                type_id: self.schema.id.clone(),
                key: key.to_string(),
            })
    }

    /// This type followed by its supertype closure.
    pub fn type_ids(&self) -> impl Iterator<Item = &Node> {
        std::iter::once(&self.schema.id).chain(self.supertypes.iter())
    }
}

/// Every known type schema, validated as a whole.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    types: BTreeMap<Node, Arc<ResolvedType>>,
}

impl SchemaSet {
    /// Validate and resolve a collection of schemas.
    pub fn new(schemas: impl IntoIterator<Item = TypeSchema>) -> Result<Self, SchemaError> {
        let types = validate::resolve(schemas.into_iter().collect())?;
        tracing::debug!(types = types.len(), "Schema set resolved");
        Ok(Self { types })
    }

    pub fn get(&self, type_id: &Node) -> Result<&Arc<ResolvedType>, SchemaError> {
        self.types
            .get(type_id)
            .ok_or_else(|| SchemaError::UnknownType(type_id.clone()))
    }

    pub fn contains(&self, type_id: &Node) -> bool {
        self.types.contains_key(type_id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedType> {
        self.types.values().map(|t| t.as_ref())
    }

    /// Transitive declared supertypes of `type_id`.
    pub fn supertype_closure(&self, type_id: &Node) -> Result<&[Node], SchemaError> {
        Ok(&self.get(type_id)?.supertypes)
    }

    /// Fail on the first literal property whose native type the registry
    /// cannot resolve, even through fallback.
    pub fn check_converters(&self, registry: &ValueConverterRegistry) -> Result<(), SchemaError> {
        for resolved in self.types.values() {
            for (key, descriptor) in &resolved.schema.properties {
                if let TargetKind::Literal(native_type) = &descriptor.target {
                    if !registry.resolves(native_type) {
                        return Err(SchemaError::UnresolvedNativeType {
                            type_id: resolved.schema.id.clone(),
                            key: key.clone(),
                            native_type: native_type.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

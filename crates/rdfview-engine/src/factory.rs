//! Creating and retrieving typed views.

use std::sync::Arc;

use rdfview_core::{vocab, Node, ViewConfig};
use rdfview_store::{SharedStore, StorePattern};

use crate::convert::ValueConverterRegistry;
use crate::entity::{BindMode, Binding, EntityCore};
use crate::error::{Result, ViewError};
use crate::schema::{ResolvedType, SchemaSet};
use crate::view::{EntityView, TypedView};

/// Entry point for obtaining entity views.
///
/// Holds the validated schemas and the converter registry; both are shared
/// with every view it produces. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct EntityFactory {
    schemas: Arc<SchemaSet>,
    registry: Arc<ValueConverterRegistry>,
    context: Option<Node>,
}

impl EntityFactory {
    /// Build a factory, rejecting schemas with literal properties the
    /// registry cannot convert.
    pub fn new(schemas: SchemaSet, registry: ValueConverterRegistry) -> Result<Self> {
        schemas.check_converters(&registry)?;
        Ok(Self::lenient(schemas, registry))
    }

    /// Build a factory without checking converter coverage. Missing
    /// converters then surface per call.
    pub fn lenient(schemas: SchemaSet, registry: ValueConverterRegistry) -> Self {
        Self {
            schemas: Arc::new(schemas),
            registry: Arc::new(registry),
            context: None,
        }
    }

    /// Build from configuration: load the configured schema files and scope
    /// views to the configured context.
    pub fn from_config(config: &ViewConfig, registry: ValueConverterRegistry) -> Result<Self> {
        let schemas = SchemaSet::load_files(&config.schema_files)?;
        tracing::info!(
            files = config.schema_files.len(),
            types = schemas.len(),
            strict = config.strict_converters,
            "Schemas loaded"
        );
        let factory = if config.strict_converters {
            Self::new(schemas, registry)?
        } else {
            Self::lenient(schemas, registry)
        };
        Ok(factory.with_context(config.context_node()?))
    }

    /// Scope reads to `context` and direct writes into it.
    pub fn with_context(mut self, context: Option<Node>) -> Self {
        self.context = context;
        self
    }

    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }

    pub fn registry(&self) -> &ValueConverterRegistry {
        &self.registry
    }

    pub fn context(&self) -> Option<&Node> {
        self.context.as_ref()
    }

    /// Create an entity of `type_id` at `resource`.
    ///
    /// Fails with `DuplicateEntity` if the resource already has this exact type.
    pub fn create(&self, type_id: &Node, resource: &Node, store: &SharedStore) -> Result<EntityView> {
        let schema = self.schemas.get(type_id)?;
        match self.bind(schema, resource, store, BindMode::Create)? {
            Binding::Bound(core) => Ok(self.wrap(core, schema)),
            Binding::Detached => Err(ViewError::DuplicateEntity {
                resource: resource.clone(),
                type_id: type_id.clone(),
            }),
        }
    }

    /// Create an entity at a freshly minted blank node.
    pub fn create_anonymous(&self, type_id: &Node, store: &SharedStore) -> Result<EntityView> {
        self.create(type_id, &Node::blank(), store)
    }

    /// Retrieve the entity of `type_id` at `resource`, if one exists.
    pub fn get(
        &self,
        type_id: &Node,
        resource: &Node,
        store: &SharedStore,
    ) -> Result<Option<EntityView>> {
        let schema = self.schemas.get(type_id)?;
        Ok(self
            .bind(schema, resource, store, BindMode::Lookup)?
            .into_bound()
            .map(|core| self.wrap(core, schema)))
    }

    /// Retrieve the entity at `resource` as a `type_id`: either typed with
    /// `type_id` itself or with a known subtype of it. The exact type wins;
    /// among subtypes the first in store order is used.
    pub fn get_as(
        &self,
        type_id: &Node,
        resource: &Node,
        store: &SharedStore,
    ) -> Result<Option<EntityView>> {
        if let Some(view) = self.get(type_id, resource, store)? {
            return Ok(Some(view));
        }

        let type_pred = vocab::rdf::type_();
        let pattern = StorePattern::new()
            .subject(resource)
            .predicate(&type_pred)
            .context(self.context.as_ref());
        for statement in store.filter(&pattern)? {
            let Some(stored) = statement.object.as_node() else {
                continue;
            };
            let Ok(schema) = self.schemas.get(stored) else {
                continue;
            };
            if schema.type_ids().any(|t| t == type_id) {
                return self.get(stored, resource, store);
            }
        }
        Ok(None)
    }

    pub fn create_typed<V: TypedView>(&self, resource: &Node, store: &SharedStore) -> Result<V> {
        Ok(V::from_view(self.create(&V::type_id(), resource, store)?))
    }

    pub fn get_typed<V: TypedView>(
        &self,
        resource: &Node,
        store: &SharedStore,
    ) -> Result<Option<V>> {
        Ok(self.get(&V::type_id(), resource, store)?.map(V::from_view))
    }

    fn bind(
        &self,
        schema: &ResolvedType,
        resource: &Node,
        store: &SharedStore,
        mode: BindMode,
    ) -> Result<Binding> {
        EntityCore::bind(
            store,
            resource,
            schema.id(),
            schema.supertypes.clone(),
            self.context.as_ref(),
            mode,
        )
    }

    fn wrap(&self, core: EntityCore, schema: &Arc<ResolvedType>) -> EntityView {
        EntityView::new(core, Arc::clone(schema), self.clone())
    }
}

//! Schema-driven views over bound entities.
//!
//! [`EntityView`] is the single generic view type. Domain code reaches it
//! either through [`EntityView::invoke`] or through the typed helpers
//! below, and may wrap it in a named facade implementing [`TypedView`].

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rdfview_core::Node;

use crate::convert::{from_native, ConversionError, NativeKind, NativeType};
use crate::dispatch::{Argument, Element, Operation, Outcome, PropertyDispatcher};
use crate::entity::EntityCore;
use crate::error::{Result, ViewError};
use crate::factory::EntityFactory;
use crate::schema::{ResolvedType, TargetKind};

/// A bound entity seen through its type schema.
///
/// Equality, hashing and formatting use only (resource, type).
#[derive(Clone)]
pub struct EntityView {
    core: EntityCore,
    schema: Arc<ResolvedType>,
    factory: EntityFactory,
}

impl EntityView {
    pub(crate) fn new(core: EntityCore, schema: Arc<ResolvedType>, factory: EntityFactory) -> Self {
        Self {
            core,
            schema,
            factory,
        }
    }

    pub fn resource(&self) -> &Node {
        self.core.resource()
    }

    pub fn type_id(&self) -> &Node {
        self.core.type_id()
    }

    pub fn parent_type_ids(&self) -> &[Node] {
        self.core.parent_type_ids()
    }

    /// The bound type followed by its supertype closure.
    pub fn types(&self) -> impl Iterator<Item = &Node> {
        self.schema.type_ids()
    }

    pub fn is_a(&self, type_id: &Node) -> bool {
        self.types().any(|t| t == type_id)
    }

    pub fn schema(&self) -> &ResolvedType {
        &self.schema
    }

    /// Raw primitives, for callers bypassing the schema.
    pub fn core(&self) -> &EntityCore {
        &self.core
    }

    pub fn factory(&self) -> &EntityFactory {
        &self.factory
    }

    /// Invoke an accessor by key. Every helper below goes through here.
    pub fn invoke(&self, key: &str, operation: Operation, argument: Argument) -> Result<Outcome> {
        PropertyDispatcher::new(&self.core, &self.schema, &self.factory)
            .dispatch(key, operation, argument)
    }

    /// Wrap in a facade, if this entity is (a subtype of) the facade's type.
    pub fn into_typed<V: TypedView>(self) -> Option<V> {
        self.is_a(&V::type_id()).then(|| V::from_view(self))
    }

    // ── Literal properties ────────────────────────────────────────

    pub fn get_literal<T: NativeKind>(&self, key: &str) -> Result<Option<T>> {
        let target = self.literal_type(key)?;
        match self.invoke(key, Operation::Get, Argument::None)? {
            Outcome::Single(Some(element)) => Ok(Some(literal_of(element, &target)?)),
            Outcome::Single(None) => Ok(None),
            _ => Err(shape(key, Operation::Get, "a functional property")),
        }
    }

    pub fn get_literals<T: NativeKind>(&self, key: &str) -> Result<Vec<T>> {
        let target = self.literal_type(key)?;
        match self.invoke(key, Operation::Get, Argument::None)? {
            Outcome::Many(elements) => elements
                .into_iter()
                .map(|element| literal_of(element, &target))
                .collect(),
            _ => Err(shape(key, Operation::Get, "a non-functional property")),
        }
    }

    /// Replace the value of a functional literal property.
    pub fn set_literal<T: NativeKind>(&self, key: &str, value: T) -> Result<bool> {
        changed(
            key,
            Operation::Set,
            self.invoke(key, Operation::Set, literal_arg(value))?,
        )
    }

    /// Replace every value of a non-functional literal property.
    pub fn set_literals<T: NativeKind>(
        &self,
        key: &str,
        values: impl IntoIterator<Item = T>,
    ) -> Result<()> {
        let elements = values
            .into_iter()
            .map(|v| Element::Literal(v.into_native()))
            .collect();
        self.invoke(key, Operation::Set, Argument::Many(elements))?;
        Ok(())
    }

    pub fn add_literal<T: NativeKind>(&self, key: &str, value: T) -> Result<bool> {
        changed(
            key,
            Operation::Add,
            self.invoke(key, Operation::Add, literal_arg(value))?,
        )
    }

    pub fn remove_literal<T: NativeKind>(&self, key: &str, value: T) -> Result<bool> {
        changed(
            key,
            Operation::Remove,
            self.invoke(key, Operation::Remove, literal_arg(value))?,
        )
    }

    // ── Entity properties ─────────────────────────────────────────

    /// Follow a functional reference. A target that is not a typed entity
    /// reads as `None`.
    pub fn get_entity(&self, key: &str) -> Result<Option<EntityView>> {
        match self.invoke(key, Operation::Get, Argument::None)? {
            Outcome::Single(Some(Element::Entity(view))) => Ok(Some(view)),
            Outcome::Single(None) => Ok(None),
            _ => Err(shape(key, Operation::Get, "a functional entity property")),
        }
    }

    /// Follow a non-functional reference. Fails with `DanglingReference`
    /// if any target is not a typed entity.
    pub fn get_entities(&self, key: &str) -> Result<Vec<EntityView>> {
        match self.invoke(key, Operation::Get, Argument::None)? {
            Outcome::Many(elements) => elements
                .into_iter()
                .map(|element| match element {
                    Element::Entity(view) => Ok(view),
                    Element::Literal(_) => Err(shape(key, Operation::Get, "an entity property")),
                })
                .collect(),
            _ => Err(shape(key, Operation::Get, "a non-functional entity property")),
        }
    }

    pub fn set_entity(&self, key: &str, target: &EntityView) -> Result<bool> {
        changed(
            key,
            Operation::Set,
            self.invoke(key, Operation::Set, Argument::One(Element::Entity(target.clone())))?,
        )
    }

    pub fn set_entities<'a>(
        &self,
        key: &str,
        targets: impl IntoIterator<Item = &'a EntityView>,
    ) -> Result<()> {
        let elements = targets
            .into_iter()
            .map(|view| Element::Entity(view.clone()))
            .collect();
        self.invoke(key, Operation::Set, Argument::Many(elements))?;
        Ok(())
    }

    pub fn add_entity(&self, key: &str, target: &EntityView) -> Result<bool> {
        changed(
            key,
            Operation::Add,
            self.invoke(key, Operation::Add, Argument::One(Element::Entity(target.clone())))?,
        )
    }

    pub fn remove_entity(&self, key: &str, target: &EntityView) -> Result<bool> {
        changed(
            key,
            Operation::Remove,
            self.invoke(key, Operation::Remove, Argument::One(Element::Entity(target.clone())))?,
        )
    }

    /// Remove every value of a property, of either kind.
    pub fn clear(&self, key: &str) -> Result<bool> {
        changed(
            key,
            Operation::Clear,
            self.invoke(key, Operation::Clear, Argument::None)?,
        )
    }

    fn literal_type(&self, key: &str) -> Result<NativeType> {
        match &self.schema.property(key)?.target {
            TargetKind::Literal(native_type) => Ok(native_type.clone()),
            TargetKind::Entity(_) => Err(shape(key, Operation::Get, "a literal property")),
        }
    }
}

fn literal_arg<T: NativeKind>(value: T) -> Argument {
    Argument::One(Element::Literal(value.into_native()))
}

fn literal_of<T: NativeKind>(element: Element, target: &NativeType) -> Result<T> {
    match element {
        Element::Literal(native) => from_native::<T>(native, target),
        Element::Entity(view) => Err(ViewError::ValueConversion(ConversionError::new(
            view.resource(),
            target.clone(),
            "entity where a literal was expected",
        ))),
    }
}

fn changed(key: &str, operation: Operation, outcome: Outcome) -> Result<bool> {
    match outcome {
        Outcome::Changed(changed) => Ok(changed),
        _ => Err(shape(key, operation, "a single-value call")),
    }
}

fn shape(key: &str, operation: Operation, expected: &'static str) -> ViewError {
    ViewError::ArgumentShape {
        property: key.to_string(),
        operation,
        expected,
    }
}

impl PartialEq for EntityView {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl Eq for EntityView {}

impl Hash for EntityView {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.core.hash(state);
    }
}

impl fmt::Debug for EntityView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityView")
            .field("resource", self.resource())
            .field("type_id", self.type_id())
            .finish()
    }
}

impl fmt::Display for EntityView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.core, f)
    }
}

// ── Typed facades ─────────────────────────────────────────────────

/// A named wrapper around [`EntityView`] for one schema type.
///
/// ```ignore
/// struct Person(EntityView);
///
/// impl TypedView for Person {
///     const TYPE_IRI: &'static str = "http://example.org/Person";
///     fn from_view(view: EntityView) -> Self { Self(view) }
///     fn view(&self) -> &EntityView { &self.0 }
/// }
///
/// impl Person {
///     fn name(&self) -> Result<Option<String>> { self.0.get_literal("name") }
/// }
/// ```
pub trait TypedView: Sized {
    const TYPE_IRI: &'static str;

    fn from_view(view: EntityView) -> Self;

    fn view(&self) -> &EntityView;

    fn type_id() -> Node {
        Node::iri_unchecked(Self::TYPE_IRI)
    }

    fn resource(&self) -> &Node {
        self.view().resource()
    }
}

//! Generic translation of accessor calls into entity primitives.
//!
//! Every call is classified by operation, cardinality and target kind, then
//! served by the same code for every schema. No per-type logic exists.

use std::fmt;

use rdfview_core::{Node, Value};

use crate::convert::{from_native, NativeType, NativeValue};
use crate::entity::EntityCore;
use crate::error::{Result, ViewError};
use crate::factory::EntityFactory;
use crate::schema::{PropertyDescriptor, ResolvedType, TargetKind};
use crate::view::EntityView;

// ── Call shapes ───────────────────────────────────────────────────

/// The accessor operation being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Get,
    Set,
    Add,
    Remove,
    Clear,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Clear => "clear",
        })
    }
}

/// One property value on the native side.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Literal(NativeValue),
    Entity(EntityView),
}

impl Element {
    pub fn as_literal(&self) -> Option<&NativeValue> {
        match self {
            Self::Literal(v) => Some(v),
            Self::Entity(_) => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityView> {
        match self {
            Self::Entity(view) => Some(view),
            Self::Literal(_) => None,
        }
    }
}

impl From<NativeValue> for Element {
    fn from(value: NativeValue) -> Self {
        Self::Literal(value)
    }
}

impl From<EntityView> for Element {
    fn from(view: EntityView) -> Self {
        Self::Entity(view)
    }
}

/// Arguments passed with an accessor call.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    None,
    One(Element),
    Many(Vec<Element>),
}

/// What an accessor call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Functional get.
    Single(Option<Element>),
    /// Non-functional get.
    Many(Vec<Element>),
    /// Whether the store changed.
    Changed(bool),
    /// Completed with nothing to report.
    Done,
}

// ── Dispatcher ────────────────────────────────────────────────────

/// Serves accessor calls for one bound entity.
pub struct PropertyDispatcher<'a> {
    core: &'a EntityCore,
    schema: &'a ResolvedType,
    factory: &'a EntityFactory,
}

impl<'a> PropertyDispatcher<'a> {
    pub fn new(core: &'a EntityCore, schema: &'a ResolvedType, factory: &'a EntityFactory) -> Self {
        Self {
            core,
            schema,
            factory,
        }
    }

    pub fn dispatch(&self, key: &str, operation: Operation, argument: Argument) -> Result<Outcome> {
        let descriptor = self.schema.property(key)?;
        tracing::debug!(
            resource = %self.core.resource(),
            key,
            %operation,
            functional = descriptor.functional,
            "Dispatch"
        );

        let call = Call {
            key,
            operation,
            descriptor,
        };
        let predicate = &descriptor.predicate;

        match (operation, argument) {
            (Operation::Get, Argument::None) if descriptor.functional => {
                let value = self.core.get_property(predicate)?;
                Ok(Outcome::Single(match value {
                    Some(value) => self.read_one(&call, &value)?,
                    None => None,
                }))
            }
            (Operation::Get, Argument::None) => {
                let mut out = Vec::new();
                for value in self.core.get_properties(predicate)? {
                    out.push(self.read_required(&call, &value)?);
                }
                Ok(Outcome::Many(out))
            }

            (Operation::Set, Argument::One(element)) if descriptor.functional => {
                let value = self.write_one(&call, &element)?;
                Ok(Outcome::Changed(self.core.set_property(&value, predicate)?))
            }
            (Operation::Set, Argument::None) if descriptor.functional => {
                Ok(Outcome::Changed(self.core.clear_property(predicate)?))
            }
            (Operation::Set, Argument::Many(elements)) if !descriptor.functional => {
                let values = elements
                    .iter()
                    .map(|element| self.write_one(&call, element))
                    .collect::<Result<Vec<_>>>()?;
                self.core.set_properties(&values, predicate)?;
                Ok(Outcome::Done)
            }

            (Operation::Add, Argument::One(element)) => {
                let value = self.write_one(&call, &element)?;
                if descriptor.functional && self.core.get_property(predicate)?.is_some() {
                    return Ok(Outcome::Changed(false));
                }
                Ok(Outcome::Changed(self.core.add_property(&value, predicate)?))
            }
            (Operation::Remove, Argument::One(element)) => {
                let value = self.write_one(&call, &element)?;
                Ok(Outcome::Changed(self.core.remove_property(&value, predicate)?))
            }
            (Operation::Clear, Argument::None) => {
                Ok(Outcome::Changed(self.core.clear_property(predicate)?))
            }

            _ => Err(call.shape_error(match operation {
                Operation::Get | Operation::Clear => "no argument",
                Operation::Set if descriptor.functional => "a single value or none",
                Operation::Set => "a collection of values",
                Operation::Add | Operation::Remove => "a single value",
            })),
        }
    }

    /// Convert one stored value for a functional get. A reference to a
    /// resource that is not (or no longer) typed with the target type or one
    /// of its subtypes reads as absent.
    fn read_one(&self, call: &Call<'_>, value: &Value) -> Result<Option<Element>> {
        match &call.descriptor.target {
            TargetKind::Literal(native_type) => Ok(Some(Element::Literal(
                self.factory.registry().to_native(native_type, value)?,
            ))),
            TargetKind::Entity(target_type) => {
                let target = self.to_node(value)?;
                let view = self.factory.get_as(target_type, &target, self.core.store())?;
                Ok(view.map(Element::Entity))
            }
        }
    }

    /// Convert one stored value for a non-functional get. Unresolvable
    /// references are errors so the collection never silently shrinks.
    fn read_required(&self, call: &Call<'_>, value: &Value) -> Result<Element> {
        let target_type = match &call.descriptor.target {
            TargetKind::Literal(native_type) => {
                return Ok(Element::Literal(
                    self.factory.registry().to_native(native_type, value)?,
                ));
            }
            TargetKind::Entity(target_type) => target_type,
        };

        let target = self.to_node(value)?;
        match self.factory.get_as(target_type, &target, self.core.store())? {
            Some(view) => Ok(Element::Entity(view)),
            None => {
                tracing::warn!(
                    subject = %self.core.resource(),
                    property = call.key,
                    %target,
                    %target_type,
                    "Dangling reference"
                );
                Err(ViewError::DanglingReference {
                    subject: self.core.resource().clone(),
                    property: call.key.to_string(),
                    target,
                    target_type: target_type.clone(),
                })
            }
        }
    }

    fn write_one(&self, call: &Call<'_>, element: &Element) -> Result<Value> {
        match (&call.descriptor.target, element) {
            (TargetKind::Literal(native_type), Element::Literal(native)) => {
                self.factory.registry().to_value(native_type, native)
            }
            (TargetKind::Entity(target_type), Element::Entity(view)) => {
                if !view.is_a(target_type) {
                    return Err(call.shape_error("an entity of the declared target type"));
                }
                Ok(Value::Resource(view.resource().clone()))
            }
            (TargetKind::Literal(_), Element::Entity(_)) => Err(call.shape_error("a literal value")),
            (TargetKind::Entity(_), Element::Literal(_)) => Err(call.shape_error("an entity view")),
        }
    }

    /// Identity conversion of a stored reference.
    fn to_node(&self, value: &Value) -> Result<Node> {
        let native = self
            .factory
            .registry()
            .to_native(&NativeType::RESOURCE, value)?;
        from_native::<Node>(native, &NativeType::RESOURCE)
    }
}

struct Call<'a> {
    key: &'a str,
    operation: Operation,
    descriptor: &'a PropertyDescriptor,
}

impl Call<'_> {
    fn shape_error(&self, expected: &'static str) -> ViewError {
        ViewError::ArgumentShape {
            property: self.key.to_string(),
            operation: self.operation,
            expected,
        }
    }
}

//! rdfview-engine — typed entity views over a generic graph store.
//!
//! A caller asks the [`EntityFactory`] for a view of (type, resource, store).
//! The factory binds an [`EntityCore`] under the entity-existence rules and
//! wraps it in an [`EntityView`] driven by the type's schema. Accessor calls
//! on the view are dispatched generically: literal values pass through the
//! [`ValueConverterRegistry`], entity references recurse into the factory.

pub mod convert;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod factory;
pub mod schema;
pub mod view;

pub use convert::{
    ConversionError, NativeKind, NativeType, NativeValue, TypeDecl, ValueConverter,
    ValueConverterRegistry,
};
pub use dispatch::{Argument, Element, Operation, Outcome, PropertyDispatcher};
pub use entity::{BindMode, Binding, EntityCore};
pub use error::{Result, SchemaError, ViewError};
pub use factory::EntityFactory;
pub use schema::{PropertyDescriptor, ResolvedType, SchemaDocument, SchemaSet, TargetKind, TypeSchema};
pub use view::{EntityView, TypedView};

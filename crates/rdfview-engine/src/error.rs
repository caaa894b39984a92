//! Error types for the rdfview-engine crate.

use thiserror::Error;

use rdfview_core::{CoreError, Node};
use rdfview_store::StoreError;

use crate::convert::{ConversionError, NativeType};
use crate::dispatch::Operation;

/// Failures surfaced by entity creation, lookup, and property dispatch.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Entity {resource} already exists with type {type_id}")]
    DuplicateEntity { resource: Node, type_id: Node },

    #[error("No converter registered for native type {native_type}")]
    MissingConverter { native_type: NativeType },

    #[error("Value conversion failed: {0}")]
    ValueConversion(#[from] ConversionError),

    #[error(
        "Dangling reference: {subject} property '{property}' points to {target}, \
         which is not a {target_type}"
    )]
    DanglingReference {
        subject: Node,
        property: String,
        target: Node,
        target_type: Node,
    },

    #[error("Property '{property}' cannot {operation} with this argument: expected {expected}")]
    ArgumentShape {
        property: String,
        operation: Operation,
        expected: &'static str,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),
}

/// Schema metadata problems, detected when schemas are loaded or requested.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("No schema registered for type {0}")]
    UnknownType(Node),

    #[error("Type {type_id} has no property '{key}'")]
    UnknownProperty { type_id: Node, key: String },

    #[error("Type {0} is declared more than once")]
    DuplicateType(Node),

    #[error("Type {0} has a property with an empty key")]
    EmptyPropertyKey(Node),

    #[error("Type {type_id} property '{key}': predicate {predicate} must be an IRI")]
    InvalidPredicate {
        type_id: Node,
        key: String,
        predicate: Node,
    },

    #[error("Type {type_id} property '{key}' uses the reserved type predicate")]
    ReservedPredicate { type_id: Node, key: String },

    #[error("Type {type_id} properties '{first}' and '{second}' disagree on predicate {predicate}")]
    ConflictingPredicate {
        type_id: Node,
        predicate: Node,
        first: String,
        second: String,
    },

    #[error("Type {type_id} property '{key}' references unknown type {target}")]
    UnknownTarget {
        type_id: Node,
        key: String,
        target: Node,
    },

    #[error("Type {type_id} declares unknown supertype {supertype}")]
    UnknownSupertype { type_id: Node, supertype: Node },

    #[error("Supertype cycle through {0}")]
    SupertypeCycle(Node),

    #[error("Type {type_id} property '{key}': no converter for native type {native_type}")]
    UnresolvedNativeType {
        type_id: Node,
        key: String,
        native_type: NativeType,
    },

    #[error("Failed to parse schema description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewError>;

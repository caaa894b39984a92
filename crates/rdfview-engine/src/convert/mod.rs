//! Conversion between untyped graph values and native values.
//!
//! Converters are registered under a [`NativeType`] tag. Lookups that miss
//! the exact tag walk the author-declared type relationships: declared
//! interfaces first (depth-first, recursively), then the superclass chain.

mod builtin;
mod native;

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rdfview_core::{Node, Value};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ViewError};

pub use builtin::{
    BooleanConverter, DateConverter, DateTimeConverter, FloatConverter, IntegerConverter,
    ResourceConverter, StringConverter, UriConverter, UuidConverter,
};
pub use native::NativeKind;
pub(crate) use native::from_native;

// ── Native types and values ───────────────────────────────────────

/// Stable identifier of a native type known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeType(Cow<'static, str>);

impl NativeType {
    pub const BOOLEAN: Self = Self::from_static("boolean");
    pub const BYTE: Self = Self::from_static("byte");
    pub const SHORT: Self = Self::from_static("short");
    pub const INT: Self = Self::from_static("int");
    pub const LONG: Self = Self::from_static("long");
    pub const UNSIGNED_INT: Self = Self::from_static("unsignedInt");
    pub const FLOAT: Self = Self::from_static("float");
    pub const DOUBLE: Self = Self::from_static("double");
    pub const STRING: Self = Self::from_static("string");
    pub const DATE_TIME: Self = Self::from_static("dateTime");
    pub const DATE: Self = Self::from_static("date");
    pub const URI: Self = Self::from_static("anyURI");
    pub const UUID: Self = Self::from_static("uuid");
    pub const RESOURCE: Self = Self::from_static("resource");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Dynamic carrier for converted values.
///
/// Equality on `DateTime` compares instants, not offsets.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    Uuid(Uuid),
    Node(Node),
}

impl NativeValue {
    /// Short name of the carried variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::DateTime(_) => "dateTime",
            Self::Date(_) => "date",
            Self::Uuid(_) => "uuid",
            Self::Node(_) => "node",
        }
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Self::Date(d) => write!(f, "{d}"),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Node(n) => write!(f, "{n}"),
        }
    }
}

// ── Converter contract ────────────────────────────────────────────

/// A value that could not be converted to (or from) the target native type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot convert {value} to {target}: {reason}")]
pub struct ConversionError {
    /// Rendering of the offending value.
    pub value: String,
    pub target: NativeType,
    pub reason: String,
}

impl ConversionError {
    pub fn new(value: impl fmt::Display, target: NativeType, reason: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            target,
            reason: reason.into(),
        }
    }
}

/// Bidirectional conversion between graph values and one native type.
pub trait ValueConverter: Send + Sync {
    /// Parse a stored value. Fails when the lexical form does not fit.
    fn convert_value(&self, value: &Value) -> std::result::Result<NativeValue, ConversionError>;

    /// Render a native value as a graph value. Fails only when handed a
    /// carrier variant this converter does not produce.
    fn convert_type(&self, native: &NativeValue) -> std::result::Result<Value, ConversionError>;
}

/// Author-declared relationships of a native type, used by fallback lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDecl {
    pub interfaces: Vec<NativeType>,
    pub superclass: Option<NativeType>,
}

impl TypeDecl {
    pub fn superclass(superclass: NativeType) -> Self {
        Self {
            interfaces: Vec::new(),
            superclass: Some(superclass),
        }
    }

    pub fn interfaces(interfaces: impl IntoIterator<Item = NativeType>) -> Self {
        Self {
            interfaces: interfaces.into_iter().collect(),
            superclass: None,
        }
    }
}

// ── Registry ──────────────────────────────────────────────────────

/// Registry of converters keyed by native type.
///
/// Registration is expected to finish before the registry is shared; after
/// that it is only read. Several converters may be registered for one tag:
/// the most recently registered one wins.
#[derive(Clone, Default)]
pub struct ValueConverterRegistry {
    converters: HashMap<NativeType, Vec<Arc<dyn ValueConverter>>>,
    declarations: HashMap<NativeType, TypeDecl>,
}

impl ValueConverterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in converter and declaration.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::install(&mut registry);
        registry
    }

    /// Register a converter. Later registrations for the same tag shadow earlier ones.
    pub fn register(&mut self, native_type: NativeType, converter: impl ValueConverter + 'static) {
        self.register_arc(native_type, Arc::new(converter));
    }

    pub fn register_arc(&mut self, native_type: NativeType, converter: Arc<dyn ValueConverter>) {
        tracing::debug!(%native_type, "Registered converter");
        self.converters.entry(native_type).or_default().push(converter);
    }

    /// Declare the interfaces and superclass of a native type.
    pub fn declare(&mut self, native_type: NativeType, decl: TypeDecl) {
        self.declarations.insert(native_type, decl);
    }

    /// Find the converter for a native type, falling back through declared
    /// interfaces (depth-first) and then the superclass chain.
    pub fn lookup(&self, native_type: &NativeType) -> Option<Arc<dyn ValueConverter>> {
        let mut visited = HashSet::new();
        self.lookup_in(native_type, &mut visited)
    }

    fn lookup_in(
        &self,
        native_type: &NativeType,
        visited: &mut HashSet<NativeType>,
    ) -> Option<Arc<dyn ValueConverter>> {
        if !visited.insert(native_type.clone()) {
            return None;
        }
        if let Some(found) = self.converters.get(native_type).and_then(|list| list.last()) {
            return Some(Arc::clone(found));
        }

        let decl = self.declarations.get(native_type)?;
        for interface in &decl.interfaces {
            if let Some(found) = self.lookup_in(interface, visited) {
                return Some(found);
            }
        }
        decl.superclass
            .as_ref()
            .and_then(|superclass| self.lookup_in(superclass, visited))
    }

    /// Like [`lookup`](Self::lookup), failing with `MissingConverter` on a miss.
    pub fn require(&self, native_type: &NativeType) -> Result<Arc<dyn ValueConverter>> {
        self.lookup(native_type)
            .ok_or_else(|| ViewError::MissingConverter {
                native_type: native_type.clone(),
            })
    }

    /// Whether some converter (exact or by fallback) handles this type.
    pub fn resolves(&self, native_type: &NativeType) -> bool {
        self.lookup(native_type).is_some()
    }

    /// Convert a stored value through the converter for `native_type`.
    pub fn to_native(&self, native_type: &NativeType, value: &Value) -> Result<NativeValue> {
        let converter = self.require(native_type)?;
        converter.convert_value(value).map_err(|e| {
            tracing::warn!(%native_type, %value, error = %e, "Value conversion failed");
            ViewError::from(e)
        })
    }

    /// Render a native value through the converter for `native_type`.
    pub fn to_value(&self, native_type: &NativeType, native: &NativeValue) -> Result<Value> {
        let converter = self.require(native_type)?;
        Ok(converter.convert_type(native)?)
    }

    /// Decode a stored value straight into a Rust type via its default native type.
    pub fn decode<T: NativeKind>(&self, value: &Value) -> Result<T> {
        let native_type = T::native_type();
        let native = self.to_native(&native_type, value)?;
        from_native::<T>(native, &native_type)
    }

    /// Encode a Rust value via its default native type.
    pub fn encode<T: NativeKind>(&self, value: T) -> Result<Value> {
        self.to_value(&T::native_type(), &value.into_native())
    }
}

impl fmt::Debug for ValueConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.converters.keys().map(NativeType::as_str).collect();
        types.sort_unstable();
        f.debug_struct("ValueConverterRegistry")
            .field("types", &types)
            .field("declarations", &self.declarations.len())
            .finish()
    }
}

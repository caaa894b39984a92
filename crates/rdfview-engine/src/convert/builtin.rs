//! Built-in converters for XSD-typed literals and resources.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat};
use rdfview_core::vocab::xsd;
use rdfview_core::{Literal, Node, Value};
use uuid::Uuid;

use super::{ConversionError, NativeType, NativeValue, TypeDecl, ValueConverter, ValueConverterRegistry};

type ConvResult<T> = Result<T, ConversionError>;

/// Register every built-in converter and the numeric widening declarations.
pub(super) fn install(registry: &mut ValueConverterRegistry) {
    registry.register(NativeType::BOOLEAN, BooleanConverter);
    registry.register(NativeType::BYTE, IntegerConverter::byte());
    registry.register(NativeType::SHORT, IntegerConverter::short());
    registry.register(NativeType::INT, IntegerConverter::int());
    registry.register(NativeType::LONG, IntegerConverter::long());
    registry.register(NativeType::UNSIGNED_INT, IntegerConverter::unsigned_int());
    registry.register(NativeType::FLOAT, FloatConverter::single());
    registry.register(NativeType::DOUBLE, FloatConverter::double());
    registry.register(NativeType::STRING, StringConverter);
    registry.register(NativeType::DATE_TIME, DateTimeConverter);
    registry.register(NativeType::DATE, DateConverter);
    registry.register(NativeType::URI, UriConverter);
    registry.register(NativeType::UUID, UuidConverter);
    registry.register(NativeType::RESOURCE, ResourceConverter);

    registry.declare(NativeType::BYTE, TypeDecl::superclass(NativeType::SHORT));
    registry.declare(NativeType::SHORT, TypeDecl::superclass(NativeType::INT));
    registry.declare(NativeType::INT, TypeDecl::superclass(NativeType::LONG));
    registry.declare(NativeType::UNSIGNED_INT, TypeDecl::superclass(NativeType::LONG));
    registry.declare(NativeType::FLOAT, TypeDecl::superclass(NativeType::DOUBLE));
}

/// The lexical form of a literal, or the IRI/label of a resource.
fn lexical(value: &Value) -> &str {
    match value {
        Value::Literal(lit) => &lit.lexical,
        Value::Resource(node) => node.as_str(),
    }
}

fn literal_only<'a>(value: &'a Value, target: &NativeType) -> ConvResult<&'a Literal> {
    value
        .as_literal()
        .ok_or_else(|| ConversionError::new(value, target.clone(), "expected a literal"))
}

fn unexpected(native: &NativeValue, target: &NativeType) -> ConversionError {
    ConversionError::new(
        native,
        target.clone(),
        format!("unexpected {} value", native.kind()),
    )
}

// ── Boolean ───────────────────────────────────────────────────────

/// `xsd:boolean`: accepts `true`, `false`, `1`, `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl ValueConverter for BooleanConverter {
    fn convert_value(&self, value: &Value) -> ConvResult<NativeValue> {
        let lit = literal_only(value, &NativeType::BOOLEAN)?;
        match lit.lexical.trim() {
            "true" | "1" => Ok(NativeValue::Boolean(true)),
            "false" | "0" => Ok(NativeValue::Boolean(false)),
            _ => Err(ConversionError::new(value, NativeType::BOOLEAN, "not a boolean")),
        }
    }

    fn convert_type(&self, native: &NativeValue) -> ConvResult<Value> {
        match native {
            NativeValue::Boolean(b) => {
                Ok(Literal::typed(b.to_string(), xsd::datatype(xsd::BOOLEAN)).into())
            }
            other => Err(unexpected(other, &NativeType::BOOLEAN)),
        }
    }
}

// ── Integers ──────────────────────────────────────────────────────

/// Bounded integer types, all carried as `i64`.
#[derive(Debug, Clone)]
pub struct IntegerConverter {
    native_type: NativeType,
    datatype: &'static str,
    min: i64,
    max: i64,
}

impl IntegerConverter {
    pub fn byte() -> Self {
        Self::bounded(NativeType::BYTE, xsd::BYTE, i8::MIN.into(), i8::MAX.into())
    }

    pub fn short() -> Self {
        Self::bounded(NativeType::SHORT, xsd::SHORT, i16::MIN.into(), i16::MAX.into())
    }

    pub fn int() -> Self {
        Self::bounded(NativeType::INT, xsd::INT, i32::MIN.into(), i32::MAX.into())
    }

    pub fn long() -> Self {
        Self::bounded(NativeType::LONG, xsd::LONG, i64::MIN, i64::MAX)
    }

    pub fn unsigned_int() -> Self {
        Self::bounded(NativeType::UNSIGNED_INT, xsd::UNSIGNED_INT, 0, u32::MAX.into())
    }

    fn bounded(native_type: NativeType, datatype: &'static str, min: i64, max: i64) -> Self {
        Self {
            native_type,
            datatype,
            min,
            max,
        }
    }

    fn check(&self, shown: impl std::fmt::Display, n: i64) -> ConvResult<i64> {
        if n < self.min || n > self.max {
            return Err(ConversionError::new(
                shown,
                self.native_type.clone(),
                format!("out of range {}..={}", self.min, self.max),
            ));
        }
        Ok(n)
    }
}

impl ValueConverter for IntegerConverter {
    fn convert_value(&self, value: &Value) -> ConvResult<NativeValue> {
        let lit = literal_only(value, &self.native_type)?;
        let text = lit.lexical.trim();
        let text = text.strip_prefix('+').unwrap_or(text);
        let n: i64 = text.parse().map_err(|e: std::num::ParseIntError| {
            ConversionError::new(value, self.native_type.clone(), e.to_string())
        })?;
        self.check(value, n).map(NativeValue::Integer)
    }

    fn convert_type(&self, native: &NativeValue) -> ConvResult<Value> {
        match native {
            NativeValue::Integer(n) => {
                let n = self.check(native, *n)?;
                Ok(Literal::typed(n.to_string(), xsd::datatype(self.datatype)).into())
            }
            other => Err(unexpected(other, &self.native_type)),
        }
    }
}

// ── Floating point ────────────────────────────────────────────────

/// `xsd:float` / `xsd:double`, carried as `f64`. Understands `INF`, `-INF`, `NaN`.
#[derive(Debug, Clone)]
pub struct FloatConverter {
    single: bool,
}

impl FloatConverter {
    pub fn single() -> Self {
        Self { single: true }
    }

    pub fn double() -> Self {
        Self { single: false }
    }

    fn native_type(&self) -> NativeType {
        if self.single {
            NativeType::FLOAT
        } else {
            NativeType::DOUBLE
        }
    }

    fn datatype(&self) -> &'static str {
        if self.single {
            xsd::FLOAT
        } else {
            xsd::DOUBLE
        }
    }
}

fn render_float(x: f64, single: bool) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "INF" } else { "-INF" }.to_string()
    } else if single {
        (x as f32).to_string()
    } else {
        x.to_string()
    }
}

impl ValueConverter for FloatConverter {
    fn convert_value(&self, value: &Value) -> ConvResult<NativeValue> {
        let lit = literal_only(value, &self.native_type())?;
        let text = lit.lexical.trim();
        let parsed = match text {
            "INF" | "+INF" => f64::INFINITY,
            "-INF" => f64::NEG_INFINITY,
            "NaN" => f64::NAN,
            _ if self.single => text
                .parse::<f32>()
                .map(f64::from)
                .map_err(|e| ConversionError::new(value, self.native_type(), e.to_string()))?,
            _ => text
                .parse::<f64>()
                .map_err(|e| ConversionError::new(value, self.native_type(), e.to_string()))?,
        };
        Ok(NativeValue::Float(parsed))
    }

    fn convert_type(&self, native: &NativeValue) -> ConvResult<Value> {
        match native {
            NativeValue::Float(x) if self.single && x.is_finite() && x.abs() > f64::from(f32::MAX) => {
                Err(ConversionError::new(native, NativeType::FLOAT, "out of range for float"))
            }
            NativeValue::Float(x) => Ok(Literal::typed(
                render_float(*x, self.single),
                xsd::datatype(self.datatype()),
            )
            .into()),
            other => Err(unexpected(other, &self.native_type())),
        }
    }
}

// ── Strings ───────────────────────────────────────────────────────

/// Any literal's lexical form (or a resource's IRI) as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl ValueConverter for StringConverter {
    fn convert_value(&self, value: &Value) -> ConvResult<NativeValue> {
        Ok(NativeValue::String(lexical(value).to_string()))
    }

    fn convert_type(&self, native: &NativeValue) -> ConvResult<Value> {
        match native {
            NativeValue::String(s) => Ok(Literal::string(s.clone()).into()),
            other => Err(unexpected(other, &NativeType::STRING)),
        }
    }
}

// ── Dates and times ───────────────────────────────────────────────

/// `xsd:dateTime`. Values without an offset are read as UTC.
///
/// Only four-digit years are written; the local year (in the value's own
/// offset) must fall in `0001..=9999`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

const DATE_TIME_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

impl ValueConverter for DateTimeConverter {
    fn convert_value(&self, value: &Value) -> ConvResult<NativeValue> {
        let lit = literal_only(value, &NativeType::DATE_TIME)?;
        let text = lit.lexical.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(NativeValue::DateTime(dt));
        }
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| NativeValue::DateTime(naive.and_utc().fixed_offset()))
            .map_err(|e| ConversionError::new(value, NativeType::DATE_TIME, e.to_string()))
    }

    fn convert_type(&self, native: &NativeValue) -> ConvResult<Value> {
        match native {
            NativeValue::DateTime(dt) if !DATE_TIME_YEARS.contains(&dt.year()) => Err(
                ConversionError::new(native, NativeType::DATE_TIME, "year outside 0001..=9999"),
            ),
            NativeValue::DateTime(dt) => Ok(Literal::typed(
                dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                xsd::datatype(xsd::DATE_TIME),
            )
            .into()),
            other => Err(unexpected(other, &NativeType::DATE_TIME)),
        }
    }
}

/// `xsd:date`. A trailing timezone is accepted and ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateConverter;

fn strip_timezone(text: &str) -> &str {
    if let Some(stripped) = text.strip_suffix('Z') {
        return stripped;
    }
    let bytes = text.as_bytes();
    let n = bytes.len();
    if n > 10 && matches!(bytes[n - 6], b'+' | b'-') && bytes[n - 3] == b':' {
        return &text[..n - 6];
    }
    text
}

impl ValueConverter for DateConverter {
    fn convert_value(&self, value: &Value) -> ConvResult<NativeValue> {
        let lit = literal_only(value, &NativeType::DATE)?;
        NaiveDate::parse_from_str(strip_timezone(lit.lexical.trim()), "%Y-%m-%d")
            .map(NativeValue::Date)
            .map_err(|e| ConversionError::new(value, NativeType::DATE, e.to_string()))
    }

    fn convert_type(&self, native: &NativeValue) -> ConvResult<Value> {
        match native {
            NativeValue::Date(d) => Ok(Literal::typed(
                d.format("%Y-%m-%d").to_string(),
                xsd::datatype(xsd::DATE),
            )
            .into()),
            other => Err(unexpected(other, &NativeType::DATE)),
        }
    }
}

// ── Identifiers ───────────────────────────────────────────────────

/// `xsd:anyURI` literals (or IRI resources) as IRI nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriConverter;

impl ValueConverter for UriConverter {
    fn convert_value(&self, value: &Value) -> ConvResult<NativeValue> {
        match value {
            Value::Resource(node @ Node::Iri(_)) => Ok(NativeValue::Node(node.clone())),
            Value::Resource(Node::Blank(_)) => Err(ConversionError::new(
                value,
                NativeType::URI,
                "blank nodes have no IRI",
            )),
            Value::Literal(lit) => Node::iri(lit.lexical.trim())
                .map(NativeValue::Node)
                .map_err(|e| ConversionError::new(value, NativeType::URI, e.to_string())),
        }
    }

    fn convert_type(&self, native: &NativeValue) -> ConvResult<Value> {
        match native {
            NativeValue::Node(Node::Iri(iri)) => {
                Ok(Literal::typed(iri.clone(), xsd::datatype(xsd::ANY_URI)).into())
            }
            other => Err(unexpected(other, &NativeType::URI)),
        }
    }
}

/// UUIDs, stored as plain strings; `urn:uuid:` forms are also read.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidConverter;

impl ValueConverter for UuidConverter {
    fn convert_value(&self, value: &Value) -> ConvResult<NativeValue> {
        let text = lexical(value).trim();
        let text = text.strip_prefix("urn:uuid:").unwrap_or(text);
        Uuid::parse_str(text)
            .map(NativeValue::Uuid)
            .map_err(|e| ConversionError::new(value, NativeType::UUID, e.to_string()))
    }

    fn convert_type(&self, native: &NativeValue) -> ConvResult<Value> {
        match native {
            NativeValue::Uuid(u) => Ok(Literal::string(u.hyphenated().to_string()).into()),
            other => Err(unexpected(other, &NativeType::UUID)),
        }
    }
}

/// Identity conversion between resource values and nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceConverter;

impl ValueConverter for ResourceConverter {
    fn convert_value(&self, value: &Value) -> ConvResult<NativeValue> {
        match value {
            Value::Resource(node) => Ok(NativeValue::Node(node.clone())),
            Value::Literal(_) => Err(ConversionError::new(
                value,
                NativeType::RESOURCE,
                "expected a resource, found a literal",
            )),
        }
    }

    fn convert_type(&self, native: &NativeValue) -> ConvResult<Value> {
        match native {
            NativeValue::Node(node) => Ok(Value::Resource(node.clone())),
            other => Err(unexpected(other, &NativeType::RESOURCE)),
        }
    }
}

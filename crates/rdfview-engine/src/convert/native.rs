//! Moving between Rust types and the [`NativeValue`] carrier.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rdfview_core::Node;
use uuid::Uuid;

use super::{ConversionError, NativeType, NativeValue};
use crate::error::{Result, ViewError};

/// A Rust type that can be carried as a [`NativeValue`].
pub trait NativeKind: Sized {
    /// The registry tag used when no schema says otherwise.
    fn native_type() -> NativeType;

    fn into_native(self) -> NativeValue;

    /// Extract from the carrier, handing the value back when it does not fit.
    fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue>;
}

/// Extract a `T`, reporting a conversion error against `target` on mismatch.
pub(crate) fn from_native<T: NativeKind>(native: NativeValue, target: &NativeType) -> Result<T> {
    T::from_native(native).map_err(|rejected| {
        ViewError::ValueConversion(ConversionError::new(
            &rejected,
            target.clone(),
            format!(
                "{} value does not fit {}",
                rejected.kind(),
                std::any::type_name::<T>()
            ),
        ))
    })
}

impl NativeKind for bool {
    fn native_type() -> NativeType {
        NativeType::BOOLEAN
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Boolean(self)
    }

    fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue> {
        match native {
            NativeValue::Boolean(b) => Ok(b),
            other => Err(other),
        }
    }
}

macro_rules! integer_kind {
    ($($ty:ty => $tag:ident),* $(,)?) => {$(
        impl NativeKind for $ty {
            fn native_type() -> NativeType {
                NativeType::$tag
            }

            fn into_native(self) -> NativeValue {
                NativeValue::Integer(i64::from(self))
            }

            fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue> {
                match native {
                    NativeValue::Integer(n) => <$ty>::try_from(n).map_err(|_| NativeValue::Integer(n)),
                    other => Err(other),
                }
            }
        }
    )*};
}

integer_kind! {
    i8 => BYTE,
    i16 => SHORT,
    i32 => INT,
    i64 => LONG,
    u32 => UNSIGNED_INT,
}

impl NativeKind for f64 {
    fn native_type() -> NativeType {
        NativeType::DOUBLE
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Float(self)
    }

    fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue> {
        match native {
            NativeValue::Float(x) => Ok(x),
            NativeValue::Integer(n) => Ok(n as f64),
            other => Err(other),
        }
    }
}

impl NativeKind for f32 {
    fn native_type() -> NativeType {
        NativeType::FLOAT
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Float(f64::from(self))
    }

    fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue> {
        match native {
            NativeValue::Float(x) => Ok(x as f32),
            other => Err(other),
        }
    }
}

impl NativeKind for String {
    fn native_type() -> NativeType {
        NativeType::STRING
    }

    fn into_native(self) -> NativeValue {
        NativeValue::String(self)
    }

    fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue> {
        match native {
            NativeValue::String(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl NativeKind for DateTime<FixedOffset> {
    fn native_type() -> NativeType {
        NativeType::DATE_TIME
    }

    fn into_native(self) -> NativeValue {
        NativeValue::DateTime(self)
    }

    fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue> {
        match native {
            NativeValue::DateTime(dt) => Ok(dt),
            other => Err(other),
        }
    }
}

impl NativeKind for DateTime<Utc> {
    fn native_type() -> NativeType {
        NativeType::DATE_TIME
    }

    fn into_native(self) -> NativeValue {
        NativeValue::DateTime(self.fixed_offset())
    }

    fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue> {
        match native {
            NativeValue::DateTime(dt) => Ok(dt.with_timezone(&Utc)),
            other => Err(other),
        }
    }
}

impl NativeKind for NaiveDate {
    fn native_type() -> NativeType {
        NativeType::DATE
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Date(self)
    }

    fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue> {
        match native {
            NativeValue::Date(d) => Ok(d),
            other => Err(other),
        }
    }
}

impl NativeKind for Uuid {
    fn native_type() -> NativeType {
        NativeType::UUID
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Uuid(self)
    }

    fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue> {
        match native {
            NativeValue::Uuid(u) => Ok(u),
            other => Err(other),
        }
    }
}

impl NativeKind for Node {
    fn native_type() -> NativeType {
        NativeType::RESOURCE
    }

    fn into_native(self) -> NativeValue {
        NativeValue::Node(self)
    }

    fn from_native(native: NativeValue) -> std::result::Result<Self, NativeValue> {
        match native {
            NativeValue::Node(n) => Ok(n),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_rejects_out_of_range() {
        assert_eq!(i8::from_native(NativeValue::Integer(-128)), Ok(-128));
        assert!(i8::from_native(NativeValue::Integer(300)).is_err());
        assert!(u32::from_native(NativeValue::Integer(-1)).is_err());
    }

    #[test]
    fn mismatch_names_rust_type() {
        let err = from_native::<bool>(NativeValue::Integer(1), &NativeType::BOOLEAN).unwrap_err();
        match err {
            ViewError::ValueConversion(e) => {
                assert_eq!(e.target, NativeType::BOOLEAN);
                assert!(e.reason.contains("bool"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn utc_roundtrip_through_carrier() {
        let now = Utc::now();
        assert_eq!(DateTime::<Utc>::from_native(now.into_native()), Ok(now));
    }
}

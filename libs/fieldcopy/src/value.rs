use std::fmt;

use crate::schema::FieldType;

/// Canonical value representation.
///
/// Every field read from a source record passes through this type before it
/// reaches the target, so converters only ever deal with one shape.
/// Integers are widened on read:
/// - signed (`i8`..`i64`) → `Int64`
/// - unsigned (`u8`..`u64`, `usize`) → `UInt64`
/// - `f32`, `f64` → `Float64`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Bool(bool),
    String(String),
    /// Opaque binary data.
    Bytes(Vec<u8>),
    Null,
}

/// Discriminant of [`Value`]. Used in diagnostics and in [`FieldType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ValueKind {
    Int64,
    UInt64,
    Float64,
    Bool,
    String,
    Bytes,
    Null,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int64(_) => ValueKind::Int64,
            Value::UInt64(_) => ValueKind::UInt64,
            Value::Float64(_) => ValueKind::Float64,
            Value::Bool(_) => ValueKind::Bool,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Null => ValueKind::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            Value::UInt64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int64(v) => u64::try_from(*v).ok(),
            Value::UInt64(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int64(v) => write!(f, "{v}"),
            Value::UInt64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Null => f.write_str("null"),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Bridge between a Rust field type and [`Value`].
///
/// `#[derive(Record)]` requires every participating field to implement this.
/// `from_value` hands the value back on mismatch so the caller can report
/// what was actually offered.
pub trait FieldValue: Sized {
    fn field_type() -> FieldType;
    fn to_value(&self) -> Value;
    fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! signed_field_value {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            fn field_type() -> FieldType {
                FieldType::new(stringify!($ty), ValueKind::Int64)
            }

            fn to_value(&self) -> Value {
                Value::Int64(i64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self, Value> {
                match value.as_i64().and_then(|v| <$ty>::try_from(v).ok()) {
                    Some(v) => Ok(v),
                    None => Err(value),
                }
            }
        }
    )*};
}

macro_rules! unsigned_field_value {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            fn field_type() -> FieldType {
                FieldType::new(stringify!($ty), ValueKind::UInt64)
            }

            fn to_value(&self) -> Value {
                // usize is at most 64 bits on every supported target.
                Value::UInt64(*self as u64)
            }

            fn from_value(value: Value) -> Result<Self, Value> {
                match value.as_u64().and_then(|v| <$ty>::try_from(v).ok()) {
                    Some(v) => Ok(v),
                    None => Err(value),
                }
            }
        }
    )*};
}

signed_field_value!(i8, i16, i32, i64);
unsigned_field_value!(u8, u16, u32, u64, usize);

impl FieldValue for f64 {
    fn field_type() -> FieldType {
        FieldType::new("f64", ValueKind::Float64)
    }

    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float64(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FieldValue for f32 {
    fn field_type() -> FieldType {
        FieldType::new("f32", ValueKind::Float64)
    }

    fn to_value(&self) -> Value {
        Value::Float64(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            // Precision loss is accepted, overflow of a finite value is not.
            Value::Float64(v) if !v.is_finite() || v.abs() <= f64::from(f32::MAX) => Ok(v as f32),
            other => Err(other),
        }
    }
}

impl FieldValue for bool {
    fn field_type() -> FieldType {
        FieldType::new("bool", ValueKind::Bool)
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FieldValue for String {
    fn field_type() -> FieldType {
        FieldType::new("String", ValueKind::String)
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FieldValue for Vec<u8> {
    fn field_type() -> FieldType {
        FieldType::new("Vec<u8>", ValueKind::Bytes)
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bytes(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn field_type() -> FieldType {
        T::field_type().into_nullable()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrowing_rejects_out_of_range() {
        assert_eq!(i32::from_value(Value::Int64(22)), Ok(22));
        assert_eq!(
            i8::from_value(Value::Int64(300)),
            Err(Value::Int64(300))
        );
        assert_eq!(u8::from_value(Value::UInt64(7)), Ok(7));
    }

    #[test]
    fn test_integers_cross_signedness_when_in_range() {
        assert_eq!(u32::from_value(Value::Int64(22)), Ok(22));
        assert_eq!(i16::from_value(Value::UInt64(22)), Ok(22));
        assert_eq!(u8::from_value(Value::Int64(-1)), Err(Value::Int64(-1)));
        assert_eq!(
            i64::from_value(Value::UInt64(u64::MAX)),
            Err(Value::UInt64(u64::MAX))
        );
        assert_eq!(Value::Int64(-1).as_u64(), None);
        assert_eq!(Value::UInt64(5).as_i64(), Some(5));
    }

    #[test]
    fn test_f32_keeps_non_finite_values() {
        assert_eq!(f32::from_value(Value::Float64(f64::INFINITY)), Ok(f32::INFINITY));
        assert_eq!(
            f32::from_value(Value::Float64(f64::NEG_INFINITY)),
            Ok(f32::NEG_INFINITY)
        );
        assert!(f32::from_value(Value::Float64(f64::NAN)).unwrap().is_nan());
        assert_eq!(f32::from_value(Value::Float64(1e300)), Err(Value::Float64(1e300)));
    }

    #[test]
    fn test_kind_mismatch_hands_value_back() {
        let rejected = i32::from_value(Value::from("22")).unwrap_err();
        assert_eq!(rejected, Value::String("22".to_string()));
    }

    #[test]
    fn test_option_maps_null() {
        assert_eq!(Option::<i32>::from_value(Value::Null), Ok(None));
        assert_eq!(Option::<i32>::from_value(Value::Int64(5)), Ok(Some(5)));
        assert_eq!(Some(5i32).to_value(), Value::Int64(5));
        assert_eq!(None::<String>.to_value(), Value::Null);
        assert!(Option::<String>::field_type().nullable);
        assert!(!String::field_type().nullable);
    }

    #[test]
    fn test_non_nullable_rejects_null() {
        assert_eq!(String::from_value(Value::Null), Err(Value::Null));
    }

    #[test]
    fn test_declared_type_names() {
        assert_eq!(i32::field_type().name, "i32");
        assert_eq!(usize::field_type().kind, ValueKind::UInt64);
        assert_eq!(Option::<f64>::field_type().name, "f64");
    }
}

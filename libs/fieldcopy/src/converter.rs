use std::collections::HashSet;

use crate::error::ConvertError;
use crate::schema::FieldType;
use crate::value::{Value, ValueKind};

/// Field-level value converter.
///
/// Called once per matched field when supplied to a copy, with the raw source
/// value, the declared type of the source field and the target field's name.
/// Whatever it returns is written to the target; if that value does not fit
/// the target field the copy fails with `ConversionFailed`.
///
/// Closures with the same signature implement this trait directly; use
/// [`converter_fn`] when the closure's argument types need to be inferred.
pub trait FieldConverter: Send + Sync {
    fn convert(
        &self,
        value: Value,
        declared: &FieldType,
        target_field: &str,
    ) -> Result<Value, ConvertError>;
}

impl<F> FieldConverter for F
where
    F: Fn(Value, &FieldType, &str) -> Result<Value, ConvertError> + Send + Sync,
{
    fn convert(
        &self,
        value: Value,
        declared: &FieldType,
        target_field: &str,
    ) -> Result<Value, ConvertError> {
        self(value, declared, target_field)
    }
}

/// Pins a closure to the converter signature.
///
/// ```
/// use fieldcopy::converter::converter_fn;
/// use fieldcopy::value::Value;
///
/// let age_as_int = converter_fn(|value, _declared, field| {
///     if field == "age" {
///         if let Some(s) = value.as_str() {
///             return Ok(Value::Int64(s.parse()?));
///         }
///     }
///     Ok(value)
/// });
/// # let _ = age_as_int;
/// ```
pub fn converter_fn<F>(f: F) -> F
where
    F: Fn(Value, &FieldType, &str) -> Result<Value, ConvertError> + Send + Sync,
{
    f
}

/// Value as-is. Behaves like copying without a converter, except that a
/// mismatch surfaces as `ConversionFailed` instead of `TypeIncompatible`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl FieldConverter for Passthrough {
    fn convert(&self, value: Value, _: &FieldType, _: &str) -> Result<Value, ConvertError> {
        Ok(value)
    }
}

/// Parses text into a typed value for a fixed set of target fields.
///
/// Other fields, and non-text values, pass through untouched.
#[derive(Debug, Clone)]
pub struct ParseFields {
    fields: HashSet<String>,
    kind: ValueKind,
}

impl ParseFields {
    /// Parse the named target fields as `kind`.
    pub fn new<I, S>(kind: ValueKind, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            kind,
        }
    }

    /// Parse the named target fields as signed integers.
    pub fn integers<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ValueKind::Int64, fields)
    }
}

impl FieldConverter for ParseFields {
    fn convert(
        &self,
        value: Value,
        _declared: &FieldType,
        target_field: &str,
    ) -> Result<Value, ConvertError> {
        if !self.fields.contains(target_field) {
            return Ok(value);
        }
        let text = match value {
            Value::String(text) => text,
            other => return Ok(other),
        };
        let text = text.trim();
        let parsed = match self.kind {
            ValueKind::Int64 => Value::Int64(text.parse()?),
            ValueKind::UInt64 => Value::UInt64(text.parse()?),
            ValueKind::Float64 => Value::Float64(text.parse()?),
            ValueKind::Bool => Value::Bool(text.parse()?),
            ValueKind::String => Value::String(text.to_string()),
            ValueKind::Bytes => Value::Bytes(text.as_bytes().to_vec()),
            ValueKind::Null => Value::Null,
        };
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_type() -> FieldType {
        FieldType::new("String", ValueKind::String)
    }

    #[test]
    fn test_parse_fields_converts_named_field() {
        let conv = ParseFields::integers(["age"]);
        let out = conv.convert(Value::from("22"), &text_type(), "age").unwrap();
        assert_eq!(out, Value::Int64(22));
    }

    #[test]
    fn test_parse_fields_ignores_other_fields() {
        let conv = ParseFields::integers(["age"]);
        let out = conv.convert(Value::from("22"), &text_type(), "id").unwrap();
        assert_eq!(out, Value::from("22"));
    }

    #[test]
    fn test_parse_fields_reports_bad_input() {
        let conv = ParseFields::integers(["age"]);
        let err = conv
            .convert(Value::from("twenty"), &text_type(), "age")
            .unwrap_err();
        assert_eq!(err.message, "invalid digit found in string");
    }

    #[test]
    fn test_closure_converter_sees_declared_type() {
        let conv = converter_fn(|value, declared, _field| {
            if declared.name == "String" {
                Ok(Value::Bool(true))
            } else {
                Ok(value)
            }
        });
        assert_eq!(
            conv.convert(Value::from("x"), &text_type(), "flag").unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_passthrough_is_identity() {
        let out = Passthrough.convert(Value::Int64(3), &text_type(), "n").unwrap();
        assert_eq!(out, Value::Int64(3));
    }
}

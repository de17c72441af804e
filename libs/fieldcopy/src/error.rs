use std::fmt;

use crate::schema::FieldType;

/// Failure raised by a [`FieldConverter`](crate::converter::FieldConverter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    pub message: String,
}

impl ConvertError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }

    /// Add context to the error.
    ///
    /// Produces: `"context: original message"`.
    pub fn with_context(self, ctx: impl fmt::Display) -> Self {
        Self {
            message: format!("{ctx}: {}", self.message),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConvertError {}

// ---------------------------------------------------------------------------
// From impls: parse errors a converter typically hits → ConvertError
// ---------------------------------------------------------------------------

impl From<std::num::ParseIntError> for ConvertError {
    fn from(e: std::num::ParseIntError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<std::num::ParseFloatError> for ConvertError {
    fn from(e: std::num::ParseFloatError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<std::str::ParseBoolError> for ConvertError {
    fn from(e: std::str::ParseBoolError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<std::num::TryFromIntError> for ConvertError {
    fn from(e: std::num::TryFromIntError) -> Self {
        Self::new(e.to_string())
    }
}

/// Failure raised by [`Construct::construct`](crate::record::Construct::construct).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructError {
    pub message: String,
}

impl ConstructError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

impl fmt::Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConstructError {}

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Source or target absent. Nothing was written.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("field '{field}': cannot assign {source_type} to {target_type} without a converter")]
    TypeIncompatible {
        field: String,
        source_type: FieldType,
        target_type: FieldType,
    },

    #[error("field '{field}': conversion failed: {source}")]
    ConversionFailed { field: String, source: ConvertError },

    #[error("cannot construct {type_name}: {source}")]
    ConstructionFailed {
        type_name: String,
        source: ConstructError,
    },

    /// A record's field accessors disagree with its own schema.
    #[error("schema error: {0}")]
    Schema(String),
}

impl CopyError {
    /// Field the error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            CopyError::TypeIncompatible { field, .. } | CopyError::ConversionFailed { field, .. } => {
                Some(field.as_str())
            }
            _ => None,
        }
    }

    /// `TypeIncompatible` and `ConversionFailed` are handled identically by callers.
    pub fn is_field_error(&self) -> bool {
        self.field().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn test_convert_error_from_parse() {
        let err: ConvertError = "abc".parse::<i32>().unwrap_err().into();
        assert_eq!(err.message, "invalid digit found in string");
        let err = err.with_context("age");
        assert_eq!(err.to_string(), "age: invalid digit found in string");
    }

    #[test]
    fn test_type_incompatible_message() {
        let err = CopyError::TypeIncompatible {
            field: "age".to_string(),
            source_type: FieldType::new("String", ValueKind::String),
            target_type: FieldType::new("i32", ValueKind::Int64).into_nullable(),
        };
        assert_eq!(
            err.to_string(),
            "field 'age': cannot assign String to Option<i32> without a converter"
        );
        assert_eq!(err.field(), Some("age"));
    }

    #[test]
    fn test_conversion_failed_exposes_source() {
        use std::error::Error;

        let err = CopyError::ConversionFailed {
            field: "age".to_string(),
            source: ConvertError::new("bad digit"),
        };
        assert!(err.source().is_some());
        assert!(err.is_field_error());
        assert!(!CopyError::InvalidArgument("source is absent").is_field_error());
    }
}

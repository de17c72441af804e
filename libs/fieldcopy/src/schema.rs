use std::fmt;

use crate::value::ValueKind;

/// Declared type of a record field.
///
/// `name` is the Rust type name as written in the struct (`"String"`, `"i32"`)
/// with any `Option<..>` wrapper folded into `nullable`. It is what converters
/// receive as the declared source type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FieldType {
    pub name: String,
    pub kind: ValueKind,
    #[serde(default)]
    pub nullable: bool,
}

impl FieldType {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
        }
    }

    pub fn into_nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    /// Whether a value of this type can be written to `target` as-is.
    ///
    /// Types must be identical; the only relaxation is that a non-nullable
    /// source fits a nullable target (`String` → `Option<String>`).
    pub fn is_assignable_to(&self, target: &FieldType) -> bool {
        self.name == target.name && self.kind == target.kind && (!self.nullable || target.nullable)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "Option<{}>", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A single field in a schema.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Type-level description of a record.
///
/// Field position in `fields` is the index passed to
/// [`Record::read_field`](crate::record::Record::read_field) and
/// [`Record::write_field`](crate::record::Record::write_field).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Schema {
    pub type_name: String,
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(type_name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Position of the field called `name`. Case-sensitive.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_type(name: &str, kind: ValueKind) -> FieldType {
        FieldType::new(name, kind)
    }

    #[test]
    fn test_identical_types_are_assignable() {
        let t = make_type("String", ValueKind::String);
        assert!(t.is_assignable_to(&t.clone()));
    }

    #[test]
    fn test_text_not_assignable_to_integer() {
        let text = make_type("String", ValueKind::String);
        let int = make_type("i32", ValueKind::Int64);
        assert!(!text.is_assignable_to(&int));
    }

    #[test]
    fn test_same_kind_different_width_not_assignable() {
        let wide = make_type("i64", ValueKind::Int64);
        let narrow = make_type("i32", ValueKind::Int64);
        assert!(!wide.is_assignable_to(&narrow));
    }

    #[test]
    fn test_nullability_direction() {
        let plain = make_type("i32", ValueKind::Int64);
        let nullable = plain.clone().into_nullable();
        assert!(plain.is_assignable_to(&nullable));
        assert!(!nullable.is_assignable_to(&plain));
        assert_eq!(nullable.to_string(), "Option<i32>");
    }

    #[test]
    fn test_index_of_is_case_sensitive() {
        let schema = Schema::new(
            "Person",
            vec![
                Field::new("id", make_type("String", ValueKind::String)),
                Field::new("Name", make_type("String", ValueKind::String)),
            ],
        );
        assert_eq!(schema.index_of("id"), Some(0));
        assert_eq!(schema.index_of("Name"), Some(1));
        assert_eq!(schema.index_of("name"), None);
        assert_eq!(schema.len(), 2);
    }
}

use std::any::TypeId;
use std::fmt;

use crate::record::{Record, short_type_name};
use crate::schema::{FieldType, Schema};

/// Cache key: one (source type, target type) combination.
///
/// Equality and hashing use the `TypeId`s only; the names are carried for logs.
#[derive(Debug, Clone, Copy)]
pub struct TypePairKey {
    pub source: TypeId,
    pub target: TypeId,
    source_name: &'static str,
    target_name: &'static str,
}

impl TypePairKey {
    pub fn of<S: Record, T: Record>() -> Self {
        Self {
            source: TypeId::of::<S>(),
            target: TypeId::of::<T>(),
            source_name: short_type_name::<S>(),
            target_name: short_type_name::<T>(),
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source_name
    }

    pub fn target_name(&self) -> &'static str {
        self.target_name
    }
}

impl PartialEq for TypePairKey {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.target == other.target
    }
}

impl Eq for TypePairKey {}

impl std::hash::Hash for TypePairKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
    }
}

impl fmt::Display for TypePairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_name, self.target_name)
    }
}

/// One side of a binding: position in the record's schema plus declared type.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldSlot {
    /// Position in `schema.fields`, passed to `read_field` / `write_field`.
    pub index: usize,
    pub field_type: FieldType,
}

/// One matched field: same name on both sides.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldBinding {
    pub name: String,
    pub source: FieldSlot,
    pub target: FieldSlot,
    /// Source type can be written to the target without a converter.
    pub assignable: bool,
}

/// Ordered field bindings for one type pair.
///
/// Built once per pair and shared read-only afterwards. Only names present on
/// both sides participate; fields unique to either side are ignored. Order
/// follows the source schema's declaration order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldPlan {
    pub source_type: String,
    pub target_type: String,
    pub bindings: Vec<FieldBinding>,
    /// Source fields with no counterpart on the target.
    pub unmatched_source: Vec<String>,
    /// Target fields with no counterpart on the source.
    pub unmatched_target: Vec<String>,
}

impl FieldPlan {
    pub fn build(source: &Schema, target: &Schema) -> Self {
        let mut bindings = Vec::new();
        let mut unmatched_source = Vec::new();

        for (source_index, field) in source.fields.iter().enumerate() {
            let Some(target_index) = target.index_of(&field.name) else {
                unmatched_source.push(field.name.clone());
                continue;
            };
            let target_type = target.fields[target_index].field_type.clone();
            bindings.push(FieldBinding {
                name: field.name.clone(),
                assignable: field.field_type.is_assignable_to(&target_type),
                source: FieldSlot {
                    index: source_index,
                    field_type: field.field_type.clone(),
                },
                target: FieldSlot {
                    index: target_index,
                    field_type: target_type,
                },
            });
        }

        let unmatched_target = target
            .fields
            .iter()
            .filter(|f| source.index_of(&f.name).is_none())
            .map(|f| f.name.clone())
            .collect();

        Self {
            source_type: source.type_name.clone(),
            target_type: target.type_name.clone(),
            bindings,
            unmatched_source,
            unmatched_target,
        }
    }

    pub fn for_types<S: Record, T: Record>() -> Self {
        Self::build(&S::schema(), &T::schema())
    }

    pub fn matched_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.name.as_str())
    }

    /// Bindings that need a converter to succeed.
    pub fn mismatched(&self) -> impl Iterator<Item = &FieldBinding> {
        self.bindings.iter().filter(|b| !b.assignable)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

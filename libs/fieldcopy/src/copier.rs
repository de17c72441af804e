use std::sync::{Arc, OnceLock};

use crate::cache::PlanCache;
use crate::converter::FieldConverter;
use crate::error::{ConvertError, CopyError};
use crate::plan::FieldPlan;
use crate::record::{Construct, Record, short_type_name};

/// Copies same-named fields from one record to another.
///
/// Field discovery goes through a [`PlanCache`], so it happens once per
/// (source type, target type) pair no matter how many copies are made.
/// Cloning a copier shares its cache.
///
/// Copies are not transactional: fields are written in plan order and a
/// failure leaves the fields before it written.
#[derive(Debug, Clone, Default)]
pub struct FieldCopier {
    cache: Arc<PlanCache>,
}

static GLOBAL: OnceLock<FieldCopier> = OnceLock::new();

impl FieldCopier {
    /// A copier with its own, empty plan cache.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: Arc<PlanCache>) -> Self {
        Self { cache }
    }

    /// The process-wide copier. Its cache lives for the rest of the process.
    pub fn global() -> &'static FieldCopier {
        GLOBAL.get_or_init(FieldCopier::new)
    }

    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    /// Field plan for `S → T`, built on first use.
    pub fn plan<S: Record, T: Record>(&self) -> Arc<FieldPlan> {
        self.cache.get_or_build::<S, T>()
    }

    /// Copy matching fields as-is. Fails with `TypeIncompatible` on the
    /// first matched field whose types differ.
    pub fn copy<S: Record, T: Record>(&self, source: &S, target: &mut T) -> Result<(), CopyError> {
        let plan = self.plan::<S, T>();
        apply(&plan, source, target, None)
    }

    /// Copy matching fields, passing every value through `converter`.
    pub fn copy_with<S: Record, T: Record>(
        &self,
        source: &S,
        target: &mut T,
        converter: &dyn FieldConverter,
    ) -> Result<(), CopyError> {
        let plan = self.plan::<S, T>();
        apply(&plan, source, target, Some(converter))
    }

    /// Copy between possibly absent records.
    ///
    /// Either side missing is `InvalidArgument` and nothing is written.
    pub fn copy_opt<S: Record, T: Record>(
        &self,
        source: Option<&S>,
        target: Option<&mut T>,
        converter: Option<&dyn FieldConverter>,
    ) -> Result<(), CopyError> {
        let (source, target) = match (source, target) {
            (Some(s), Some(t)) => (s, t),
            (None, None) => return Err(CopyError::InvalidArgument("source and target are absent")),
            (None, Some(_)) => return Err(CopyError::InvalidArgument("source is absent")),
            (Some(_), None) => return Err(CopyError::InvalidArgument("target is absent")),
        };
        let plan = self.plan::<S, T>();
        apply(&plan, source, target, converter)
    }

    /// Construct a fresh `T` and copy into it.
    pub fn copy_new<S: Record, T: Record + Construct>(&self, source: &S) -> Result<T, CopyError> {
        let plan = self.plan::<S, T>();
        let mut target = construct::<T>()?;
        apply(&plan, source, &mut target, None)?;
        Ok(target)
    }

    /// Construct a fresh `T` and copy into it through `converter`.
    pub fn copy_new_with<S: Record, T: Record + Construct>(
        &self,
        source: &S,
        converter: &dyn FieldConverter,
    ) -> Result<T, CopyError> {
        let plan = self.plan::<S, T>();
        let mut target = construct::<T>()?;
        apply(&plan, source, &mut target, Some(converter))?;
        Ok(target)
    }

    /// Functional form: map one value with an arbitrary transform. No plan,
    /// no converter.
    pub fn map_one<S, R>(value: S, f: impl FnOnce(S) -> R) -> R {
        f(value)
    }
}

pub(crate) fn construct<T: Construct>() -> Result<T, CopyError> {
    T::construct().map_err(|source| CopyError::ConstructionFailed {
        type_name: short_type_name::<T>().to_string(),
        source,
    })
}

/// Walk `plan` and write each binding into `target`. Stops at the first error.
pub(crate) fn apply<S: Record, T: Record>(
    plan: &FieldPlan,
    source: &S,
    target: &mut T,
    converter: Option<&dyn FieldConverter>,
) -> Result<(), CopyError> {
    for binding in &plan.bindings {
        let raw = source.read_field(binding.source.index).ok_or_else(|| {
            CopyError::Schema(format!(
                "{} has no readable field '{}' at position {}",
                plan.source_type, binding.name, binding.source.index
            ))
        })?;

        let value = match converter {
            Some(conv) => conv
                .convert(raw, &binding.source.field_type, &binding.name)
                .map_err(|source| CopyError::ConversionFailed {
                    field: binding.name.clone(),
                    source,
                })?,
            None if binding.assignable => raw,
            None => {
                return Err(CopyError::TypeIncompatible {
                    field: binding.name.clone(),
                    source_type: binding.source.field_type.clone(),
                    target_type: binding.target.field_type.clone(),
                });
            }
        };

        tracing::trace!(field = %binding.name, kind = %value.kind(), "writing field");

        if let Err(rejected) = target.write_field(binding.target.index, value) {
            return Err(match converter {
                Some(_) => CopyError::ConversionFailed {
                    field: binding.name.clone(),
                    source: ConvertError::new(format!(
                        "converter returned {} {rejected}, target expects {}",
                        rejected.kind(),
                        binding.target.field_type
                    )),
                },
                None => CopyError::TypeIncompatible {
                    field: binding.name.clone(),
                    source_type: binding.source.field_type.clone(),
                    target_type: binding.target.field_type.clone(),
                },
            });
        }
    }
    Ok(())
}

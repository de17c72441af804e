use crate::error::ConstructError;
use crate::schema::Schema;
use crate::value::Value;

/// A flat record whose fields can be read and written by position.
///
/// Usually derived with `#[derive(Record)]`. The schema is type-level:
/// every instance of a type reports the same fields in the same order, and
/// the copier relies on that to cache one plan per type pair.
///
/// Positions are indices into `schema().fields`.
pub trait Record: 'static {
    fn schema() -> Schema
    where
        Self: Sized;

    /// `None` if `index` is out of range.
    fn read_field(&self, index: usize) -> Option<Value>;

    /// Write `value` into the field at `index`.
    ///
    /// On type mismatch (or out-of-range index) the value is handed back
    /// unchanged and the field is left as it was.
    fn write_field(&mut self, index: usize, value: Value) -> Result<(), Value>;
}

/// Zero-argument construction, used by the constructing copy variants.
///
/// Every `Default` type gets this for free. Implement it by hand for types
/// whose construction can fail.
pub trait Construct: Sized {
    fn construct() -> Result<Self, ConstructError>;
}

impl<T: Default> Construct for T {
    fn construct() -> Result<Self, ConstructError> {
        Ok(T::default())
    }
}

/// Short type name for logs and error messages (`demo::Source` → `Source`).
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

//! Copy same-named fields between independently defined record types.
//!
//! Records describe themselves with `#[derive(Record)]`. The first copy
//! between two types builds a [`FieldPlan`](plan::FieldPlan) of the fields
//! they share by name; later copies reuse it from the [`PlanCache`].
//!
//! ```
//! use fieldcopy::{FieldCopier, Record};
//! use fieldcopy::converter::ParseFields;
//!
//! #[derive(Default, Record)]
//! struct Form {
//!     name: String,
//!     age: String,
//! }
//!
//! #[derive(Default, Record)]
//! struct Person {
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! let form = Form { name: "ann".into(), age: "22".into() };
//! let person: Person = FieldCopier::global()
//!     .copy_new_with(&form, &ParseFields::integers(["age"]))
//!     .unwrap();
//! assert_eq!(person.age, Some(22));
//! ```

extern crate self as fieldcopy;

pub mod batch;
pub mod cache;
pub mod config;
pub mod converter;
pub mod copier;
pub mod error;
pub mod plan;
pub mod record;
pub mod schema;
pub mod value;

pub use fieldcopy_derive::Record;

pub use batch::{BatchFailure, BatchMapper, BatchOutput, PartialFailure};
pub use cache::PlanCache;
pub use config::{BatchConfig, FailurePolicy};
pub use converter::FieldConverter;
pub use copier::FieldCopier;
pub use error::{ConstructError, ConvertError, CopyError};
pub use record::{Construct, Record};
pub use value::{FieldValue, Value};

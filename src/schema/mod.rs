//! Schema subsystem for tabledb
//!
//! Each table carries a schema declared at creation time. Schemas are
//! enforced on every write and never change afterwards.
//!
//! # Rules
//!
//! - Required fields must be present on insert
//! - Declared fields must match their type, no coercion
//! - Records may carry undeclared fields (insert only)
//! - Updates may only touch declared fields, never `id`

mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use types::{FieldDef, FieldType, Schema};
pub use validator::{json_type_name, SchemaValidator};

//! Schema validator for inserts and updates
//!
//! Insert:
//! - every required field is present
//! - every declared field that is present matches its type
//! - undeclared fields pass through unchecked
//!
//! Update:
//! - every key is a declared field, and never `id`
//! - every value matches its declared type
//! - required-ness is not checked
//!
//! Type checks are unconditional: `0`, `""` and `false` are checked like any
//! other value, and `null` never matches a declared type.

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{FieldDef, Schema};
use crate::catalog::ID_FIELD;

/// Validates candidate records against one table's schema.
///
/// The validator never mutates its input.
pub struct SchemaValidator<'a> {
    table: &'a str,
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator for `table` bound to its schema.
    pub fn new(table: &'a str, schema: &'a Schema) -> Self {
        Self { table, schema }
    }

    /// Validates a record about to be inserted.
    ///
    /// # Errors
    ///
    /// - `MISSING_FIELD` if a required field is absent
    /// - `TYPE_MISMATCH` if a present declared field has the wrong type
    pub fn validate_insert(&self, record: &Map<String, Value>) -> SchemaResult<()> {
        for (name, def) in self.schema.fields() {
            match record.get(name) {
                Some(value) => self.check_type(name, def, value)?,
                None if def.required => {
                    return Err(SchemaError::missing_field(self.table, name));
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Validates a partial update.
    ///
    /// # Errors
    ///
    /// - `INVALID_FIELD` if a key is undeclared or is the record id
    /// - `TYPE_MISMATCH` if a value has the wrong type
    pub fn validate_update(&self, updates: &Map<String, Value>) -> SchemaResult<()> {
        for (name, value) in updates {
            if name == ID_FIELD {
                return Err(SchemaError::invalid_field(
                    self.table,
                    ValidationDetails::protected_field(name.as_str()),
                ));
            }
            let def = self.schema.field(name).ok_or_else(|| {
                SchemaError::invalid_field(
                    self.table,
                    ValidationDetails::undeclared_field(name.as_str()),
                )
            })?;
            self.check_type(name, def, value)?;
        }
        Ok(())
    }

    fn check_type(&self, name: &str, def: &FieldDef, value: &Value) -> SchemaResult<()> {
        if def.field_type.matches(value) {
            return Ok(());
        }
        Err(SchemaError::type_mismatch(
            self.table,
            ValidationDetails::type_mismatch(
                name,
                def.field_type.type_name(),
                json_type_name(value),
            ),
        ))
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

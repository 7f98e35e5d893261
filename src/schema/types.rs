//! Schema type definitions
//!
//! Persisted shape of a schema (one entry per field):
//!
//! ```json
//! { "name": { "type": "string", "required": true }, "age": { "type": "number" } }
//! ```
//!
//! Supported types:
//! - string: UTF-8 string
//! - number: any JSON number
//! - boolean: true / false
//! - object: JSON object
//! - array: JSON array
//!
//! Descriptors are decoded leniently so any document the format allows loads:
//! a missing or non-string `type` becomes an unknown type, and `required` is
//! set by any truthy JSON value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a schema field.
///
/// Type names that are not recognised are kept verbatim as `Unknown` so a
/// schema read from disk round-trips unchanged. An unknown type never matches
/// a value; the descriptor surfaces as a type mismatch on the first write that
/// carries the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// JSON number (integer or float)
    Number,
    /// Boolean
    Boolean,
    /// JSON object
    Object,
    /// JSON array
    Array,
    /// Unrecognised type name, stored as given
    Unknown(String),
}

impl FieldType {
    /// True for a descriptor that carried no usable `type`
    pub fn is_unspecified(&self) -> bool {
        matches!(self, FieldType::Unknown(name) if name.is_empty())
    }

    /// Returns the type name as persisted and used in error messages
    pub fn type_name(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Unknown(name) if name.is_empty() => "unspecified",
            FieldType::Unknown(name) => name,
        }
    }

    /// Returns true if `value` is of this type. `null` matches nothing.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Object => value.is_object(),
            FieldType::Array => value.is_array(),
            FieldType::Unknown(_) => false,
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "string" => FieldType::String,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "object" => FieldType::Object,
            "array" => FieldType::Array,
            _ => FieldType::Unknown(name),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Unknown(name) => name,
            other => other.type_name().to_string(),
        }
    }
}

/// Field definition: declared type plus required-ness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct FieldDef {
    /// Field data type
    #[serde(rename = "type", skip_serializing_if = "FieldType::is_unspecified")]
    pub field_type: FieldType,
    /// Whether field must be present on insert
    pub required: bool,
}

impl From<Value> for FieldDef {
    fn from(descriptor: Value) -> Self {
        let field_type = match descriptor.get("type") {
            Some(Value::String(name)) => FieldType::from(name.clone()),
            Some(other) => FieldType::Unknown(other.to_string()),
            None => FieldType::Unknown(String::new()),
        };
        let required = descriptor.get("required").map_or(false, is_truthy);
        Self {
            field_type,
            required,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl FieldDef {
    /// Create a field definition
    pub fn new(field_type: FieldType, required: bool) -> Self {
        Self {
            field_type,
            required,
        }
    }

    /// Create a required string field
    pub fn required_string() -> Self {
        Self::new(FieldType::String, true)
    }

    /// Create an optional string field
    pub fn optional_string() -> Self {
        Self::new(FieldType::String, false)
    }

    /// Create a required number field
    pub fn required_number() -> Self {
        Self::new(FieldType::Number, true)
    }

    /// Create an optional number field
    pub fn optional_number() -> Self {
        Self::new(FieldType::Number, false)
    }

    /// Create a required boolean field
    pub fn required_boolean() -> Self {
        Self::new(FieldType::Boolean, true)
    }

    /// Create an optional boolean field
    pub fn optional_boolean() -> Self {
        Self::new(FieldType::Boolean, false)
    }

    /// Create an optional object field
    pub fn optional_object() -> Self {
        Self::new(FieldType::Object, false)
    }

    /// Create an optional array field
    pub fn optional_array() -> Self {
        Self::new(FieldType::Array, false)
    }
}

/// Per-table schema: field name to definition, in declaration order.
///
/// Declared once at table creation and never changed afterwards. Insert
/// validation walks fields in this order, so the first failing field in
/// declaration order is the one reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: IndexMap<String, FieldDef>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field declaration. Redeclaring a name keeps its position.
    pub fn with_field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Looks up a field definition
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Returns true if `name` is a declared field
    pub fn declares(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates declared fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldDef)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, FieldDef)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

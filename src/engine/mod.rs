//! Query and mutation engine
//!
//! `Database` owns the catalog and the document store. It validates every
//! write against the table schema, assigns record ids, and writes the full
//! catalog through to disk after each successful mutation.
//!
//! # Usage
//!
//! ```ignore
//! use serde_json::json;
//! use tabledb::{Database, DbConfig, FieldDef, Schema};
//!
//! let mut db = Database::open(DbConfig::new("myDB"))?;
//! db.create_table(
//!     "users",
//!     Schema::new()
//!         .with_field("name", FieldDef::required_string())
//!         .with_field("age", FieldDef::optional_number()),
//! )?;
//! let user = db.insert("users", json!({ "name": "John", "age": 30 }))?;
//! let found = db.select("users", &json!({ "name": "John" }))?;
//! ```

mod database;
mod errors;
mod filters;
mod join;
mod shared;

pub use database::Database;
pub use errors::{DbError, DbResult};
pub use filters::{ConditionFilter, Conditions};
pub use shared::SharedDatabase;

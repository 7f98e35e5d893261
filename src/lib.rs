//! tabledb - a minimal embedded record store
//!
//! Named tables with declared schemas, create/insert/select/update/delete,
//! a first-match foreign-key join, and write-through persistence of the whole
//! catalog to a single JSON document after every mutation.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod observability;
pub mod schema;
pub mod storage;

pub use catalog::{Record, Table, ID_FIELD};
pub use config::DbConfig;
pub use engine::{Conditions, Database, DbError, DbResult, SharedDatabase};
pub use schema::{FieldDef, FieldType, Schema};

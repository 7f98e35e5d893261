//! Storage subsystem for tabledb
//!
//! The whole catalog lives in a single JSON document, `<name>.json`:
//!
//! ```json
//! { "<table>": { "schema": { ... }, "data": [ ... ], "autoIncrement": 1 } }
//! ```
//!
//! Every successful mutation rewrites the document in full. There is no
//! incremental or append persistence.

mod errors;
mod store;

pub use errors::{StorageError, StorageErrorCode, StorageResult};
pub use store::DocumentStore;

//! Thread-shareable handle around a single `Database`.
//!
//! All operations go through one mutex, held across the persistence step, so
//! concurrent callers are serialized: no interleaved catalog reads and writes,
//! no lost counter increments, no overlapping saves.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use super::database::Database;
use super::errors::{DbError, DbResult};
use crate::catalog::Record;
use crate::schema::Schema;

/// Cloneable single-writer handle. Reads return owned copies.
#[derive(Debug, Clone)]
pub struct SharedDatabase {
    inner: Arc<Mutex<Database>>,
}

impl SharedDatabase {
    /// Wraps an initialized database
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Database>> {
        self.inner.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Runs `f` with exclusive access to the database
    pub fn with<T>(&self, f: impl FnOnce(&mut Database) -> DbResult<T>) -> DbResult<T> {
        let mut guard = self.lock()?;
        f(&mut guard)
    }

    pub fn create_table(&self, name: impl Into<String>, schema: Schema) -> DbResult<()> {
        self.lock()?.create_table(name, schema)
    }

    pub fn insert(&self, table: &str, record: Value) -> DbResult<Record> {
        self.lock()?.insert(table, record)
    }

    pub fn select(&self, table: &str, conditions: &Value) -> DbResult<Vec<Record>> {
        self.lock()?.select(table, conditions)
    }

    pub fn get(&self, table: &str, id: u64) -> DbResult<Record> {
        self.lock()?.get(table, id).cloned()
    }

    pub fn update(&self, table: &str, id: u64, updates: Value) -> DbResult<Record> {
        self.lock()?.update(table, id, updates)
    }

    pub fn delete(&self, table: &str, id: u64) -> DbResult<()> {
        self.lock()?.delete(table, id)
    }

    pub fn join(&self, left: &str, right: &str, foreign_key: &str) -> DbResult<Vec<Record>> {
        self.lock()?.join(left, right, foreign_key)
    }

    /// Unwraps the database if this is the last handle
    pub fn try_into_inner(self) -> Result<Database, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex
                .into_inner()
                .map_err(|poisoned| Self::new(poisoned.into_inner())),
            Err(inner) => Err(Self { inner }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record_id;
    use crate::config::DbConfig;
    use crate::schema::FieldDef;
    use serde_json::json;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn test_concurrent_inserts_get_unique_ids() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(DbConfig::new("shared").with_data_dir(dir.path())).unwrap();
        let shared = SharedDatabase::new(db);
        shared
            .create_table(
                "events",
                Schema::new().with_field("n", FieldDef::required_number()),
            )
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..10 {
                        shared.insert("events", json!({ "n": t * 10 + i })).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut ids: Vec<u64> = shared
            .select("events", &Value::Null)
            .unwrap()
            .iter()
            .filter_map(record_id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=40).collect::<Vec<u64>>());

        // The persisted document saw every insert
        let db = shared.try_into_inner().unwrap();
        let reopened = Database::open(db.config().clone()).unwrap();
        assert_eq!(reopened.table("events").unwrap().len(), 40);
        assert_eq!(reopened.table("events").unwrap().next_id(), 41);
    }

    #[test]
    fn test_with_gives_exclusive_access() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(DbConfig::new("shared").with_data_dir(dir.path())).unwrap();
        let shared = SharedDatabase::new(db);

        let names = shared
            .with(|db| {
                db.create_table("a", Schema::new())?;
                db.create_table("b", Schema::new())?;
                Ok(db.table_names())
            })
            .unwrap();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}

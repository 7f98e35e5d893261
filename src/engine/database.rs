//! The database engine: table lifecycle, record lifecycle and reads.
//!
//! Every mutating operation follows the same sequence:
//!
//! 1. look up the table, validate the request against catalog state
//! 2. mutate the in-memory catalog
//! 3. write the full catalog through to disk
//! 4. return the result
//!
//! A validation failure returns before step 2 and never persists. A failed
//! write in step 3 is returned as `DbError::Persistence`; the in-memory
//! mutation is kept, so the catalog is ahead of the file until the next
//! successful save.

use std::path::Path;

use serde_json::{json, Value};

use super::errors::{DbError, DbResult};
use super::filters::{ConditionFilter, Conditions};
use super::join::left_join;
use crate::catalog::{Catalog, Record, Table, ID_FIELD};
use crate::config::DbConfig;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{json_type_name, Schema, SchemaValidator};
use crate::storage::DocumentStore;

/// An embedded record store backed by one JSON document.
///
/// Mutations take `&mut self`, so a `Database` has exactly one writer at a
/// time. Use [`SharedDatabase`](super::SharedDatabase) to share one across
/// threads.
#[derive(Debug)]
pub struct Database {
    config: DbConfig,
    catalog: Catalog,
    store: DocumentStore,
}

impl Database {
    /// Creates a database with an empty catalog. Performs no I/O; call
    /// [`init`](Self::init) to load persisted state.
    ///
    /// Applies the configured log level process-wide.
    pub fn new(config: DbConfig) -> DbResult<Self> {
        config.validate()?;
        Logger::set_min_severity(config.log_severity());

        let store = DocumentStore::new(config.db_path(), config.pretty);
        Ok(Self {
            config,
            catalog: Catalog::new(),
            store,
        })
    }

    /// Creates and initializes a database in one step.
    pub fn open(config: DbConfig) -> DbResult<Self> {
        let mut db = Self::new(config)?;
        db.init()?;
        Ok(db)
    }

    /// Loads the persisted catalog, replacing the in-memory one.
    ///
    /// If the backing file is missing, unreadable or malformed, the catalog
    /// is reset to empty and persisted immediately. Each of the three causes
    /// is logged as its own event.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` only if that fallback save fails.
    pub fn init(&mut self) -> DbResult<()> {
        let path = self.store.path().display().to_string();
        log_event_with_fields(
            Event::DbOpen,
            &[("db", self.config.name.as_str()), ("path", path.as_str())],
        );

        match self.store.load() {
            Ok(Some(mut catalog)) => {
                let repaired = match catalog.reconcile_counters() {
                    Ok(repaired) => repaired,
                    Err(table) => {
                        let reason = format!("Id counter of table {} overflows", table);
                        log_event_with_fields(
                            Event::CatalogMalformed,
                            &[("error", reason.as_str()), ("path", path.as_str())],
                        );
                        return self.reset();
                    }
                };
                self.catalog = catalog;

                let tables = self.catalog.len().to_string();
                let records = self.catalog.record_count().to_string();
                let repaired = repaired.join(",");
                log_event_with_fields(
                    Event::CatalogLoaded,
                    &[
                        ("path", path.as_str()),
                        ("records", records.as_str()),
                        ("repaired_counters", repaired.as_str()),
                        ("tables", tables.as_str()),
                    ],
                );
                Ok(())
            }
            Ok(None) => {
                log_event_with_fields(Event::CatalogMissing, &[("path", path.as_str())]);
                self.reset()
            }
            Err(e) => {
                let event = if e.is_malformed() {
                    Event::CatalogMalformed
                } else {
                    Event::CatalogUnreadable
                };
                let reason = e.to_string();
                log_event_with_fields(
                    event,
                    &[("error", reason.as_str()), ("path", path.as_str())],
                );
                self.reset()
            }
        }
    }

    fn reset(&mut self) -> DbResult<()> {
        self.catalog = Catalog::new();
        self.save()?;
        log_event_with_fields(
            Event::CatalogInitialized,
            &[("path", self.store.path().display().to_string().as_str())],
        );
        Ok(())
    }

    /// Writes the full catalog to the backing file.
    pub fn save(&self) -> DbResult<()> {
        let path = self.store.path().display().to_string();
        match self.store.save(&self.catalog) {
            Ok(()) => {
                let tables = self.catalog.len().to_string();
                log_event_with_fields(
                    Event::CatalogSaved,
                    &[("path", path.as_str()), ("tables", tables.as_str())],
                );
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                log_event_with_fields(
                    Event::CatalogSaveFailed,
                    &[("error", reason.as_str()), ("path", path.as_str())],
                );
                Err(e.into())
            }
        }
    }

    /// Creates a table with the given schema.
    ///
    /// The schema is stored as given; descriptors that cannot match any
    /// value only surface when a write carries that field.
    ///
    /// # Errors
    ///
    /// - `DuplicateTable` if `name` already exists
    /// - `Persistence` if the save fails
    pub fn create_table(&mut self, name: impl Into<String>, schema: Schema) -> DbResult<()> {
        let name = name.into();
        if self.catalog.contains(&name) {
            return Err(rejected("create_table", DbError::DuplicateTable(name)));
        }

        let fields = schema.len().to_string();
        self.catalog.insert(name.clone(), Table::new(schema));
        self.save()?;

        log_event_with_fields(
            Event::TableCreated,
            &[("fields", fields.as_str()), ("table", name.as_str())],
        );
        Ok(())
    }

    /// Inserts a record and returns it as stored, including its new `id`.
    ///
    /// The engine-assigned `id` always wins over an `id` in `record`.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` if the table does not exist
    /// - `TypeMismatch` if `record` is not an object, or a declared field
    ///   has the wrong type
    /// - `MissingField` if a required field is absent
    /// - `IdsExhausted` if the table's id counter cannot advance
    /// - `Persistence` if the save fails
    pub fn insert(&mut self, table: &str, record: Value) -> DbResult<Record> {
        let target = self
            .catalog
            .get_mut(table)
            .ok_or_else(|| rejected("insert", DbError::TableNotFound(table.to_string())))?;

        let body = into_object(table, record).map_err(|e| rejected("insert", e))?;
        SchemaValidator::new(table, target.schema())
            .validate_insert(&body)
            .map_err(|e| rejected("insert", e.into()))?;

        let id = target
            .allocate_id()
            .ok_or_else(|| rejected("insert", DbError::IdsExhausted(table.to_string())))?;
        let mut stored = Record::new();
        stored.insert(ID_FIELD.to_string(), json!(id));
        stored.extend(body.into_iter().filter(|(field, _)| field != ID_FIELD));
        target.push(stored.clone());

        self.save()?;

        log_event_with_fields(
            Event::RecordInserted,
            &[("id", id.to_string().as_str()), ("table", table)],
        );
        Ok(stored)
    }

    /// Returns records matching every condition, in insertion order.
    ///
    /// `conditions` is an object of field to exact value. `null` or `{}`
    /// selects every record.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` if the table does not exist
    /// - `TypeMismatch` if `conditions` is neither an object nor `null`
    pub fn select(&self, table: &str, conditions: &Value) -> DbResult<Vec<Record>> {
        let source = self.table_or_err(table)?;

        let empty = Conditions::new();
        let conditions = match conditions {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(DbError::TypeMismatch {
                    table: table.to_string(),
                    field: "$conditions".into(),
                    expected: "object".into(),
                    actual: json_type_name(other).into(),
                })
            }
        };

        Ok(source
            .records()
            .iter()
            .filter(|record| ConditionFilter::matches(record, conditions))
            .cloned()
            .collect())
    }

    /// Returns every record of a table in insertion order.
    pub fn select_all(&self, table: &str) -> DbResult<Vec<Record>> {
        self.select(table, &Value::Null)
    }

    /// Returns the record with `id`.
    pub fn get(&self, table: &str, id: u64) -> DbResult<&Record> {
        self.table_or_err(table)?
            .find(id)
            .ok_or_else(|| DbError::RecordNotFound {
                table: table.to_string(),
                id,
            })
    }

    /// Merges `updates` into the record with `id` and returns the result.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` / `RecordNotFound`
    /// - `InvalidField` if a key is not declared in the schema, or is `id`
    /// - `TypeMismatch` if `updates` is not an object or a value has the
    ///   wrong type
    /// - `Persistence` if the save fails
    pub fn update(&mut self, table: &str, id: u64, updates: Value) -> DbResult<Record> {
        let target = self
            .catalog
            .get_mut(table)
            .ok_or_else(|| rejected("update", DbError::TableNotFound(table.to_string())))?;

        let index = target.position(id).ok_or_else(|| {
            rejected(
                "update",
                DbError::RecordNotFound {
                    table: table.to_string(),
                    id,
                },
            )
        })?;

        let updates = into_object(table, updates).map_err(|e| rejected("update", e))?;
        SchemaValidator::new(table, target.schema())
            .validate_update(&updates)
            .map_err(|e| rejected("update", e.into()))?;

        let merged = match target.record_mut(index) {
            Some(record) => {
                record.extend(updates);
                record.clone()
            }
            None => {
                return Err(DbError::RecordNotFound {
                    table: table.to_string(),
                    id,
                })
            }
        };

        self.save()?;

        log_event_with_fields(
            Event::RecordUpdated,
            &[("id", id.to_string().as_str()), ("table", table)],
        );
        Ok(merged)
    }

    /// Removes the record with `id`, preserving the order of the rest.
    ///
    /// The id counter is untouched, so the id is never handed out again.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` / `RecordNotFound`
    /// - `Persistence` if the save fails
    pub fn delete(&mut self, table: &str, id: u64) -> DbResult<()> {
        let target = self
            .catalog
            .get_mut(table)
            .ok_or_else(|| rejected("delete", DbError::TableNotFound(table.to_string())))?;

        let index = target.position(id).ok_or_else(|| {
            rejected(
                "delete",
                DbError::RecordNotFound {
                    table: table.to_string(),
                    id,
                },
            )
        })?;
        target.remove(index);

        self.save()?;

        log_event_with_fields(
            Event::RecordDeleted,
            &[("id", id.to_string().as_str()), ("table", table)],
        );
        Ok(())
    }

    /// Left-outer join of `left` onto `right` through `foreign_key`.
    ///
    /// Each left record gains a field named `right` holding the first right
    /// record whose `id` equals the left record's `foreign_key` value, or
    /// `null` if there is none.
    ///
    /// # Errors
    ///
    /// `TableNotFound` if either table does not exist.
    pub fn join(&self, left: &str, right: &str, foreign_key: &str) -> DbResult<Vec<Record>> {
        let left_table = self.table_or_err(left)?;
        let right_table = self.table_or_err(right)?;
        Ok(left_join(left_table, right_table, right, foreign_key))
    }

    /// Looks up a table
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.catalog.get(name)
    }

    /// Table names in sorted order
    pub fn table_names(&self) -> Vec<String> {
        self.catalog.table_names().map(str::to_string).collect()
    }

    /// The full in-memory catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configuration this database was created with
    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    fn table_or_err(&self, name: &str) -> DbResult<&Table> {
        self.catalog
            .get(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }
}

/// Logs a rejected write and hands the error back.
fn rejected(op: &str, err: DbError) -> DbError {
    let message = err.to_string();
    log_event_with_fields(
        Event::WriteRejected,
        &[("code", err.code()), ("error", message.as_str()), ("op", op)],
    );
    err
}

fn into_object(table: &str, value: Value) -> DbResult<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DbError::TypeMismatch {
            table: table.to_string(),
            field: "$root".into(),
            expected: "object".into(),
            actual: json_type_name(&other).into(),
        }),
    }
}

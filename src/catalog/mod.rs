//! Catalog: the in-memory set of tables owned by one database.
//!
//! The catalog is the unit of persistence. Every save writes all of it and
//! every load replaces it wholesale.

mod table;

pub use table::{record_id, Record, Table, ID_FIELD};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Table name to table state. Names are unique by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: BTreeMap<String, Table>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a table called `name` exists
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Looks up a table
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Adds a table. Callers check for duplicates first.
    pub(crate) fn insert(&mut self, name: String, table: Table) {
        self.tables.insert(name, table);
    }

    /// Table names in sorted order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Iterates tables in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if there are no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of records across all tables
    pub fn record_count(&self) -> usize {
        self.tables.values().map(Table::len).sum()
    }

    /// Reconciles every table's id counter with its stored ids.
    /// Returns the names of tables whose counter had to be raised.
    ///
    /// # Errors
    ///
    /// Returns the name of the first table holding an id too large to leave
    /// room for a counter above it.
    pub(crate) fn reconcile_counters(&mut self) -> Result<Vec<String>, String> {
        let mut repaired = Vec::new();
        for (name, table) in self.tables.iter_mut() {
            match table.reconcile_counter() {
                Some(true) => repaired.push(name.clone()),
                Some(false) => {}
                None => return Err(name.clone()),
            }
        }
        Ok(repaired)
    }
}

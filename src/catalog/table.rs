//! Table state: schema, ordered records and the id counter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::Schema;

/// A record: a JSON object that always carries an engine-assigned `id`.
pub type Record = Map<String, Value>;

/// Name of the engine-assigned identifier field.
pub const ID_FIELD: &str = "id";

/// Returns the integer id of a record, if it has one.
pub fn record_id(record: &Record) -> Option<u64> {
    record.get(ID_FIELD).and_then(Value::as_u64)
}

/// One table of the catalog.
///
/// Persisted as `{ "schema": ..., "data": [...], "autoIncrement": n }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    schema: Schema,
    #[serde(default)]
    data: Vec<Record>,
    #[serde(default = "first_id")]
    auto_increment: u64,
}

fn first_id() -> u64 {
    1
}

impl Table {
    /// Creates an empty table; the first inserted record gets id 1.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            data: Vec::new(),
            auto_increment: first_id(),
        }
    }

    /// Returns the table schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns records in insertion order
    pub fn records(&self) -> &[Record] {
        &self.data
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the table holds no records
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Id the next insert will receive
    pub fn next_id(&self) -> u64 {
        self.auto_increment
    }

    /// Hands out the next id and advances the counter. The counter never
    /// moves backwards, so ids are not reused after deletes.
    ///
    /// Returns `None`, leaving the counter untouched, once the id space is
    /// used up.
    pub(crate) fn allocate_id(&mut self) -> Option<u64> {
        let id = self.auto_increment;
        self.auto_increment = id.checked_add(1)?;
        Some(id)
    }

    /// Position of the record with `id`
    pub fn position(&self, id: u64) -> Option<usize> {
        self.data.iter().position(|r| record_id(r) == Some(id))
    }

    /// First record with `id`
    pub fn find(&self, id: u64) -> Option<&Record> {
        self.data.iter().find(|r| record_id(r) == Some(id))
    }

    pub(crate) fn push(&mut self, record: Record) {
        self.data.push(record);
    }

    pub(crate) fn record_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.data.get_mut(index)
    }

    /// Order-preserving removal.
    pub(crate) fn remove(&mut self, index: usize) -> Record {
        self.data.remove(index)
    }

    /// Raises the counter above every stored id. Returns `Some(true)` if it
    /// moved, `None` if a stored id leaves no room for a counter above it.
    ///
    /// Guards against a hand-edited document whose counter lags its data.
    pub(crate) fn reconcile_counter(&mut self) -> Option<bool> {
        let floor = match self.data.iter().filter_map(record_id).max() {
            Some(max) => max.checked_add(1)?,
            None => first_id(),
        };
        if self.auto_increment < floor {
            self.auto_increment = floor;
            return Some(true);
        }
        Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDef;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut table = Table::new(Schema::new());
        assert_eq!(table.allocate_id(), Some(1));
        assert_eq!(table.allocate_id(), Some(2));
        assert_eq!(table.next_id(), 3);
    }

    #[test]
    fn test_allocate_id_stops_at_id_space_end() {
        let mut table: Table = serde_json::from_value(json!({
            "schema": {},
            "data": [],
            "autoIncrement": u64::MAX
        }))
        .unwrap();

        assert_eq!(table.allocate_id(), None);
        assert_eq!(table.next_id(), u64::MAX);
    }

    #[test]
    fn test_persisted_shape() {
        let mut table = Table::new(Schema::new().with_field("name", FieldDef::required_string()));
        let id = table.allocate_id().unwrap();
        table.push(record(json!({"id": id, "name": "A"})));

        let encoded = serde_json::to_value(&table).unwrap();
        assert_eq!(
            encoded,
            json!({
                "schema": { "name": { "type": "string", "required": true } },
                "data": [ { "id": 1, "name": "A" } ],
                "autoIncrement": 2
            })
        );
    }

    #[test]
    fn test_reconcile_counter_raises_lagging_counter() {
        let mut table: Table = serde_json::from_value(json!({
            "schema": {},
            "data": [ { "id": 4 }, { "id": 2 } ],
            "autoIncrement": 3
        }))
        .unwrap();

        assert_eq!(table.reconcile_counter(), Some(true));
        assert_eq!(table.next_id(), 5);
        assert_eq!(table.reconcile_counter(), Some(false));
    }

    #[test]
    fn test_reconcile_counter_rejects_max_id() {
        let mut table: Table = serde_json::from_value(json!({
            "schema": {},
            "data": [ { "id": u64::MAX } ],
            "autoIncrement": 2
        }))
        .unwrap();

        assert_eq!(table.reconcile_counter(), None);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut table = Table::new(Schema::new());
        for _ in 0..3 {
            let id = table.allocate_id().unwrap();
            table.push(record(json!({ "id": id })));
        }

        let index = table.position(2).unwrap();
        table.remove(index);

        let ids: Vec<_> = table.records().iter().filter_map(record_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(table.find(2).is_none());
    }
}

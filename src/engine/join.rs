//! Left-outer, first-match foreign-key join.
//!
//! Each left record is emitted once, extended with a field named after the
//! right table. That field holds the first right record whose `id` equals the
//! left record's foreign-key value, or `null` when nothing matches. Dangling
//! keys are not errors. The right table is scanned linearly per left record.

use serde_json::Value;

use crate::catalog::{Record, Table, ID_FIELD};

pub(crate) fn left_join(
    left: &Table,
    right: &Table,
    right_name: &str,
    foreign_key: &str,
) -> Vec<Record> {
    left.records()
        .iter()
        .map(|record| {
            let matched = record
                .get(foreign_key)
                .and_then(|key| first_with_id(right, key))
                .map_or(Value::Null, |found| Value::Object(found.clone()));

            let mut joined = record.clone();
            joined.insert(right_name.to_string(), matched);
            joined
        })
        .collect()
}

fn first_with_id<'a>(table: &'a Table, key: &Value) -> Option<&'a Record> {
    table
        .records()
        .iter()
        .find(|candidate| candidate.get(ID_FIELD) == Some(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    fn table_with(records: Vec<Value>) -> Table {
        let mut table = Table::new(Schema::new());
        for value in records {
            let id = table.allocate_id().unwrap();
            let mut record = Record::new();
            record.insert(ID_FIELD.into(), json!(id));
            record.extend(value.as_object().cloned().unwrap());
            table.push(record);
        }
        table
    }

    #[test]
    fn test_join_attaches_first_match() {
        let users = table_with(vec![json!({"name": "A"}), json!({"name": "B"})]);
        let posts = table_with(vec![json!({"title": "x", "userId": 2})]);

        let joined = left_join(&posts, &users, "users", "userId");
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0]["users"], json!({"id": 2, "name": "B"}));
        assert_eq!(joined[0]["title"], "x");
    }

    #[test]
    fn test_dangling_key_yields_null() {
        let users = table_with(vec![json!({"name": "A"})]);
        let posts = table_with(vec![json!({"userId": 42}), json!({"title": "no key"})]);

        let joined = left_join(&posts, &users, "users", "userId");
        assert_eq!(joined.len(), 2);
        assert!(joined[0]["users"].is_null());
        assert!(joined[1]["users"].is_null());
    }

    #[test]
    fn test_key_comparison_is_strict() {
        let users = table_with(vec![json!({"name": "A"})]);
        let posts = table_with(vec![json!({"userId": "1"})]);

        let joined = left_join(&posts, &users, "users", "userId");
        assert!(joined[0]["users"].is_null());
    }
}

//! In-memory table store loaded from, and saved to, a JSON snapshot file.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, trace};

use super::{DataStore, Filter, Order, Result, Row};
use crate::error::StoreError;
use crate::models::rows::tables;

/// In-process [`DataStore`] backed by a JSON table snapshot.
///
/// The snapshot shape is `{ "table": [row, ...], ... }`, the same shape as a
/// bulk backup export.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: BTreeMap<String, Vec<Row>>,
    next_id: u64,
}

impl InMemoryStore {
    /// Empty store with the application tables registered.
    pub fn new() -> Self {
        let mut store = Self::default();
        for table in [
            tables::BUSINESSES,
            tables::PARTIES,
            tables::INVOICES,
            tables::INVOICE_ITEMS,
            tables::TRANSACTIONS,
        ] {
            store.tables.insert(table.to_string(), Vec::new());
        }
        store
    }

    /// Build from a snapshot value.
    pub fn from_snapshot(snapshot: Value) -> Result<Self> {
        let Value::Object(map) = snapshot else {
            return Err(StoreError::Snapshot("expected an object of tables".to_string()));
        };

        let mut store = Self::new();
        for (table, rows) in map {
            let Value::Array(rows) = rows else {
                return Err(StoreError::Snapshot(format!("table {} is not an array", table)));
            };
            let rows = rows
                .into_iter()
                .map(|row| match row {
                    Value::Object(row) => Ok(row),
                    _ => Err(StoreError::Snapshot(format!(
                        "table {} holds a non-object row",
                        table
                    ))),
                })
                .collect::<Result<Vec<_>>>()?;
            debug!("Loaded {} rows into {}", rows.len(), table);
            store.tables.insert(table, rows);
        }
        Ok(store)
    }

    pub fn to_snapshot(&self) -> Value {
        Value::Object(
            self.tables
                .iter()
                .map(|(table, rows)| {
                    let rows = rows.iter().cloned().map(Value::Object).collect();
                    (table.clone(), Value::Array(rows))
                })
                .collect(),
        )
    }

    /// Load a snapshot file.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Value =
            serde_json::from_str(&content).map_err(|e| StoreError::Snapshot(e.to_string()))?;
        Ok(Self::from_snapshot(snapshot)?)
    }

    /// Write the snapshot file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| StoreError::Snapshot(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn table(&self, table: &str) -> Result<&Vec<Row>> {
        self.tables
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))
    }

    fn table_mut(&mut self, table: &str) -> Result<&mut Vec<Row>> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))
    }

    /// Next identifier not yet used in `table`.
    fn fresh_id(&mut self, table: &str) -> Result<String> {
        loop {
            self.next_id += 1;
            let id = self.next_id.to_string();
            let taken = self
                .table(table)?
                .iter()
                .any(|row| Filter::eq("id", id.as_str()).matches(row));
            if !taken {
                return Ok(id);
            }
        }
    }
}

fn has_id(row: &Row) -> bool {
    match row.get("id") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

impl DataStore for InMemoryStore {
    fn query(&self, table: &str, filters: &[Filter], order: Option<&Order>) -> Result<Vec<Row>> {
        let mut rows: Vec<Row> = self
            .table(table)?
            .iter()
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .cloned()
            .collect();
        if let Some(order) = order {
            rows.sort_by(|a, b| order.compare(a, b));
        }
        trace!("Query {} matched {} rows", table, rows.len());
        Ok(rows)
    }

    fn insert(&mut self, table: &str, mut row: Row) -> Result<Row> {
        if !has_id(&row) {
            let id = self.fresh_id(table)?;
            row.insert("id".to_string(), Value::String(id));
        }
        self.table_mut(table)?.push(row.clone());
        trace!("Inserted row into {}", table);
        Ok(row)
    }

    fn update(&mut self, table: &str, filters: &[Filter], patch: Row) -> Result<usize> {
        let mut changed = 0;
        for row in self.table_mut(table)?.iter_mut() {
            if filters.iter().all(|f| f.matches(row)) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
                changed += 1;
            }
        }
        trace!("Updated {} rows in {}", changed, table);
        Ok(changed)
    }

    fn delete(&mut self, table: &str, filters: &[Filter]) -> Result<usize> {
        let rows = self.table_mut(table)?;
        let before = rows.len();
        rows.retain(|row| !filters.iter().all(|f| f.matches(row)));
        Ok(before - rows.len())
    }

    fn upsert(&mut self, table: &str, rows: Vec<Row>) -> Result<usize> {
        let mut written = 0;
        for row in rows {
            let existing = match row.get("id") {
                Some(id) if has_id(&row) => {
                    let key = Filter::eq("id", id.clone());
                    self.table(table)?.iter().position(|r| key.matches(r))
                }
                _ => None,
            };
            match existing {
                Some(index) => self.table_mut(table)?[index] = row,
                None => {
                    self.insert(table, row)?;
                }
            }
            written += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_insert_assigns_ids_and_query_filters() {
        let mut store = InMemoryStore::new();
        let a = store
            .insert(tables::PARTIES, row(json!({"business_id": "b1", "name": "Acme"})))
            .unwrap();
        store
            .insert(tables::PARTIES, row(json!({"id": "p9", "business_id": "b2", "name": "Zed"})))
            .unwrap();

        assert_eq!(a["id"], json!("1"));
        let found = store
            .query(tables::PARTIES, &[Filter::eq("business_id", "b1")], None)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], json!("Acme"));

        let ordered = store
            .query(tables::PARTIES, &[], Some(&Order::desc("name")))
            .unwrap();
        assert_eq!(ordered[0]["name"], json!("Zed"));
    }

    #[test]
    fn test_fresh_ids_skip_loaded_ones() {
        let mut store =
            InMemoryStore::from_snapshot(json!({"parties": [{"id": 1, "name": "Old"}]})).unwrap();
        let inserted = store.insert(tables::PARTIES, row(json!({"name": "New"}))).unwrap();
        assert_eq!(inserted["id"], json!("2"));
    }

    #[test]
    fn test_update_delete_upsert() {
        let mut store = InMemoryStore::new();
        store.insert(tables::PARTIES, row(json!({"id": "p1", "name": "A"}))).unwrap();
        store.insert(tables::PARTIES, row(json!({"id": "p2", "name": "B"}))).unwrap();

        let changed = store
            .update(tables::PARTIES, &[Filter::eq("id", "p1")], row(json!({"name": "A2"})))
            .unwrap();
        assert_eq!(changed, 1);

        let written = store
            .upsert(
                tables::PARTIES,
                vec![row(json!({"id": "p2", "name": "B2"})), row(json!({"id": "p3", "name": "C"}))],
            )
            .unwrap();
        assert_eq!(written, 2);

        assert_eq!(store.delete(tables::PARTIES, &[Filter::eq("id", "p1")]).unwrap(), 1);

        let names: Vec<Value> = store
            .query(tables::PARTIES, &[], Some(&Order::asc("id")))
            .unwrap()
            .into_iter()
            .map(|r| r["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("B2"), json!("C")]);
    }

    #[test]
    fn test_unknown_table() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.query("stock", &[], None),
            Err(StoreError::UnknownTable(t)) if t == "stock"
        ));
    }

    #[test]
    fn test_snapshot_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let mut store = InMemoryStore::new();
        store
            .insert(tables::BUSINESSES, row(json!({"id": "b1", "name": "Corner Store"})))
            .unwrap();
        store.save(&path).unwrap();

        let loaded = InMemoryStore::load(&path).unwrap();
        assert_eq!(loaded.to_snapshot(), store.to_snapshot());
    }

    #[test]
    fn test_rejects_malformed_snapshot() {
        assert!(InMemoryStore::from_snapshot(json!([])).is_err());
        assert!(InMemoryStore::from_snapshot(json!({"parties": {}})).is_err());
        assert!(InMemoryStore::from_snapshot(json!({"parties": [1]})).is_err());
    }
}

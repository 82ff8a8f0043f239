//! Data-store and auth contracts.
//!
//! The store is a narrow table/row interface over loosely typed JSON rows.
//! Everything above it goes through [`repository`], which parses rows into
//! the typed schemas of [`crate::models::rows`] and always takes the tenant
//! (`business_id`) explicitly.

mod auth;
mod memory;
pub mod repository;

pub use auth::{AuthProvider, StaticAuth, User};
pub use memory::InMemoryStore;

use std::cmp::Ordering;

use serde_json::Value;

use crate::error::StoreError;

/// A persisted record: column name to JSON value.
pub type Row = serde_json::Map<String, Value>;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Equality predicate on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Whether `row` satisfies the predicate.
    ///
    /// Identifiers may be stored as numbers and queried as strings, so a
    /// number and a string compare equal when their text matches.
    pub fn matches(&self, row: &Row) -> bool {
        match (row.get(&self.column), &self.value) {
            (None, Value::Null) => true,
            (None, _) => false,
            (Some(Value::Number(n)), Value::String(s))
            | (Some(Value::String(s)), Value::Number(n)) => n.to_string() == *s,
            (Some(stored), wanted) => stored == wanted,
        }
    }
}

/// Sort order for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// Compare two rows on the order column. Missing values sort first.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let ordering = compare_values(a.get(&self.column), b.get(&self.column));
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

/// Table/row persistence used by the repository.
pub trait DataStore {
    /// Rows of `table` matching every filter, optionally sorted.
    fn query(&self, table: &str, filters: &[Filter], order: Option<&Order>) -> Result<Vec<Row>>;

    /// Insert a row, assigning an `id` when it has none. Returns the stored row.
    fn insert(&mut self, table: &str, row: Row) -> Result<Row>;

    /// Merge `patch` into every matching row. Returns the number of rows changed.
    fn update(&mut self, table: &str, filters: &[Filter], patch: Row) -> Result<usize>;

    /// Remove matching rows. Returns the number removed.
    fn delete(&mut self, table: &str, filters: &[Filter]) -> Result<usize>;

    /// Insert or replace rows keyed by `id`. Returns the number written.
    fn upsert(&mut self, table: &str, rows: Vec<Row>) -> Result<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_filter_matches_ids_loosely() {
        let r = row(json!({"id": 7, "business_id": "b1", "note": null}));

        assert!(Filter::eq("id", "7").matches(&r));
        assert!(Filter::eq("id", 7).matches(&r));
        assert!(Filter::eq("business_id", "b1").matches(&r));
        assert!(!Filter::eq("business_id", "b2").matches(&r));
        assert!(Filter::eq("note", Value::Null).matches(&r));
        assert!(Filter::eq("missing", Value::Null).matches(&r));
        assert!(!Filter::eq("missing", "x").matches(&r));
    }

    #[test]
    fn test_order_compare() {
        let a = row(json!({"date": "2024-01-10", "n": 2}));
        let b = row(json!({"date": "2024-02-01", "n": 10}));
        let none = row(json!({}));

        assert_eq!(Order::asc("date").compare(&a, &b), Ordering::Less);
        assert_eq!(Order::desc("date").compare(&a, &b), Ordering::Greater);
        assert_eq!(Order::asc("n").compare(&a, &b), Ordering::Less);
        assert_eq!(Order::asc("date").compare(&none, &a), Ordering::Less);
    }
}

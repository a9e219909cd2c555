//! Generic structured-query interface over the four record collections.
//!
//! Rows travel as JSON objects so the same contract can be served by the
//! Postgres backend ([`seaorm::SeaOrmBackend`]) and the JSON-file backend
//! ([`file::FileBackend`]). Typed access lives one layer up in
//! [`crate::content`].

pub mod file;
pub mod seaorm;

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// A single stored record as a JSON object.
pub type Row = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Services,
    Features,
    Contacts,
    SiteContent,
}

impl Table {
    pub const ALL: [Table; 4] = [Table::Services, Table::Features, Table::Contacts, Table::SiteContent];

    pub fn name(self) -> &'static str {
        match self {
            Table::Services => "services",
            Table::Features => "features",
            Table::Contacts => "contacts",
            Table::SiteContent => "site_content",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("unknown column `{column}` on {table}")]
    UnknownColumn { table: Table, column: String },
    #[error("unsupported filter value for `{0}`")]
    UnsupportedValue(String),
    #[error("malformed row: {0}")]
    Malformed(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Equality filter on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

/// Select description: AND-ed equality filters, ascending sort keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Vec<String>,
}

impl Query {
    /// Select every row, unordered.
    pub fn all() -> Self { Self::default() }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter { field: field.to_string(), value: value.into() });
        self
    }

    pub fn order_by(mut self, field: &str) -> Self {
        self.order_by.push(field.to_string());
        self
    }

    /// Whether `row` satisfies every filter. A missing field never matches.
    pub fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|f| row.get(&f.field) == Some(&f.value))
    }

    /// Sort rows in place by the `order_by` keys.
    pub fn sort(&self, rows: &mut [Row]) {
        rows.sort_by(|a, b| {
            for field in &self.order_by {
                let ord = compare_values(a.get(field), b.get(field));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }
}

/// Total order over the JSON scalars we sort on: missing/null first, then
/// booleans, numbers, strings.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or_default(), y.as_f64().unwrap_or_default());
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Shallow-merge `patch` into `target`. The `id` key is never overwritten.
pub fn merge_patch(target: &mut Row, patch: Row) {
    if let (Some(dst), Value::Object(src)) = (target.as_object_mut(), patch) {
        for (k, v) in src {
            if k == "id" {
                continue;
            }
            dst.insert(k, v);
        }
    }
}

/// The data backend collaborator: per-collection select with equality
/// filters and ordering, insert, update-by-id and delete-by-id.
#[async_trait]
pub trait DataBackend: Send + Sync {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, BackendError>;

    /// Insert a complete row (including its `id`) and return the stored row.
    async fn insert(&self, table: Table, row: Row) -> Result<Row, BackendError>;

    /// Merge `patch` into the row with `id`; `None` when no such row exists.
    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Option<Row>, BackendError>;

    /// Remove the row with `id`; returns whether it existed.
    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_filters_on_equality() {
        let q = Query::all().eq("is_active", true);
        assert!(q.matches(&json!({"is_active": true})));
        assert!(!q.matches(&json!({"is_active": false})));
        assert!(!q.matches(&json!({})));
    }

    #[test]
    fn sort_uses_secondary_key_on_ties() {
        let mut rows = vec![
            json!({"sort_order": 2, "id": "a"}),
            json!({"sort_order": 1, "id": "c"}),
            json!({"sort_order": 1, "id": "b"}),
        ];
        Query::all().order_by("sort_order").order_by("id").sort(&mut rows);
        let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn merge_patch_keeps_id() {
        let mut row = json!({"id": "x", "title": "old", "price": "1"});
        merge_patch(&mut row, json!({"id": "y", "title": "new"}));
        assert_eq!(row, json!({"id": "x", "title": "new", "price": "1"}));
    }
}

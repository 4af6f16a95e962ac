//! Record store abstraction used to read pricing context and persist estimates.

use std::{collections::BTreeMap, sync::RwLock};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::CoreError;

/// Field predicate applied to a stored JSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact match. Numbers compare by value so `2020` matches `2020.0`.
    Eq(String, Value),
    /// Case-insensitive string match.
    Matches(String, String),
    Gte(String, f64),
    Lte(String, f64),
}

impl Predicate {
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Predicate::Eq(field, expected) => record
                .get(field)
                .is_some_and(|actual| values_equal(actual, expected)),
            Predicate::Matches(field, expected) => record
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|actual| actual.trim().eq_ignore_ascii_case(expected.trim())),
            Predicate::Gte(field, bound) => record
                .get(field)
                .and_then(Value::as_f64)
                .is_some_and(|actual| actual >= *bound),
            Predicate::Lte(field, bound) => record
                .get(field)
                .and_then(Value::as_f64)
                .is_some_and(|actual| actual <= *bound),
        }
    }
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(left), Some(right)) => left == right,
        _ => actual == expected,
    }
}

/// Conjunction of predicates. An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::new().eq("id", Value::String(id.to_string()))
    }

    pub fn eq(mut self, field: &str, value: Value) -> Self {
        self.predicates.push(Predicate::Eq(field.to_string(), value));
        self
    }

    pub fn matches_text(mut self, field: &str, value: &str) -> Self {
        self.predicates
            .push(Predicate::Matches(field.to_string(), value.to_string()));
        self
    }

    pub fn gte(mut self, field: &str, bound: f64) -> Self {
        self.predicates.push(Predicate::Gte(field.to_string(), bound));
        self
    }

    pub fn lte(mut self, field: &str, bound: f64) -> Self {
        self.predicates.push(Predicate::Lte(field.to_string(), bound));
        self
    }

    pub fn accepts(&self, record: &Value) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(record))
    }
}

/// Abstraction over the managed backend that stores vehicles, providers, and estimates.
pub trait RecordStore: Send + Sync {
    /// First record in `table` accepted by `filter`.
    fn select(&self, table: &str, filter: &Filter) -> Result<Option<Value>, CoreError>;
    /// Every record in `table` accepted by `filter`, in insertion order.
    fn select_all(&self, table: &str, filter: &Filter) -> Result<Vec<Value>, CoreError>;
    /// Persists a new object record and returns it as stored.
    /// `now` fills `created_at` when the record does not carry one.
    fn insert(&self, table: &str, record: Value, now: DateTime<Utc>) -> Result<Value, CoreError>;
}

/// Fills in `id` and `created_at` when the caller left them out.
pub fn stamp_record(record: Value, now: DateTime<Utc>) -> Result<Value, CoreError> {
    let Value::Object(mut fields) = record else {
        return Err(CoreError::Store("records must be JSON objects".into()));
    };
    fields
        .entry("id")
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    fields
        .entry("created_at")
        .or_insert_with(|| Value::String(now.to_rfc3339_opts(SecondsFormat::Secs, true)));
    Ok(Value::Object(fields))
}

/// Process-local store, handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: RwLock<BTreeMap<String, Vec<Value>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `table` with rows as-is, without stamping.
    pub fn with_rows(self, table: &str, rows: impl IntoIterator<Item = Value>) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.entry(table.to_string()).or_default().extend(rows);
        }
        self
    }

    /// Snapshot of a table's rows.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .read()
            .ok()
            .and_then(|tables| tables.get(table).cloned())
            .unwrap_or_default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn select(&self, table: &str, filter: &Filter) -> Result<Option<Value>, CoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| filter.accepts(row)).cloned()))
    }

    fn select_all(&self, table: &str, filter: &Filter) -> Result<Vec<Value>, CoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| filter.accepts(row)).cloned().collect())
            .unwrap_or_default())
    }

    fn insert(&self, table: &str, record: Value, now: DateTime<Utc>) -> Result<Value, CoreError> {
        let stored = stamp_record(record, now)?;
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }
}

fn poisoned() -> CoreError {
    CoreError::Store("record store lock poisoned".into())
}

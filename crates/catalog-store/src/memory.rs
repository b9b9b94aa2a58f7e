//! In-process store.
//!
//! Keeps every table in memory behind a single async lock. Used by tests and
//! by `--dry-run` imports; failure rules let a test make a chosen call fail
//! the way the hosted store would.

use crate::model::{loose_eq, text_of, Collection, Filter, Query, Relation, Row};
use crate::store::{CatalogStore, StoreResult};
use crate::StoreError;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::Mutex;

/// Store operations, as seen by failure rules and the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    FetchOne,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Fetch => "fetch",
            Operation::FetchOne => "fetch_one",
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Makes matching calls fail with [`StoreError::Rejected`].
#[derive(Debug, Clone)]
pub struct FailureRule {
    operation: Operation,
    collection: Option<Collection>,
    /// Only fire when a row touched by the call matches.
    matching: Option<Filter>,
    /// Fire this many more times; `None` fires forever.
    remaining: Option<u32>,
    message: Option<String>,
}

impl FailureRule {
    /// Fail `operation` on `collection`.
    pub fn on(operation: Operation, collection: Collection) -> Self {
        Self {
            operation,
            collection: Some(collection),
            matching: None,
            remaining: None,
            message: None,
        }
    }

    /// Fail `operation` on any collection.
    pub fn any(operation: Operation) -> Self {
        Self {
            collection: None,
            ..Self::on(operation, Collection::Products)
        }
    }

    /// Only when a row read, written or deleted by the call matches `filter`.
    pub fn when(mut self, filter: Filter) -> Self {
        self.matching = Some(filter);
        self
    }

    /// Stop after firing `n` times.
    pub fn times(mut self, n: u32) -> Self {
        self.remaining = Some(n);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn applies(&self, operation: Operation, collection: Collection, touched: &[&Row]) -> bool {
        if self.operation != operation || self.remaining == Some(0) {
            return false;
        }
        if self.collection.is_some_and(|c| c != collection) {
            return false;
        }
        match &self.matching {
            Some(filter) => touched.iter().any(|row| filter.matches(row)),
            None => true,
        }
    }

    fn error(&self, operation: Operation, collection: Collection) -> StoreError {
        StoreError::Rejected(
            self.message
                .clone()
                .unwrap_or_else(|| format!("{operation} on {collection} failed")),
        )
    }
}

#[derive(Default)]
struct State {
    tables: HashMap<Collection, Vec<Row>>,
    next_id: u64,
    rules: Vec<FailureRule>,
    journal: Vec<(Operation, Collection)>,
}

impl State {
    fn table(&self, collection: Collection) -> &[Row] {
        self.tables.get(&collection).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fire the first applicable rule, if any.
    fn check(
        &mut self,
        operation: Operation,
        collection: Collection,
        touched: &[&Row],
    ) -> StoreResult<()> {
        let Some(rule) = self
            .rules
            .iter_mut()
            .find(|r| r.applies(operation, collection, touched))
        else {
            return Ok(());
        };
        if let Some(n) = rule.remaining.as_mut() {
            *n -= 1;
        }
        Err(rule.error(operation, collection))
    }

    fn generate_id(&mut self) -> Value {
        self.next_id += 1;
        Value::String(self.next_id.to_string())
    }

    /// Keep generated ids clear of a numeric id that came from outside.
    fn note_id(&mut self, id: &Value) {
        let numeric = match id {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse::<u64>().ok(),
            _ => None,
        };
        if let Some(n) = numeric {
            self.next_id = self.next_id.max(n);
        }
    }

    fn resolve_embeds(&self, row: &mut Row, query: &Query) {
        for embed in &query.embeds {
            let related = self.table(embed.collection);
            let value = match &embed.relation {
                Relation::Parent { foreign_key } => {
                    let key = row.get(foreign_key).cloned().unwrap_or(Value::Null);
                    related
                        .iter()
                        .find(|r| loose_eq(r.get("id").unwrap_or(&Value::Null), &key))
                        .map(|r| Value::Object(project(r, &embed.columns)))
                        .unwrap_or(Value::Null)
                }
                Relation::Children { foreign_key } => {
                    let id = row.get("id").cloned().unwrap_or(Value::Null);
                    Value::Array(
                        related
                            .iter()
                            .filter(|r| loose_eq(r.get(foreign_key).unwrap_or(&Value::Null), &id))
                            .map(|r| Value::Object(project(r, &embed.columns)))
                            .collect(),
                    )
                }
            };
            row.insert(embed.alias.clone(), value);
        }
    }
}

fn project(row: &Row, columns: &[String]) -> Row {
    if columns.is_empty() {
        return row.clone();
    }
    columns
        .iter()
        .map(|c| (c.clone(), row.get(c).cloned().unwrap_or(Value::Null)))
        .collect()
}

/// Nulls sort last; numbers numerically; everything else by text.
fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => text_of(a).cmp(&text_of(b)),
    }
}

/// In-memory [`CatalogStore`].
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table. Rows without an `id` get a generated one.
    pub fn with_rows(mut self, collection: Collection, rows: Vec<Row>) -> Self {
        let state = self.state.get_mut();
        for mut row in rows {
            match row.get("id") {
                Some(id) => state.note_id(id),
                None => {
                    let id = state.generate_id();
                    row.insert("id".to_string(), id);
                }
            }
            state.tables.entry(collection).or_default().push(row);
        }
        self
    }

    pub fn with_failure(mut self, rule: FailureRule) -> Self {
        self.state.get_mut().rules.push(rule);
        self
    }

    /// Add a failure rule.
    pub async fn fail_on(&self, rule: FailureRule) {
        self.state.lock().await.rules.push(rule);
    }

    /// Snapshot of a table.
    pub async fn rows(&self, collection: Collection) -> Vec<Row> {
        self.state.lock().await.table(collection).to_vec()
    }

    /// Successful writes in the order they happened.
    pub async fn journal(&self) -> Vec<(Operation, Collection)> {
        self.state.lock().await.journal.clone()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn fetch(&self, collection: Collection, query: &Query) -> StoreResult<Vec<Row>> {
        let mut state = self.state.lock().await;
        let mut rows: Vec<Row> = state
            .table(collection)
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();

        let touched: Vec<&Row> = rows.iter().collect();
        state.check(Operation::Fetch, collection, &touched)?;

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_cells(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        for row in rows.iter_mut() {
            state.resolve_embeds(row, query);
        }
        if !query.columns.is_empty() {
            let mut keep = query.columns.clone();
            keep.extend(query.embeds.iter().map(|e| e.alias.clone()));
            rows = rows.iter().map(|r| project(r, &keep)).collect();
        }
        Ok(rows)
    }

    async fn fetch_one(&self, collection: Collection, id: &str) -> StoreResult<Row> {
        let mut state = self.state.lock().await;
        let filter = Filter::id(id);
        let found = state.table(collection).iter().find(|r| filter.matches(r)).cloned();
        let touched: Vec<&Row> = found.iter().collect();
        state.check(Operation::FetchOne, collection, &touched)?;
        found.ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))
    }

    async fn insert(&self, collection: Collection, rows: Vec<Row>) -> StoreResult<Vec<Row>> {
        let mut state = self.state.lock().await;
        let touched: Vec<&Row> = rows.iter().collect();
        state.check(Operation::Insert, collection, &touched)?;

        let mut inserted = Vec::with_capacity(rows.len());
        for mut row in rows {
            match row.get("id") {
                Some(id) if !id.is_null() => state.note_id(id),
                _ => {
                    let id = state.generate_id();
                    row.insert("id".to_string(), id);
                }
            }
            inserted.push(row);
        }
        state
            .tables
            .entry(collection)
            .or_default()
            .extend(inserted.iter().cloned());
        state.journal.push((Operation::Insert, collection));
        Ok(inserted)
    }

    async fn update(&self, collection: Collection, id: &str, changes: Row) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let filter = Filter::id(id);
        let Some(index) = state.table(collection).iter().position(|r| filter.matches(r)) else {
            return Err(StoreError::NotFound(format!("{collection}/{id}")));
        };
        let current = state.table(collection)[index].clone();
        state.check(Operation::Update, collection, &[&current, &changes])?;

        if let Some(row) = state
            .tables
            .get_mut(&collection)
            .and_then(|t| t.get_mut(index))
        {
            row.extend(changes);
        }
        state.journal.push((Operation::Update, collection));
        Ok(())
    }

    async fn delete(&self, collection: Collection, filters: &[Filter]) -> StoreResult<u64> {
        let mut state = self.state.lock().await;
        let matches = |row: &Row| filters.iter().all(|f| f.matches(row));
        let doomed: Vec<Row> = state
            .table(collection)
            .iter()
            .filter(|r| matches(r))
            .cloned()
            .collect();
        let touched: Vec<&Row> = doomed.iter().collect();
        state.check(Operation::Delete, collection, &touched)?;

        if let Some(table) = state.tables.get_mut(&collection) {
            table.retain(|r| !matches(r));
        }
        state.journal.push((Operation::Delete, collection));
        Ok(doomed.len() as u64)
    }
}

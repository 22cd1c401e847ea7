//! In-memory store and query, for testing and development

use crate::core::model::Model;
use crate::core::query::{Query, RequestContext};
use crate::pagination::{Cursor, RawPage};
use crate::refining::{FilterOperator, Refinable, SortDirection};
use anyhow::{Result, anyhow};
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

/// In-memory collection of models
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// each [`InMemoryStore::query`] works on a snapshot of the rows.
#[derive(Clone)]
pub struct InMemoryStore<M> {
    rows: Arc<RwLock<Vec<M>>>,
}

impl<M: Model + Clone> InMemoryStore<M> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_rows(rows: Vec<M>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    pub fn insert(&self, row: M) -> Result<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let rows = self
            .rows
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(rows.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Start a query over the current rows
    pub fn query(&self) -> Result<InMemoryQuery<M>> {
        let rows = self
            .rows
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(InMemoryQuery::new(rows.clone()))
    }
}

impl<M: Model + Clone> Default for InMemoryStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Query over a set of in-memory rows
///
/// Constraints and orderings accumulate and are evaluated when a page is
/// requested. Orderings compare in the order they were added, the first one
/// being the primary sort key.
#[derive(Debug, Clone)]
pub struct InMemoryQuery<M> {
    rows: Vec<M>,
    wheres: Vec<(String, FilterOperator, Value)>,
    orders: Vec<(String, SortDirection)>,
    path: Option<String>,
}

impl<M: Model + Clone> InMemoryQuery<M> {
    pub fn new(rows: Vec<M>) -> Self {
        Self {
            rows,
            wheres: Vec::new(),
            orders: Vec::new(),
            path: None,
        }
    }

    /// Base path of pagination links; defaults to the request path
    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Rows matching every constraint, in the requested order
    pub fn results(&self) -> Vec<M> {
        let rows = self.rows.iter().filter(|row| {
            self.wheres
                .iter()
                .all(|(field, operator, value)| matches(*row, field, *operator, value))
        });

        if self.orders.is_empty() {
            return rows.cloned().collect();
        }

        // Sort keys are read once per row, not once per comparison
        let mut keyed: Vec<(Vec<Value>, &M)> = rows
            .map(|row| {
                let keys = self
                    .orders
                    .iter()
                    .map(|(field, _)| row.field_value(field).unwrap_or(Value::Null))
                    .collect();
                (keys, row)
            })
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            self.orders
                .iter()
                .zip(a.iter().zip(b))
                .map(|((_, direction), (a, b))| {
                    let ordering = total_order(a, b);
                    match direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        keyed.into_iter().map(|(_, row)| row.clone()).collect()
    }

    fn path_for(&self, request: &RequestContext) -> String {
        self.path
            .clone()
            .unwrap_or_else(|| request.path().to_string())
    }
}

impl<M> Refinable for InMemoryQuery<M> {
    fn where_value(&mut self, field: &str, operator: FilterOperator, value: Value) {
        self.wheres.push((field.to_string(), operator, value));
    }

    fn order_by(&mut self, field: &str, direction: SortDirection) {
        self.orders.push((field.to_string(), direction));
    }
}

impl<M: Model + Clone> Query for InMemoryQuery<M> {
    type Model = M;

    fn paginate(
        &self,
        per_page: usize,
        page_name: &str,
        request: &RequestContext,
    ) -> Result<RawPage<M>> {
        let page = request.page(page_name);
        let results = self.results();
        let total = results.len();
        let items = results
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Ok(RawPage::length_aware(
            items,
            total,
            per_page,
            page,
            self.path_for(request),
            page_name,
        ))
    }

    fn simple_paginate(
        &self,
        per_page: usize,
        page_name: &str,
        request: &RequestContext,
    ) -> Result<RawPage<M>> {
        let page = request.page(page_name);
        let mut items: Vec<M> = self
            .results()
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page.saturating_add(1))
            .collect();

        let has_more = items.len() > per_page;
        items.truncate(per_page);

        Ok(RawPage::simple(
            items,
            has_more,
            per_page,
            page,
            self.path_for(request),
            page_name,
        ))
    }

    fn cursor_paginate(
        &self,
        per_page: usize,
        cursor_name: &str,
        request: &RequestContext,
    ) -> Result<RawPage<M>> {
        let start = match request.get(cursor_name).filter(|token| !token.is_empty()) {
            Some(token) => Cursor::decode(cursor_name, token).map_err(anyhow::Error::new)?.offset,
            None => 0,
        };

        let results = self.results();
        let total = results.len();
        let items = results.into_iter().skip(start).take(per_page).collect();

        let end = start.saturating_add(per_page);
        let next = (end < total).then(|| Cursor::next(end));
        let prev = (start > 0).then(|| Cursor::previous(start.saturating_sub(per_page)));

        Ok(RawPage::cursor(
            items,
            prev,
            next,
            per_page,
            self.path_for(request),
            cursor_name,
        ))
    }
}

fn matches<M: Model>(row: &M, field: &str, operator: FilterOperator, expected: &Value) -> bool {
    let Some(actual) = row.field_value(field) else {
        return false;
    };

    match operator {
        FilterOperator::Equals => loose_eq(&actual, expected),
        FilterOperator::Contains => match (&actual, expected) {
            (Value::String(haystack), needle) => haystack
                .to_lowercase()
                .contains(&scalar_string(needle).to_lowercase()),
            _ => false,
        },
        FilterOperator::GreaterThan => compare(&actual, expected) == Some(Ordering::Greater),
        FilterOperator::LessThan => compare(&actual, expected) == Some(Ordering::Less),
    }
}

/// Equality that tolerates a query-string value typed differently from the field
fn loose_eq(actual: &Value, expected: &Value) -> bool {
    if actual == expected {
        return true;
    }
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Object(_) | Value::Array(_), _) | (_, Value::Object(_) | Value::Array(_)) => false,
        _ => scalar_string(actual) == scalar_string(expected),
    }
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Order for sorting: nulls, booleans, numbers, strings, then anything else
fn total_order(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    compare(a, b).unwrap_or_else(|| rank(a).cmp(&rank(b)))
}

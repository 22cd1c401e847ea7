//! Shared test harness for table session testing
//!
//! Provides a `User` model, a configurable `UsersTable` and a `CountingQuery`
//! wrapper that records how many times the data store was hit.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod table_harness;
//! use table_harness::*;
//! ```

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use hybrid_tables::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    pub age: u32,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl Model for User {
    fn key(&self) -> Value {
        json!(self.id)
    }
}

/// Shaped form of a user, carrying per-row authorizations
#[derive(Clone, Debug, Serialize)]
pub struct UserData {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub authorization: Value,
}

/// A model keyed by a UUID under a custom key name
#[derive(Clone, Debug, Serialize)]
pub struct Ticket {
    pub reference: Uuid,
    pub subject: String,
}

impl Model for Ticket {
    fn key_name() -> &'static str {
        "reference"
    }

    fn key(&self) -> Value {
        json!(self.reference)
    }
}

pub fn user(id: u64, name: &str, email: Option<&str>, role: &str, age: u32) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.map(str::to_string),
        role: role.to_string(),
        age,
        password: "hunter2".to_string(),
        created_at: Utc
            .with_ymd_and_hms(2024, 1, id as u32, 9, 30, 0)
            .single()
            .unwrap_or_default(),
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(1, "Ada", Some("ada@example.com"), "admin", 36),
        user(2, "Brian", None, "member", 29),
        user(3, "Chloe", Some("chloe@example.com"), "member", 41),
        user(4, "Dmitri", Some("dmitri@example.com"), "admin", 52),
        user(5, "Eve", None, "guest", 23),
        user(6, "Farah", Some("farah@example.com"), "member", 33),
    ]
}

// ---------------------------------------------------------------------------
// CountingQuery: an in-memory query that counts data-store hits
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct Counters {
    pub definitions: Arc<AtomicUsize>,
    pub executions: Arc<AtomicUsize>,
}

impl Counters {
    pub fn definitions(&self) -> usize {
        self.definitions.load(Ordering::SeqCst)
    }

    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

pub struct CountingQuery<M> {
    pub inner: InMemoryQuery<M>,
    pub executions: Arc<AtomicUsize>,
}

impl<M: Model + Clone> Refinable for CountingQuery<M> {
    fn where_value(&mut self, field: &str, operator: FilterOperator, value: Value) {
        self.inner.where_value(field, operator, value);
    }

    fn order_by(&mut self, field: &str, direction: SortDirection) {
        self.inner.order_by(field, direction);
    }
}

impl<M: Model + Clone> Query for CountingQuery<M> {
    type Model = M;

    fn paginate(
        &self,
        per_page: usize,
        page_name: &str,
        request: &RequestContext,
    ) -> Result<RawPage<M>> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        self.inner.paginate(per_page, page_name, request)
    }

    fn simple_paginate(
        &self,
        per_page: usize,
        page_name: &str,
        request: &RequestContext,
    ) -> Result<RawPage<M>> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        self.inner.simple_paginate(per_page, page_name, request)
    }

    fn cursor_paginate(
        &self,
        per_page: usize,
        cursor_name: &str,
        request: &RequestContext,
    ) -> Result<RawPage<M>> {
        self.executions.fetch_add(1, Ordering::SeqCst);
        self.inner.cursor_paginate(per_page, cursor_name, request)
    }
}

// ---------------------------------------------------------------------------
// UsersTable
// ---------------------------------------------------------------------------

pub type UsersQuery = CountingQuery<User>;

/// A users table whose every aspect can be tuned by a test
pub struct UsersTable {
    pub rows: Vec<User>,
    pub options: TableOptions,
    pub columns: Vec<Arc<dyn TableColumn<User>>>,
    pub refiners: Vec<Arc<dyn Refiner<UsersQuery>>>,
    pub counters: Counters,
    pub shaped: bool,
    pub nested: bool,
}

impl UsersTable {
    pub fn new() -> Self {
        Self {
            rows: users(),
            options: TableOptions::new().per_page(2),
            columns: vec![
                Column::make("id").shared(),
                Column::make("name").shared(),
                Column::make("email").shared(),
            ],
            refiners: Vec::new(),
            counters: Counters::default(),
            shaped: false,
            nested: false,
        }
    }

    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_columns(mut self, columns: Vec<Arc<dyn TableColumn<User>>>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_refiners(mut self, refiners: Vec<Arc<dyn Refiner<UsersQuery>>>) -> Self {
        self.refiners = refiners;
        self
    }

    pub fn shaped(mut self) -> Self {
        self.shaped = true;
        self
    }

    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }

    pub fn counters(&self) -> Counters {
        self.counters.clone()
    }
}

impl Table for UsersTable {
    type Model = User;
    type Query = UsersQuery;

    fn define_query(&self) -> Result<Self::Query> {
        self.counters.definitions.fetch_add(1, Ordering::SeqCst);
        Ok(CountingQuery {
            inner: InMemoryQuery::new(self.rows.clone()),
            executions: self.counters.executions.clone(),
        })
    }

    fn define_refiners(&self) -> Vec<Arc<dyn Refiner<Self::Query>>> {
        self.refiners.clone()
    }

    fn define_columns(&self) -> Vec<Arc<dyn TableColumn<User>>> {
        self.columns.clone()
    }

    fn options(&self) -> TableOptions {
        self.options.clone()
    }

    fn transform_records(&self, records: PaginatedRecords) -> TableResult<PaginatedRecords> {
        if self.nested {
            Ok(records.into_nested())
        } else {
            Ok(records)
        }
    }

    fn resolve_data_record(&self, user: &User) -> Result<Option<Box<dyn RecordShape>>> {
        if !self.shaped {
            return Ok(None);
        }
        Ok(Some(Box::new(DataRecord::new(UserData {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            authorization: json!({ "edit": user.role == "admin" }),
        }))))
    }
}

/// Route tracing output through the test harness; `RUST_LOG` selects levels
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Start a session for a table and a query string
pub fn session<T: Table>(table: T, query: &str) -> TableSession<T> {
    TableSession::new(
        table,
        RequestContext::from_query_string("/users", query),
        TablesConfig::default(),
    )
}

/// Serialize records for comparison with `json!` literals
pub fn to_json<S: Serialize>(value: &S) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

//! # Hybrid Tables
//!
//! Server-side orchestration for data tables rendered by a hybrid front-end.
//!
//! ## Features
//!
//! - **Refiners**: filters and sorts read from scoped query parameters
//! - **Three paginators**: length-aware, simple and cursor pagination
//! - **Record projection**: `{value, extra}` envelopes per declared column
//! - **Row identity**: `__hybridId` injected when the key column cannot identify a row
//! - **Request-scoped caching**: the query runs at most once per request
//! - **Normalized metadata**: every page is described as `{links, meta}`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hybrid_tables::prelude::*;
//!
//! struct UsersTable { store: InMemoryStore<User> }
//!
//! impl Table for UsersTable {
//!     type Model = User;
//!     type Query = InMemoryQuery<User>;
//!
//!     fn define_query(&self) -> Result<Self::Query> {
//!         self.store.query()
//!     }
//!
//!     fn define_refiners(&self) -> Vec<Arc<dyn Refiner<Self::Query>>> {
//!         vec![Filter::make("name").operator(FilterOperator::Contains).shared()]
//!     }
//!
//!     fn define_columns(&self) -> Vec<Arc<dyn TableColumn<User>>> {
//!         vec![Column::make("id").shared(), Column::make("name").shared()]
//!     }
//! }
//!
//! async fn users(uri: Uri, State(store): State<InMemoryStore<User>>) -> Response {
//!     let table = UsersTable { store };
//!     let mut session = TableSession::new(table, RequestContext::from_uri(&uri), TablesConfig::default());
//!     match session.to_view() {
//!         Ok(view) => view.into_response(),
//!         Err(e) => e.into_response(),
//!     }
//! }
//! ```

pub mod config;
pub mod core;
pub mod pagination;
pub mod refining;
pub mod storage;
pub mod tables;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        column::{Column, ColumnContext, ColumnDescriptor, ColumnRegistry, TableColumn},
        error::{ConfigError, ProjectionError, QueryError, TableError, TableResult},
        model::{Model, Record},
        query::{Query, RequestContext},
        shape::{DataRecord, RecordShape},
        transforms,
    };

    // === Refining ===
    pub use crate::refining::{
        Filter, FilterOperator, Refinable, Refinement, RefinementContext, RefinementKind, Refiner,
        RefinerInput, Sort, SortDirection,
    };

    // === Pagination ===
    pub use crate::pagination::{Cursor, PaginatedRecords, PaginatorKind, PaginatorMeta, RawPage};

    // === Tables ===
    pub use crate::tables::{ProjectedRecord, ProjectedValue, Table, TableSession, TableView};

    // === Storage ===
    pub use crate::storage::{InMemoryQuery, InMemoryStore};

    // === Config ===
    pub use crate::config::{HybridConfig, TableOptions, TablesConfig};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;

    // === Axum ===
    pub use axum::{
        http::Uri,
        response::{IntoResponse, Response},
    };
}

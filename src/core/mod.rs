//! Core module containing fundamental traits and types for tables

pub mod column;
pub mod error;
pub mod model;
pub mod query;
pub mod shape;
pub mod transforms;

pub use column::{Column, ColumnContext, ColumnDescriptor, ColumnRegistry, TableColumn};
pub use error::{ConfigError, ProjectionError, QueryError, TableError, TableResult};
pub use model::{Model, Record};
pub use query::{Query, RequestContext, format_scope};
pub use shape::{AUTHORIZATION_KEY, DataRecord, HYBRID_ID_KEY, RecordShape};

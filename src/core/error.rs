//! Typed error handling for hybrid tables
//!
//! Collaborators (queries, refiners, columns, record shapes) report failures
//! through `anyhow::Error`. The table pipeline wraps those into the typed
//! hierarchy below so callers can match on the failing stage.
//!
//! # Error Categories
//!
//! - [`ConfigError`]: invalid table configuration (paginator kind, page size, columns)
//! - [`QueryError`]: failures while defining, refining or paginating the query
//! - [`ProjectionError`]: failures while turning a model into a projected record
//!
//! # Example
//!
//! ```rust,ignore
//! match session.get_records() {
//!     Ok(records) => println!("{} records", records.len()),
//!     Err(TableError::Config(ConfigError::InvalidPaginator { kind })) => {
//!         eprintln!("table is misconfigured: {}", kind);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Convenience alias used throughout the table pipeline
pub type TableResult<T> = std::result::Result<T, TableError>;

/// The main error type for the table pipeline
#[derive(Debug, Error)]
pub enum TableError {
    /// Configuration errors, raised as soon as they are detected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Data access errors
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Record projection errors
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Serialization of a page or view failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TableError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TableError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TableError::Query(e) => e.status_code(),
            TableError::Projection(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TableError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            TableError::Config(e) => e.error_code(),
            TableError::Query(e) => e.error_code(),
            TableError::Projection(e) => e.error_code(),
            TableError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            TableError::Config(ConfigError::InvalidPaginator { kind }) => {
                Some(serde_json::json!({ "paginator": kind }))
            }
            TableError::Config(ConfigError::DuplicateColumn { name }) => {
                Some(serde_json::json!({ "column": name }))
            }
            TableError::Query(QueryError::Refiner { refiner, .. }) => {
                Some(serde_json::json!({ "refiner": refiner }))
            }
            TableError::Projection(ProjectionError::Column { column, .. }) => {
                Some(serde_json::json!({ "column": column }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for TableError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to table configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured paginator kind is not one of the supported strategies
    #[error("Invalid paginator type [{kind}]")]
    InvalidPaginator { kind: String },

    /// Records per page must be a positive integer
    #[error("Invalid records per page [{value}]: must be at least 1")]
    InvalidPerPage { value: usize },

    /// Two columns share the same name
    #[error("Column '{name}' is declared more than once")]
    DuplicateColumn { name: String },

    /// Failed to parse a configuration document
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidPaginator { .. } => "INVALID_PAGINATOR",
            ConfigError::InvalidPerPage { .. } => "INVALID_PER_PAGE",
            ConfigError::DuplicateColumn { .. } => "DUPLICATE_COLUMN",
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Errors raised while building, refining or paginating the query
#[derive(Debug, Error)]
pub enum QueryError {
    /// The table's base query could not be defined
    #[error("Failed to define query: {0}")]
    Definition(#[source] anyhow::Error),

    /// A refiner failed to apply
    #[error("Refiner '{refiner}' failed: {source}")]
    Refiner {
        refiner: String,
        #[source]
        source: anyhow::Error,
    },

    /// A request parameter could not be interpreted (malformed cursor, page number)
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// Executing the paginated query failed
    #[error("Failed to paginate records: {0}")]
    Execution(#[source] anyhow::Error),
}

impl QueryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            QueryError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::Definition(_) => "QUERY_DEFINITION_FAILED",
            QueryError::Refiner { .. } => "REFINER_FAILED",
            QueryError::InvalidParameter { .. } => "INVALID_PARAMETER",
            QueryError::Execution(_) => "QUERY_EXECUTION_FAILED",
        }
    }
}

// =============================================================================
// Projection Errors
// =============================================================================

/// Errors raised while projecting a model into a record
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The row-shaping type could not be built from the model
    #[error("Failed to shape record: {0}")]
    Shape(#[source] anyhow::Error),

    /// The resolved record is not a mapping
    #[error("Record must serialize to an object, got {found}")]
    NotAnObject { found: String },

    /// A column callback failed
    #[error("Column '{column}' failed: {source}")]
    Column {
        column: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ProjectionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ProjectionError::Shape(_) => "RECORD_SHAPE_FAILED",
            ProjectionError::NotAnObject { .. } => "RECORD_NOT_AN_OBJECT",
            ProjectionError::Column { .. } => "COLUMN_FAILED",
        }
    }
}

//! Tests for the typed error handling system
//!
//! These tests verify that:
//! - Errors return correct HTTP status codes
//! - Error responses are properly formatted
//! - Error conversions work correctly
//! - Error matching allows clients to handle specific cases

use axum::http::StatusCode;
use axum::response::IntoResponse;
use hybrid_tables::prelude::*;

// =============================================================================
// HTTP Status Code Tests
// =============================================================================

mod status_code_tests {
    use super::*;

    #[test]
    fn test_invalid_paginator_returns_500() {
        let err = TableError::Config(ConfigError::InvalidPaginator {
            kind: "infinite".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_parameter_returns_400() {
        let err = TableError::Query(QueryError::InvalidParameter {
            name: "cursor".to_string(),
            message: "malformed cursor".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_refiner_failure_returns_500() {
        let err = TableError::Query(QueryError::Refiner {
            refiner: "status".to_string(),
            source: anyhow::anyhow!("unknown column"),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_projection_error_returns_500() {
        let err = TableError::Projection(ProjectionError::NotAnObject {
            found: "string".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Error Code Tests
// =============================================================================

mod error_code_tests {
    use super::*;

    #[test]
    fn test_config_error_codes() {
        let cases = [
            (
                ConfigError::InvalidPaginator {
                    kind: "x".to_string(),
                },
                "INVALID_PAGINATOR",
            ),
            (ConfigError::InvalidPerPage { value: 0 }, "INVALID_PER_PAGE"),
            (
                ConfigError::DuplicateColumn {
                    name: "id".to_string(),
                },
                "DUPLICATE_COLUMN",
            ),
            (
                ConfigError::FileNotFound {
                    path: "hybrid.yaml".to_string(),
                },
                "CONFIG_FILE_NOT_FOUND",
            ),
        ];

        for (err, code) in cases {
            assert_eq!(TableError::from(err).error_code(), code);
        }
    }

    #[test]
    fn test_query_error_codes() {
        assert_eq!(
            TableError::from(QueryError::Definition(anyhow::anyhow!("no table"))).error_code(),
            "QUERY_DEFINITION_FAILED"
        );
        assert_eq!(
            TableError::from(QueryError::Execution(anyhow::anyhow!("timeout"))).error_code(),
            "QUERY_EXECUTION_FAILED"
        );
    }
}

// =============================================================================
// Error Response Tests
// =============================================================================

mod error_response_tests {
    use super::*;

    #[test]
    fn test_error_response_has_code_and_message() {
        let err = TableError::Config(ConfigError::InvalidPaginator {
            kind: "infinite".to_string(),
        });
        let response = err.to_response();

        assert_eq!(response.code, "INVALID_PAGINATOR");
        assert_eq!(response.message, "Invalid paginator type [infinite]");
        assert_eq!(response.details, Some(json!({ "paginator": "infinite" })));
    }

    #[test]
    fn test_error_response_includes_refiner_details() {
        let err = TableError::Query(QueryError::Refiner {
            refiner: "status".to_string(),
            source: anyhow::anyhow!("unknown column"),
        });
        let response = err.to_response();

        assert_eq!(response.message, "Refiner 'status' failed: unknown column");
        assert_eq!(response.details, Some(json!({ "refiner": "status" })));
    }

    #[test]
    fn test_error_response_serialization_skips_missing_details() {
        let err = TableError::Query(QueryError::Execution(anyhow::anyhow!("timeout")));
        let body = serde_json::to_value(err.to_response()).unwrap();

        assert_eq!(
            body,
            json!({
                "code": "QUERY_EXECUTION_FAILED",
                "message": "Failed to paginate records: timeout"
            })
        );
    }
}

// =============================================================================
// Error Conversion Tests
// =============================================================================

mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_config_error_converts_to_table_error() {
        let err: TableError = ConfigError::InvalidPerPage { value: 0 }.into();
        assert!(matches!(err, TableError::Config(_)));
    }

    #[test]
    fn test_projection_error_converts_to_table_error() {
        let err: TableError = ProjectionError::Shape(anyhow::anyhow!("bad shape")).into();
        assert!(matches!(err, TableError::Projection(_)));
    }

    #[test]
    fn test_serde_json_error_converts_to_table_error() {
        let json_err = serde_json::from_str::<Value>("{ not json").unwrap_err();
        let err: TableError = json_err.into();
        assert!(matches!(err, TableError::Serialization(_)));
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_duplicate_columns_surface_from_session() {
        struct Duplicated;

        #[derive(Clone, Serialize)]
        struct Row {
            id: u64,
        }

        impl Model for Row {
            fn key(&self) -> Value {
                json!(self.id)
            }
        }

        impl Table for Duplicated {
            type Model = Row;
            type Query = InMemoryQuery<Row>;

            fn define_query(&self) -> Result<Self::Query> {
                Ok(InMemoryQuery::new(vec![Row { id: 1 }]))
            }

            fn define_columns(&self) -> Vec<Arc<dyn TableColumn<Row>>> {
                vec![Column::make("id").shared(), Column::make("id").shared()]
            }
        }

        let mut session = TableSession::new(
            Duplicated,
            RequestContext::new("/rows"),
            TablesConfig::default(),
        );
        let err = session.get_records().err().unwrap();
        assert!(matches!(
            err,
            TableError::Config(ConfigError::DuplicateColumn { ref name }) if name == "id"
        ));
    }

    #[test]
    fn test_query_definition_failure() {
        struct Unreachable;

        #[derive(Clone, Serialize)]
        struct Row {
            id: u64,
        }

        impl Model for Row {
            fn key(&self) -> Value {
                json!(self.id)
            }
        }

        impl Table for Unreachable {
            type Model = Row;
            type Query = InMemoryQuery<Row>;

            fn define_query(&self) -> Result<Self::Query> {
                anyhow::bail!("connection refused")
            }

            fn define_columns(&self) -> Vec<Arc<dyn TableColumn<Row>>> {
                vec![Column::make("id").shared()]
            }
        }

        let mut session = TableSession::new(
            Unreachable,
            RequestContext::new("/rows"),
            TablesConfig::default(),
        );
        let err = session.get_refined_query().err().unwrap();
        assert!(matches!(err, TableError::Query(QueryError::Definition(_))));
        assert_eq!(
            err.to_string(),
            "Failed to define query: connection refused"
        );
    }
}

// =============================================================================
// Error Matching Tests
// =============================================================================

mod error_matching_tests {
    use super::*;

    #[test]
    fn test_can_match_specific_config_errors() {
        let err = TableError::Config(ConfigError::InvalidPaginator {
            kind: "infinite".to_string(),
        });

        match err {
            TableError::Config(ConfigError::InvalidPaginator { kind }) => {
                assert_eq!(kind, "infinite");
            }
            _ => panic!("Expected InvalidPaginator error"),
        }
    }

    #[test]
    fn test_can_match_column_errors() {
        let err = TableError::Projection(ProjectionError::Column {
            column: "email".to_string(),
            source: anyhow::anyhow!("mailer offline"),
        });

        match err {
            TableError::Projection(ProjectionError::Column { column, source }) => {
                assert_eq!(column, "email");
                assert_eq!(source.to_string(), "mailer offline");
            }
            _ => panic!("Expected Column error"),
        }
    }
}

// =============================================================================
// IntoResponse Tests
// =============================================================================

mod into_response_tests {
    use super::*;

    #[test]
    fn test_table_error_into_response_status() {
        let err = TableError::Query(QueryError::InvalidParameter {
            name: "page".to_string(),
            message: "not a number".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_config_error_into_response_status() {
        let err = TableError::Config(ConfigError::InvalidPerPage { value: 0 });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

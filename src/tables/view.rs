//! Serializable table view, ready to be sent to a front-end

use crate::core::column::ColumnDescriptor;
use crate::core::error::TableResult;
use crate::pagination::PaginatorMeta;
use crate::refining::Refinement;
use crate::tables::projector::ProjectedRecord;
use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// A table rendered for one request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub key_name: String,
    pub scope: String,
    pub columns: Vec<ColumnDescriptor>,
    pub records: Vec<ProjectedRecord>,
    pub paginator: PaginatorMeta,
    pub refinements: Vec<Refinement>,
}

impl TableView {
    /// The view as a JSON value
    pub fn to_value(&self) -> TableResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The view as indented JSON text, for logs and fixtures
    pub fn to_json_pretty(&self) -> TableResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl IntoResponse for TableView {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

//! Record projection: from a model to a wire-ready record
//!
//! Every declared column becomes a `{value, extra}` envelope. Two reserved
//! keys, `__hybridId` and `authorization`, are sent raw. Everything else in
//! the model's record is left out.
//!
//! Row identity works as follows. When the key column is declared and sends
//! its raw value, the front-end already has the key. Otherwise a
//! `__hybridId` is injected: the real key when actions are enabled (actions
//! must find the row again), or the row's position in the page.

use crate::core::column::{ColumnContext, ColumnRegistry};
use crate::core::error::ProjectionError;
use crate::core::model::{Model, Record};
use crate::core::shape::{AUTHORIZATION_KEY, HYBRID_ID_KEY};
use crate::tables::table::Table;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};

/// One entry of a projected record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProjectedValue {
    /// A declared column
    Column { extra: Record, value: Value },

    /// A reserved key, sent as is
    Raw(Value),
}

impl ProjectedValue {
    /// The sent value, whichever the variant
    pub fn value(&self) -> &Value {
        match self {
            ProjectedValue::Column { value, .. } => value,
            ProjectedValue::Raw(value) => value,
        }
    }

    /// Extra data of a column entry
    pub fn extra(&self) -> Option<&Record> {
        match self {
            ProjectedValue::Column { extra, .. } => Some(extra),
            ProjectedValue::Raw(_) => None,
        }
    }
}

/// A projected record, keyed in column declaration order
pub type ProjectedRecord = IndexMap<String, ProjectedValue>;

/// Resolve a model into a plain record, shaping it first if the table asks to
///
/// Shaped records lose their `authorization` field when authorizations are
/// not resolved. Unshaped models are flattened directly.
pub fn resolve_record<T: Table>(
    table: &T,
    model: &T::Model,
    resolves_authorizations: bool,
) -> Result<Record, ProjectionError> {
    match table
        .resolve_data_record(model)
        .map_err(ProjectionError::Shape)?
    {
        Some(mut shaped) => {
            if !resolves_authorizations {
                shaped.exclude_permanently(AUTHORIZATION_KEY);
            }
            shaped.to_record()
        }
        None => model.to_record(),
    }
}

/// Projects the records of one page
///
/// Built once per page; [`RecordProjector::project`] is then called for each
/// row and does not mutate the projector.
pub struct RecordProjector<'a, M> {
    columns: &'a ColumnRegistry<M>,
    columns_to_include: Vec<String>,
    has_key_as_column: bool,
    force_include_key: bool,
}

impl<'a, M: Model> RecordProjector<'a, M> {
    pub fn new(columns: &'a ColumnRegistry<M>, key_name: &str, enable_actions: bool) -> Self {
        let mut columns_to_include: Vec<String> = columns.names().map(str::to_string).collect();
        for reserved in [key_name, HYBRID_ID_KEY, AUTHORIZATION_KEY] {
            if !columns_to_include.iter().any(|c| c == reserved) {
                columns_to_include.push(reserved.to_string());
            }
        }

        let has_key_as_column = columns.has_key_as_column(key_name);

        Self {
            columns,
            columns_to_include,
            has_key_as_column,
            force_include_key: enable_actions && !has_key_as_column,
        }
    }

    /// Whether the key column already identifies rows
    pub fn has_key_as_column(&self) -> bool {
        self.has_key_as_column
    }

    /// Keys that may appear in a projected record, in output order
    pub fn columns_to_include(&self) -> &[String] {
        &self.columns_to_include
    }

    /// Project one model, given its resolved record and page position
    pub fn project(
        &self,
        model: &M,
        mut record: Record,
        position: usize,
    ) -> Result<ProjectedRecord, ProjectionError> {
        if !self.has_key_as_column {
            let id = if self.force_include_key {
                model.key()
            } else {
                json!(position)
            };
            record.insert(HYBRID_ID_KEY.to_string(), id);
        }

        let mut projected = ProjectedRecord::with_capacity(self.columns_to_include.len());

        for key in &self.columns_to_include {
            let Some(raw) = record.get(key) else {
                continue;
            };
            if raw.is_null() {
                continue;
            }

            if key == HYBRID_ID_KEY || key == AUTHORIZATION_KEY {
                projected.insert(key.clone(), ProjectedValue::Raw(raw.clone()));
                continue;
            }

            let Some(column) = self.columns.get(key) else {
                continue;
            };

            let context = ColumnContext {
                column: column.as_ref(),
                record: &record,
                model,
            };
            let column_error = |source| ProjectionError::Column {
                column: key.clone(),
                source,
            };

            let extra = if column.has_extra() {
                column.extra(&context).map_err(column_error)?
            } else {
                Record::new()
            };

            let value = if column.can_transform_value() {
                column.transformed_value(&context).map_err(column_error)?
            } else {
                raw.clone()
            };

            projected.insert(key.clone(), ProjectedValue::Column { extra, value });
        }

        Ok(projected)
    }
}

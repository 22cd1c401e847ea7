//! Table definition trait

use crate::config::TableOptions;
use crate::core::column::TableColumn;
use crate::core::error::TableResult;
use crate::core::model::Model;
use crate::core::query::Query;
use crate::core::shape::RecordShape;
use crate::pagination::PaginatedRecords;
use crate::refining::{RefinementContext, Refiner};
use std::sync::Arc;

/// A server-side data table
///
/// A table declares its base query, the refiners applied to it, the columns
/// it sends and a few options. [`TableSession`](crate::tables::TableSession)
/// drives it through one request.
///
/// # Example
///
/// ```rust,ignore
/// struct UsersTable { users: Vec<User> }
///
/// impl Table for UsersTable {
///     type Model = User;
///     type Query = InMemoryQuery<User>;
///
///     fn define_query(&self) -> anyhow::Result<Self::Query> {
///         Ok(InMemoryQuery::new(self.users.clone()))
///     }
///
///     fn define_refiners(&self) -> Vec<Arc<dyn Refiner<Self::Query>>> {
///         vec![Filter::make("name").shared(), Sort::make("name").shared()]
///     }
///
///     fn define_columns(&self) -> Vec<Arc<dyn TableColumn<User>>> {
///         vec![Column::make("id").shared(), Column::make("name").shared()]
///     }
/// }
/// ```
pub trait Table {
    type Model: Model;
    type Query: Query<Model = Self::Model>;

    /// Build the base query, before any refinement
    fn define_query(&self) -> anyhow::Result<Self::Query>;

    /// Refiners, in application order
    fn define_refiners(&self) -> Vec<Arc<dyn Refiner<Self::Query>>> {
        Vec::new()
    }

    /// Columns, in output order
    fn define_columns(&self) -> Vec<Arc<dyn TableColumn<Self::Model>>>;

    fn options(&self) -> TableOptions {
        TableOptions::default()
    }

    /// Name of the record key that identifies a row
    fn key_name(&self) -> &str {
        <Self::Model as Model>::key_name()
    }

    /// Adjust the refinement context before refiners are applied
    fn transform_refinements(&self, _refine: &mut RefinementContext<Self::Query>) {}

    /// Adjust the projected page before it is cached
    fn transform_records(&self, records: PaginatedRecords) -> TableResult<PaginatedRecords> {
        Ok(records)
    }

    /// Optionally shape a model before projection
    ///
    /// Returning a shape lets the table compute derived fields and drop the
    /// `authorization` field when authorizations are not resolved.
    fn resolve_data_record(
        &self,
        _model: &Self::Model,
    ) -> anyhow::Result<Option<Box<dyn RecordShape>>> {
        Ok(None)
    }
}

//! Request-scoped table state
//!
//! A [`TableSession`] owns one table for the duration of one request and
//! memoizes every expensive step: the refiner list, the refinement context,
//! the column registry and the projected page. Accessors take `&mut self` so
//! the memoized slots fill lazily, on first use.

use crate::config::{HybridConfig, TableOptions, TablesConfig};
use crate::core::column::ColumnRegistry;
use crate::core::error::{QueryError, TableResult};
use crate::core::query::{Query, RequestContext, format_scope};
use crate::pagination::{PaginatedRecords, PaginatorKind, PaginatorMeta, RawPage};
use crate::refining::{Refinement, RefinementContext, Refiner};
use crate::tables::projector::{ProjectedRecord, RecordProjector, resolve_record};
use crate::tables::table::Table;
use crate::tables::view::TableView;
use std::sync::Arc;

type RefinerList<Q> = Vec<Arc<dyn Refiner<Q>>>;

/// One table, one request
pub struct TableSession<T: Table> {
    table: T,
    request: RequestContext,
    settings: TablesConfig,
    options: TableOptions,

    cached_refiners: Option<RefinerList<T::Query>>,
    refine: Option<RefinementContext<T::Query>>,
    columns: Option<ColumnRegistry<T::Model>>,
    cached_records: Option<PaginatedRecords>,
}

impl<T: Table> TableSession<T> {
    pub fn new(table: T, request: RequestContext, settings: TablesConfig) -> Self {
        let options = table.options();
        Self {
            table,
            request,
            settings,
            options,
            cached_refiners: None,
            refine: None,
            columns: None,
            cached_records: None,
        }
    }

    /// Create a session using the `tables` section of an application config
    pub fn with_config(table: T, request: RequestContext, config: &HybridConfig) -> Self {
        Self::new(table, request, config.tables.clone())
    }

    /// Leave per-row authorizations out of shaped records
    pub fn without_resolving_authorizations(mut self) -> Self {
        self.options.resolves_authorizations = false;
        self
    }

    pub fn resolves_authorizations(&self) -> bool {
        self.options.resolves_authorizations
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Visible refiners, in declaration order
    pub fn get_refiners(&mut self) -> &[Arc<dyn Refiner<T::Query>>] {
        visible_refiners(&mut self.cached_refiners, &self.table)
    }

    /// The declared columns
    pub fn get_columns(&mut self) -> TableResult<&ColumnRegistry<T::Model>> {
        registry(&mut self.columns, &self.table)
    }

    /// The base query with every visible refiner applied
    pub fn get_refined_query(&mut self) -> TableResult<&T::Query> {
        let refine = refined(
            &mut self.refine,
            &mut self.cached_refiners,
            &self.table,
            &self.options.scope,
            &self.request,
        )?;
        Ok(refine.builder())
    }

    /// Describe the visible refiners and their state for this request
    ///
    /// Refiners are applied first, so a failing refiner is reported here too.
    pub fn get_refinements(&mut self) -> TableResult<Vec<Refinement>> {
        let refine = refined(
            &mut self.refine,
            &mut self.cached_refiners,
            &self.table,
            &self.options.scope,
            &self.request,
        )?;
        Ok(refine.refinements(&self.request))
    }

    /// The projected page, computed once
    pub fn get_paginated_records(&mut self) -> TableResult<&PaginatedRecords> {
        let page = match self.cached_records.take() {
            Some(page) => page,
            None => self.paginate_and_project()?,
        };
        Ok(self.cached_records.insert(page))
    }

    /// Projected records of the current page
    pub fn get_records(&mut self) -> TableResult<&[ProjectedRecord]> {
        Ok(&self.get_paginated_records()?.data)
    }

    /// Pagination metadata of the current page, as `{links, meta}`
    pub fn get_paginator_meta(&mut self) -> TableResult<PaginatorMeta> {
        let page = self.get_paginated_records()?;
        Ok(PaginatorMeta::normalize(&page.pagination))
    }

    /// Everything a front-end table needs, in one serializable value
    pub fn to_view(&mut self) -> TableResult<TableView> {
        let records = self.get_records()?.to_vec();
        let paginator = self.get_paginator_meta()?;
        let refinements = self.get_refinements()?;
        let columns = self.get_columns()?.descriptors();

        Ok(TableView {
            key_name: self.table.key_name().to_string(),
            scope: self.options.scope.clone(),
            columns,
            records,
            paginator,
            refinements,
        })
    }

    fn paginate_and_project(&mut self) -> TableResult<PaginatedRecords> {
        let refine = refined(
            &mut self.refine,
            &mut self.cached_refiners,
            &self.table,
            &self.options.scope,
            &self.request,
        )?;

        let kind = self.options.paginator_kind()?;
        let per_page = self.options.records_per_page()?;
        let raw = paginate(
            refine.builder(),
            kind,
            per_page,
            &self.options.scope,
            &self.request,
        )?;

        tracing::debug!(
            paginator = %kind,
            page_name = raw.page_name(),
            per_page,
            rows = raw.items().len(),
            "paginated table query"
        );

        let columns = registry(&mut self.columns, &self.table)?;
        let table = &self.table;
        let projector = RecordProjector::new(columns, table.key_name(), self.settings.enable_actions);
        let resolves_authorizations = self.options.resolves_authorizations;

        let page = raw.through(|model, position| -> TableResult<ProjectedRecord> {
            let record = resolve_record(table, &model, resolves_authorizations)?;
            tracing::trace!(position, "projecting record");
            Ok(projector.project(&model, record, position)?)
        })?;

        let (data, pagination) = page.into_parts();
        tracing::debug!(
            records = data.len(),
            has_key_as_column = projector.has_key_as_column(),
            "projected page"
        );
        self.table
            .transform_records(PaginatedRecords::new(data, pagination))
    }
}

fn visible_refiners<'s, T: Table>(
    slot: &'s mut Option<RefinerList<T::Query>>,
    table: &T,
) -> &'s [Arc<dyn Refiner<T::Query>>] {
    slot.get_or_insert_with(|| {
        table
            .define_refiners()
            .into_iter()
            .filter(|refiner| !refiner.is_hidden())
            .collect()
    })
}

fn registry<'s, T: Table>(
    slot: &'s mut Option<ColumnRegistry<T::Model>>,
    table: &T,
) -> TableResult<&'s ColumnRegistry<T::Model>> {
    let columns = match slot.take() {
        Some(columns) => columns,
        None => ColumnRegistry::new(table.define_columns())?,
    };
    Ok(slot.insert(columns))
}

/// Build the refinement context on first use, then make sure it is applied
fn refined<'s, T: Table>(
    slot: &'s mut Option<RefinementContext<T::Query>>,
    refiners: &mut Option<RefinerList<T::Query>>,
    table: &T,
    scope: &str,
    request: &RequestContext,
) -> TableResult<&'s mut RefinementContext<T::Query>> {
    let refine = match slot.take() {
        Some(refine) => refine,
        None => {
            let query = table.define_query().map_err(QueryError::Definition)?;
            let mut refine = RefinementContext::query(query)
                .scope(scope)
                .with(visible_refiners(refiners, table).iter().cloned());
            table.transform_refinements(&mut refine);
            tracing::debug!(
                scope,
                refiners = refine.refiners().len(),
                "built refinement context"
            );
            refine
        }
    };

    let refine = slot.insert(refine);
    refine.apply_refiners(request)?;
    Ok(refine)
}

fn paginate<Q: Query>(
    query: &Q,
    kind: PaginatorKind,
    per_page: usize,
    scope: &str,
    request: &RequestContext,
) -> TableResult<RawPage<Q::Model>> {
    let name = format_scope(scope, kind.parameter());
    let page = match kind {
        PaginatorKind::LengthAware => query.paginate(per_page, &name, request),
        PaginatorKind::Simple => query.simple_paginate(per_page, &name, request),
        PaginatorKind::Cursor => query.cursor_paginate(per_page, &name, request),
    }
    .map_err(query_error)?;

    Ok(page.with_query_string(request))
}

/// Keep typed query errors raised by the store, wrap anything else
fn query_error(err: anyhow::Error) -> QueryError {
    match err.downcast::<QueryError>() {
        Ok(err) => err,
        Err(err) => QueryError::Execution(err),
    }
}

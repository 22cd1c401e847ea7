//! Column definitions and the per-table column registry

use crate::core::error::ConfigError;
use crate::core::model::Record;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Everything a column callback may look at for one row
pub struct ColumnContext<'a, M> {
    /// The column being resolved
    pub column: &'a dyn TableColumn<M>,

    /// The resolved plain record (after shaping and identity injection)
    pub record: &'a Record,

    /// The underlying domain object
    pub model: &'a M,
}

impl<'a, M> ColumnContext<'a, M> {
    /// Raw value of this column in the record
    pub fn raw_value(&self) -> Option<&'a Value> {
        self.record.get(self.column.name())
    }
}

/// A table column
///
/// Columns may transform the raw value before it is sent and may attach
/// extra data computed from the model. Both capabilities are opt-in and the
/// projector only calls the matching method when the flag is set.
pub trait TableColumn<M>: Send + Sync {
    /// Unique name, matching a key of the record
    fn name(&self) -> &str;

    fn label(&self) -> &str {
        self.name()
    }

    fn is_hidden(&self) -> bool {
        false
    }

    /// Free-form metadata forwarded to the front-end
    fn metadata(&self) -> Record {
        Record::new()
    }

    fn has_extra(&self) -> bool {
        false
    }

    fn can_transform_value(&self) -> bool {
        false
    }

    /// Extra data for a row
    fn extra(&self, _context: &ColumnContext<'_, M>) -> anyhow::Result<Record> {
        Ok(Record::new())
    }

    /// Transformed value for a row
    fn transformed_value(&self, context: &ColumnContext<'_, M>) -> anyhow::Result<Value> {
        Ok(context.raw_value().cloned().unwrap_or(Value::Null))
    }

    fn describe(&self) -> ColumnDescriptor {
        ColumnDescriptor {
            name: self.name().to_string(),
            label: self.label().to_string(),
            hidden: self.is_hidden(),
            metadata: self.metadata(),
        }
    }
}

/// Serializable description of a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub label: String,
    pub hidden: bool,
    pub metadata: Record,
}

type ValueFn<M> = Arc<dyn Fn(&ColumnContext<'_, M>) -> anyhow::Result<Value> + Send + Sync>;
type ExtraFn<M> = Arc<dyn Fn(&ColumnContext<'_, M>) -> anyhow::Result<Record> + Send + Sync>;

/// Closure-configured column
///
/// # Example
/// ```rust,ignore
/// let name = Column::make("name")
///     .with_label("Full name")
///     .transform(transforms::uppercase())
///     .with_extra(|ctx| {
///         let mut extra = Record::new();
///         extra.insert("verified".into(), json!(ctx.model.verified));
///         Ok(extra)
///     })
///     .shared();
/// ```
pub struct Column<M> {
    name: String,
    label: Option<String>,
    hidden: bool,
    metadata: Record,
    transform: Option<ValueFn<M>>,
    extra: Option<ExtraFn<M>>,
}

impl<M> Column<M> {
    pub fn make(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            hidden: false,
            metadata: Record::new(),
            transform: None,
            extra: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Compute the sent value from the row context
    pub fn transform_value_using<F>(mut self, f: F) -> Self
    where
        F: Fn(&ColumnContext<'_, M>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(f));
        self
    }

    /// Transform the raw value with a value filter from [`crate::core::transforms`]
    pub fn transform<F>(self, filter: F) -> Self
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.transform_value_using(move |context| {
            let raw = context.raw_value().cloned().unwrap_or(Value::Null);
            filter(context.column.name(), raw)
        })
    }

    /// Attach extra data computed from the row context
    pub fn with_extra<F>(mut self, f: F) -> Self
    where
        F: Fn(&ColumnContext<'_, M>) -> anyhow::Result<Record> + Send + Sync + 'static,
    {
        self.extra = Some(Arc::new(f));
        self
    }

    /// Share the column as a trait object, ready for registration
    pub fn shared(self) -> Arc<dyn TableColumn<M>>
    where
        M: 'static,
    {
        Arc::new(self)
    }
}

impl<M> TableColumn<M> for Column<M> {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn metadata(&self) -> Record {
        self.metadata.clone()
    }

    fn has_extra(&self) -> bool {
        self.extra.is_some()
    }

    fn can_transform_value(&self) -> bool {
        self.transform.is_some()
    }

    fn extra(&self, context: &ColumnContext<'_, M>) -> anyhow::Result<Record> {
        match &self.extra {
            Some(f) => f(context),
            None => Ok(Record::new()),
        }
    }

    fn transformed_value(&self, context: &ColumnContext<'_, M>) -> anyhow::Result<Value> {
        match &self.transform {
            Some(f) => f(context),
            None => Ok(context.raw_value().cloned().unwrap_or(Value::Null)),
        }
    }
}

/// Ordered, name-keyed set of a table's columns
pub struct ColumnRegistry<M> {
    columns: IndexMap<String, Arc<dyn TableColumn<M>>>,
}

impl<M> ColumnRegistry<M> {
    /// Register columns in declaration order, rejecting duplicate names
    pub fn new(columns: Vec<Arc<dyn TableColumn<M>>>) -> Result<Self, ConfigError> {
        let mut registry = IndexMap::with_capacity(columns.len());
        for column in columns {
            let name = column.name().to_string();
            if registry.contains_key(&name) {
                return Err(ConfigError::DuplicateColumn { name });
            }
            registry.insert(name, column);
        }
        Ok(Self { columns: registry })
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn TableColumn<M>>> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn TableColumn<M>>> {
        self.columns.values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether the key column is declared and sends its raw value
    ///
    /// A transformed key cannot identify the row, so it does not count.
    pub fn has_key_as_column(&self, key_name: &str) -> bool {
        self.get(key_name)
            .is_some_and(|column| !column.can_transform_value())
    }

    pub fn descriptors(&self) -> Vec<ColumnDescriptor> {
        self.iter().map(|column| column.describe()).collect()
    }
}

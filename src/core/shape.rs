//! Row-shaping types: an optional layer between a model and its record
//!
//! A table may shape each model into a dedicated data type before projection
//! (to rename fields, add computed ones or attach per-row authorizations).
//! When authorization resolution is disabled for a table, the shaped record
//! drops its `authorization` field before being flattened.

use crate::core::error::ProjectionError;
use crate::core::model::{Record, to_record};
use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;

/// Record key carrying per-row authorizations
pub const AUTHORIZATION_KEY: &str = "authorization";

/// Record key carrying the row identity used by actions
pub const HYBRID_ID_KEY: &str = "__hybridId";

/// A shaped record that can exclude fields and flatten itself
pub trait RecordShape {
    /// Exclude a field from every subsequent flattening
    fn exclude_permanently(&mut self, field: &str);

    /// Flatten into a plain record
    fn to_record(&self) -> Result<Record, ProjectionError>;
}

/// Stock [`RecordShape`] wrapping any serializable data type
///
/// # Example
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct UserData { id: u64, name: String, authorization: Value }
///
/// fn resolve_data_record(&self, user: &User) -> anyhow::Result<Option<Box<dyn RecordShape>>> {
///     Ok(Some(Box::new(DataRecord::<UserData>::from_model(user)?)))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DataRecord<D> {
    data: D,
    excluded: BTreeSet<String>,
}

impl<D: Serialize> DataRecord<D> {
    pub fn new(data: D) -> Self {
        Self {
            data,
            excluded: BTreeSet::new(),
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }
}

impl<D: Serialize + DeserializeOwned> DataRecord<D> {
    /// Build the data type from a model's serialized fields
    ///
    /// Fails when the model lacks a field the data type requires.
    pub fn from_model<M: Serialize>(model: &M) -> anyhow::Result<Self> {
        let value = serde_json::to_value(model).context("failed to serialize model")?;
        let data = serde_json::from_value(value).with_context(|| {
            format!(
                "model cannot be shaped into {}",
                std::any::type_name::<D>()
            )
        })?;
        Ok(Self::new(data))
    }
}

impl<D: Serialize> RecordShape for DataRecord<D> {
    fn exclude_permanently(&mut self, field: &str) {
        self.excluded.insert(field.to_string());
    }

    fn to_record(&self) -> Result<Record, ProjectionError> {
        let mut record = to_record(&self.data)?;
        record.retain(|key, _| !self.excluded.contains(key));
        Ok(record)
    }
}

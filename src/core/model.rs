//! Model trait defining the domain objects a table lists

use crate::core::error::ProjectionError;
use serde::Serialize;
use serde_json::{Map, Value};

/// A plain record: the flattened, string-keyed form of a model or shaped record.
pub type Record = Map<String, Value>;

/// Base trait for the domain objects listed by a table.
///
/// A model knows its primary key and how to flatten itself into a [`Record`].
/// The default flattening goes through `serde`, so deriving `Serialize` is
/// usually all that is needed besides [`Model::key`].
pub trait Model: Serialize + Send + Sync + 'static {
    /// Name of the primary key attribute
    fn key_name() -> &'static str {
        "id"
    }

    /// Primary key value of this instance
    fn key(&self) -> Value;

    /// Flatten the model into a plain record
    fn to_record(&self) -> Result<Record, ProjectionError> {
        to_record(self)
    }

    /// Get the value of a specific attribute by name
    ///
    /// Used by in-memory refinement. `None` when the attribute does not exist.
    fn field_value(&self, field: &str) -> Option<Value> {
        self.to_record().ok().and_then(|mut r| r.remove(field))
    }
}

/// Serialize any value into a [`Record`], failing when it is not a mapping.
pub fn to_record<T: Serialize + ?Sized>(value: &T) -> Result<Record, ProjectionError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ProjectionError::NotAnObject {
            found: value_kind(&other).to_string(),
        }),
        Err(e) => Err(ProjectionError::Shape(e.into())),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

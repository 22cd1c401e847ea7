//! Refiner trait and refinement descriptors

use crate::core::query::{RequestContext, format_scope};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a refiner reads from the request
#[derive(Debug, Clone, Copy)]
pub struct RefinerInput<'a> {
    pub request: &'a RequestContext,
    pub scope: &'a str,
}

impl<'a> RefinerInput<'a> {
    pub fn new(request: &'a RequestContext, scope: &'a str) -> Self {
        Self { request, scope }
    }

    /// Scope-qualified parameter name
    pub fn parameter(&self, key: &str) -> String {
        format_scope(self.scope, key)
    }

    /// Value of a scope-qualified parameter, ignoring blank values
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.request
            .get(&self.parameter(key))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// A named unit of query mutation applied before pagination
///
/// Refiners are applied in registration order. Hidden refiners are left out
/// of a table's active set.
pub trait Refiner<Q>: Send + Sync {
    fn name(&self) -> &str;

    fn is_hidden(&self) -> bool {
        false
    }

    /// Constrain the query according to the request
    fn apply(&self, query: &mut Q, input: &RefinerInput<'_>) -> anyhow::Result<()>;

    /// Describe the refiner and its current state for the front-end
    fn refinement(&self, input: &RefinerInput<'_>) -> Refinement;
}

/// Kind of refinement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementKind {
    Filter,
    Sort,
}

/// Serializable state of one refiner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refinement {
    pub kind: RefinementKind,
    pub name: String,
    pub label: String,
    /// Request parameter the refiner reads
    pub parameter: String,
    /// Current value, if the request sets one
    pub value: Option<Value>,
    pub is_active: bool,
    pub hidden: bool,
}

/// Comparison applied by a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    #[default]
    Equals,
    Contains,
    GreaterThan,
    LessThan,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Queries the stock [`Filter`](crate::refining::Filter) and
/// [`Sort`](crate::refining::Sort) refiners know how to constrain
pub trait Refinable {
    fn where_value(&mut self, field: &str, operator: FilterOperator, value: Value);

    fn order_by(&mut self, field: &str, direction: SortDirection);
}

/// Interpret a query-string value: booleans and numbers become typed values
pub fn parse_parameter_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(int) = raw.parse::<i64>() {
                Value::from(int)
            } else if let Some(number) = raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .and_then(serde_json::Number::from_f64)
            {
                Value::Number(number)
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

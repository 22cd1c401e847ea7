//! Field filter refiner

use crate::refining::refiner::{
    FilterOperator, Refinable, Refinement, RefinementKind, Refiner, RefinerInput,
    parse_parameter_value,
};
use std::sync::Arc;

/// Filters records on one field, reading `filters[<name>]`
///
/// ```rust,ignore
/// Filter::make("name").operator(FilterOperator::Contains).shared()
/// // GET /users?filters[name]=ann
/// ```
#[derive(Debug, Clone)]
pub struct Filter {
    name: String,
    label: Option<String>,
    operator: FilterOperator,
    hidden: bool,
}

impl Filter {
    pub fn make(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            operator: FilterOperator::default(),
            hidden: false,
        }
    }

    pub fn operator(mut self, operator: FilterOperator) -> Self {
        self.operator = operator;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn shared<Q: Refinable>(self) -> Arc<dyn Refiner<Q>> {
        Arc::new(self)
    }

    fn key(&self) -> String {
        format!("filters[{}]", self.name)
    }
}

impl<Q: Refinable> Refiner<Q> for Filter {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn apply(&self, query: &mut Q, input: &RefinerInput<'_>) -> anyhow::Result<()> {
        if let Some(raw) = input.get(&self.key()) {
            query.where_value(&self.name, self.operator, parse_parameter_value(raw));
        }
        Ok(())
    }

    fn refinement(&self, input: &RefinerInput<'_>) -> Refinement {
        let value = input.get(&self.key()).map(parse_parameter_value);
        Refinement {
            kind: RefinementKind::Filter,
            name: self.name.clone(),
            label: self.label.clone().unwrap_or_else(|| self.name.clone()),
            parameter: input.parameter(&self.key()),
            is_active: value.is_some(),
            value,
            hidden: self.hidden,
        }
    }
}

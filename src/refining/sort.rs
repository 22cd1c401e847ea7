//! Sort refiner

use crate::refining::refiner::{
    Refinable, Refinement, RefinementKind, Refiner, RefinerInput, SortDirection,
};
use serde_json::json;
use std::sync::Arc;

/// Sorts records on one field, reading `sort=<name>` or `sort=-<name>`
#[derive(Debug, Clone)]
pub struct Sort {
    name: String,
    label: Option<String>,
    default: Option<SortDirection>,
    hidden: bool,
}

impl Sort {
    pub fn make(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            default: None,
            hidden: false,
        }
    }

    /// Apply this sort when the request does not sort at all
    pub fn default(mut self, direction: SortDirection) -> Self {
        self.default = Some(direction);
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

    /// Direction requested for this sort, falling back to its default
    fn direction(&self, input: &RefinerInput<'_>) -> Option<SortDirection> {
        match input.get("sort") {
            Some(value) => match value.strip_prefix('-') {
                Some(name) if name == self.name => Some(SortDirection::Desc),
                None if value == self.name => Some(SortDirection::Asc),
                _ => None,
            },
            None => self.default,
        }
    }
}

impl<Q: Refinable> Refiner<Q> for Sort {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn apply(&self, query: &mut Q, input: &RefinerInput<'_>) -> anyhow::Result<()> {
        if let Some(direction) = self.direction(input) {
            query.order_by(&self.name, direction);
        }
        Ok(())
    }

    fn refinement(&self, input: &RefinerInput<'_>) -> Refinement {
        let direction = self.direction(input);
        Refinement {
            kind: RefinementKind::Sort,
            name: self.name.clone(),
            label: self.label.clone().unwrap_or_else(|| self.name.clone()),
            parameter: input.parameter("sort"),
            value: direction.map(|d| json!(d.as_str())),
            is_active: direction.is_some(),
            hidden: self.hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::RequestContext;
    use crate::refining::refiner::FilterOperator;
    use serde_json::Value;

    #[derive(Default)]
    struct Recorder {
        orders: Vec<(String, SortDirection)>,
    }

    impl Refinable for Recorder {
        fn where_value(&mut self, _field: &str, _operator: FilterOperator, _value: Value) {}

        fn order_by(&mut self, field: &str, direction: SortDirection) {
            self.orders.push((field.to_string(), direction));
        }
    }

    fn apply(sort: &Sort, request: &RequestContext) -> Vec<(String, SortDirection)> {
        let mut query = Recorder::default();
        sort.apply(&mut query, &RefinerInput::new(request, "")).unwrap();
        query.orders
    }

    #[test]
    fn test_ascending_and_descending() {
        let sort = Sort::make("name");
        let asc = RequestContext::new("/").with_param("sort", "name");
        let desc = RequestContext::new("/").with_param("sort", "-name");
        assert_eq!(apply(&sort, &asc), vec![("name".to_string(), SortDirection::Asc)]);
        assert_eq!(apply(&sort, &desc), vec![("name".to_string(), SortDirection::Desc)]);
    }

    #[test]
    fn test_other_sort_is_ignored() {
        let sort = Sort::make("name").default(SortDirection::Desc);
        let request = RequestContext::new("/").with_param("sort", "email");
        assert!(apply(&sort, &request).is_empty());
    }

    #[test]
    fn test_default_applies_without_sort_parameter() {
        let sort = Sort::make("created_at").default(SortDirection::Desc);
        assert_eq!(
            apply(&sort, &RequestContext::new("/")),
            vec![("created_at".to_string(), SortDirection::Desc)]
        );
    }

    #[test]
    fn test_sort_refinement() {
        let sort = Sort::make("name");
        let request = RequestContext::new("/").with_param("sort", "-name");
        let refinement = Refiner::<Recorder>::refinement(&sort, &RefinerInput::new(&request, ""));
        assert_eq!(refinement.kind, RefinementKind::Sort);
        assert_eq!(refinement.value, Some(json!("desc")));
        assert!(refinement.is_active);
    }
}

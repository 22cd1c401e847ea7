//! Refinement context: one query, one scope, one set of refiners

use crate::core::error::QueryError;
use crate::core::query::RequestContext;
use crate::refining::refiner::{Refinement, Refiner, RefinerInput};
use std::sync::Arc;

/// Binds a base query to a scope and the refiners to apply to it
///
/// Refiners run at most once: [`RefinementContext::apply_refiners`] is a
/// no-op after the first successful call. A failed application poisons the
/// context, since the query may be half-refined.
pub struct RefinementContext<Q> {
    query: Q,
    scope: String,
    refiners: Vec<Arc<dyn Refiner<Q>>>,
    applied: bool,
    failed_refiner: Option<String>,
}

impl<Q> RefinementContext<Q> {
    /// Start refining a query
    pub fn query(query: Q) -> Self {
        Self {
            query,
            scope: String::new(),
            refiners: Vec::new(),
            applied: false,
            failed_refiner: None,
        }
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with(mut self, refiners: impl IntoIterator<Item = Arc<dyn Refiner<Q>>>) -> Self {
        self.refiners.extend(refiners);
        self
    }

    /// Register one more refiner; ignored once refiners were applied
    pub fn add_refiner(&mut self, refiner: Arc<dyn Refiner<Q>>) -> &mut Self {
        if self.applied {
            tracing::warn!(
                refiner = refiner.name(),
                "refiner added after application, ignoring"
            );
        } else {
            self.refiners.push(refiner);
        }
        self
    }

    pub fn get_scope(&self) -> &str {
        &self.scope
    }

    pub fn refiners(&self) -> &[Arc<dyn Refiner<Q>>] {
        &self.refiners
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// The query, refined or not
    pub fn builder(&self) -> &Q {
        &self.query
    }

    /// Mutable access to the query, for constraints added before refinement
    pub fn builder_mut(&mut self) -> &mut Q {
        &mut self.query
    }

    /// Apply every refiner in order, once
    pub fn apply_refiners(&mut self, request: &RequestContext) -> Result<&mut Self, QueryError> {
        if let Some(refiner) = &self.failed_refiner {
            return Err(QueryError::Refiner {
                refiner: refiner.clone(),
                source: anyhow::anyhow!("refinement already failed for this query"),
            });
        }

        if self.applied {
            return Ok(self);
        }

        tracing::debug!(
            scope = %self.scope,
            refiners = self.refiners.len(),
            "applying refiners"
        );

        let input = RefinerInput::new(request, &self.scope);
        for refiner in &self.refiners {
            if let Err(source) = refiner.apply(&mut self.query, &input) {
                self.failed_refiner = Some(refiner.name().to_string());
                return Err(QueryError::Refiner {
                    refiner: refiner.name().to_string(),
                    source,
                });
            }
        }

        self.applied = true;
        Ok(self)
    }

    /// Describe every refiner in the context
    pub fn refinements(&self, request: &RequestContext) -> Vec<Refinement> {
        let input = RefinerInput::new(request, &self.scope);
        self.refiners
            .iter()
            .map(|refiner| refiner.refinement(&input))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refining::refiner::RefinementKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Append {
        name: &'static str,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Refiner<Vec<String>> for Append {
        fn name(&self) -> &str {
            self.name
        }

        fn apply(&self, query: &mut Vec<String>, input: &RefinerInput<'_>) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("cannot apply {}", self.name);
            }
            query.push(format!("{}:{}", input.scope, self.name));
            Ok(())
        }

        fn refinement(&self, input: &RefinerInput<'_>) -> Refinement {
            Refinement {
                kind: RefinementKind::Filter,
                name: self.name.to_string(),
                label: self.name.to_string(),
                parameter: input.parameter(self.name),
                value: None,
                is_active: false,
                hidden: false,
            }
        }
    }

    fn append(name: &'static str, calls: &Arc<AtomicUsize>) -> Arc<dyn Refiner<Vec<String>>> {
        Arc::new(Append {
            name,
            calls: calls.clone(),
            fail: false,
        })
    }

    #[test]
    fn test_applies_in_order_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut context = RefinementContext::query(Vec::new())
            .scope("users")
            .with([append("a", &calls), append("b", &calls)]);
        let request = RequestContext::new("/");

        context.apply_refiners(&request).unwrap();
        context.apply_refiners(&request).unwrap();

        assert!(context.is_applied());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(context.builder(), &["users:a", "users:b"]);
    }

    #[test]
    fn test_refiner_added_after_application_is_ignored() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut context = RefinementContext::query(Vec::new()).with([append("a", &calls)]);
        context.apply_refiners(&RequestContext::new("/")).unwrap();

        context.add_refiner(append("late", &calls));
        assert_eq!(context.refiners().len(), 1);
    }

    #[test]
    fn test_failure_poisons_context() {
        let calls = Arc::new(AtomicUsize::new(0));
        let failing: Arc<dyn Refiner<Vec<String>>> = Arc::new(Append {
            name: "broken",
            calls: calls.clone(),
            fail: true,
        });
        let mut context = RefinementContext::query(Vec::new()).with([failing]);
        let request = RequestContext::new("/");

        let err = context.apply_refiners(&request).err().unwrap();
        assert!(matches!(err, QueryError::Refiner { ref refiner, .. } if refiner == "broken"));

        assert!(context.apply_refiners(&request).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!context.is_applied());
    }

    #[test]
    fn test_refinements_use_scope() {
        let calls = Arc::new(AtomicUsize::new(0));
        let context = RefinementContext::query(Vec::new())
            .scope("orders")
            .with([append("status", &calls)]);
        let refinements = context.refinements(&RequestContext::new("/"));
        assert_eq!(refinements.len(), 1);
        assert_eq!(refinements[0].parameter, "orders_status");
    }
}

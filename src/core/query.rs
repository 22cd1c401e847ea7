//! Request parameters and the data-store query interface

use crate::core::model::Model;
use crate::pagination::RawPage;
use anyhow::Result;
use axum::http::Uri;

/// Query-string view of the incoming request
///
/// Tables read their page number, cursor and refiner values from here, and
/// pagination links repeat these parameters so filters survive navigation.
///
/// # Example
/// ```rust,ignore
/// let request = RequestContext::from_query_string("/users", "users_page=2&sort=-name");
/// assert_eq!(request.get("users_page"), Some("2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    path: String,
    params: Vec<(String, String)>,
}

impl RequestContext {
    /// Create a request context without parameters
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Parse an `application/x-www-form-urlencoded` query string
    pub fn from_query_string(path: impl Into<String>, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            path: path.into(),
            params: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Build the context from an HTTP request URI
    pub fn from_uri(uri: &Uri) -> Self {
        Self::from_query_string(uri.path(), uri.query().unwrap_or_default())
    }

    /// Add a parameter (builder style)
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Request path, used as the base of pagination links
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All parameters in request order
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Value of a parameter; the last occurrence wins
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Current page number for a page parameter
    ///
    /// Missing, non-numeric or zero values fall back to the first page.
    pub fn page(&self, page_name: &str) -> usize {
        self.get(page_name)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }
}

/// Qualify a parameter name with a table scope
///
/// Several tables rendered on one page each get their own `page`, `cursor`,
/// `sort` and `filters` parameters.
pub fn format_scope(scope: &str, key: &str) -> String {
    if scope.is_empty() {
        key.to_string()
    } else {
        format!("{}_{}", scope, key)
    }
}

/// Data-store query that a table refines and paginates
///
/// Implementations execute the query synchronously. Errors are reported as
/// `anyhow::Error` and surface as data-access errors.
pub trait Query {
    /// Domain object produced by this query
    type Model: Model;

    /// Page-number pagination with a total count
    fn paginate(
        &self,
        per_page: usize,
        page_name: &str,
        request: &RequestContext,
    ) -> Result<RawPage<Self::Model>>;

    /// Page-number pagination without a total count
    fn simple_paginate(
        &self,
        per_page: usize,
        page_name: &str,
        request: &RequestContext,
    ) -> Result<RawPage<Self::Model>>;

    /// Opaque-cursor pagination
    fn cursor_paginate(
        &self,
        per_page: usize,
        cursor_name: &str,
        request: &RequestContext,
    ) -> Result<RawPage<Self::Model>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string() {
        let request =
            RequestContext::from_query_string("/users", "?page=2&filters%5Bname%5D=ann+lee");
        assert_eq!(request.path(), "/users");
        assert_eq!(request.get("page"), Some("2"));
        assert_eq!(request.get("filters[name]"), Some("ann lee"));
        assert_eq!(request.get("missing"), None);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let request = RequestContext::from_query_string("/", "sort=name&sort=-name");
        assert_eq!(request.get("sort"), Some("-name"));
        assert_eq!(request.params().len(), 2);
    }

    #[test]
    fn test_page_defaults() {
        let request = RequestContext::new("/")
            .with_param("page", "3")
            .with_param("bad", "abc")
            .with_param("zero", "0");
        assert_eq!(request.page("page"), 3);
        assert_eq!(request.page("bad"), 1);
        assert_eq!(request.page("zero"), 1);
        assert_eq!(request.page("absent"), 1);
    }

    #[test]
    fn test_from_uri() {
        let uri: Uri = "/orders?orders_page=4".parse().unwrap();
        let request = RequestContext::from_uri(&uri);
        assert_eq!(request.path(), "/orders");
        assert_eq!(request.page("orders_page"), 4);
    }

    #[test]
    fn test_format_scope() {
        assert_eq!(format_scope("", "page"), "page");
        assert_eq!(format_scope("users", "page"), "users_page");
        assert_eq!(format_scope("users", "cursor"), "users_cursor");
    }
}

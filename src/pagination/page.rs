//! Raw pages returned by a data-store query

use crate::core::model::Record;
use crate::core::query::RequestContext;
use crate::pagination::cursor::Cursor;
use serde_json::{Value, json};

/// Pages shown on each side of the current page in the `links` list
const ON_EACH_SIDE: usize = 3;

/// Pagination state of a raw page, one variant per paginator kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// Page-number pagination with a known total
    LengthAware { current_page: usize, total: usize },

    /// Page-number pagination that only knows whether more items follow
    Simple { current_page: usize, has_more: bool },

    /// Cursor pagination
    Cursor {
        next_cursor: Option<Cursor>,
        prev_cursor: Option<Cursor>,
    },
}

/// One page of items fetched by a query, plus what is needed to describe it
///
/// The flat pagination fields produced by [`RawPage::pagination_fields`]
/// use the flat `current_page` / `next_page_url` layout that front-end
/// table components already understand.
#[derive(Debug, Clone)]
pub struct RawPage<M> {
    items: Vec<M>,
    state: PageState,
    per_page: usize,
    path: String,
    page_name: String,
    query: Vec<(String, String)>,
}

impl<M> RawPage<M> {
    /// Create a length-aware page
    pub fn length_aware(
        items: Vec<M>,
        total: usize,
        per_page: usize,
        current_page: usize,
        path: impl Into<String>,
        page_name: impl Into<String>,
    ) -> Self {
        Self::new(
            items,
            PageState::LengthAware {
                current_page,
                total,
            },
            per_page,
            path,
            page_name,
        )
    }

    /// Create a simple page
    pub fn simple(
        items: Vec<M>,
        has_more: bool,
        per_page: usize,
        current_page: usize,
        path: impl Into<String>,
        page_name: impl Into<String>,
    ) -> Self {
        Self::new(
            items,
            PageState::Simple {
                current_page,
                has_more,
            },
            per_page,
            path,
            page_name,
        )
    }

    /// Create a cursor page
    pub fn cursor(
        items: Vec<M>,
        prev_cursor: Option<Cursor>,
        next_cursor: Option<Cursor>,
        per_page: usize,
        path: impl Into<String>,
        cursor_name: impl Into<String>,
    ) -> Self {
        Self::new(
            items,
            PageState::Cursor {
                next_cursor,
                prev_cursor,
            },
            per_page,
            path,
            cursor_name,
        )
    }

    fn new(
        items: Vec<M>,
        state: PageState,
        per_page: usize,
        path: impl Into<String>,
        page_name: impl Into<String>,
    ) -> Self {
        Self {
            items,
            state,
            per_page,
            path: path.into(),
            page_name: page_name.into(),
            query: Vec::new(),
        }
    }

    /// Repeat the request's query string in every generated link
    ///
    /// The page (or cursor) parameter itself is left out; each link sets it.
    pub fn with_query_string(mut self, request: &RequestContext) -> Self {
        self.query = request
            .params()
            .iter()
            .filter(|(name, _)| *name != self.page_name)
            .cloned()
            .collect();
        self
    }

    pub fn items(&self) -> &[M] {
        &self.items
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Map every item, passing its 0-based position within the page
    pub fn through<R, E, F>(self, mut f: F) -> Result<RawPage<R>, E>
    where
        F: FnMut(M, usize) -> Result<R, E>,
    {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(position, item)| f(item, position))
            .collect::<Result<Vec<_>, E>>()?;

        Ok(RawPage {
            items,
            state: self.state,
            per_page: self.per_page,
            path: self.path,
            page_name: self.page_name,
            query: self.query,
        })
    }

    /// Split into items and flat pagination fields
    pub fn into_parts(self) -> (Vec<M>, Record) {
        let fields = self.pagination_fields();
        (self.items, fields)
    }

    /// Flat pagination fields, without the `data` entry
    pub fn pagination_fields(&self) -> Record {
        let mut fields = Record::new();
        match &self.state {
            PageState::LengthAware {
                current_page,
                total,
            } => {
                let current = *current_page;
                let last_page = self.last_page(*total);
                fields.insert("current_page".into(), json!(current));
                fields.insert("first_page_url".into(), json!(self.url(1)));
                fields.insert("from".into(), self.from(current));
                fields.insert("last_page".into(), json!(last_page));
                fields.insert("last_page_url".into(), json!(self.url(last_page)));
                fields.insert("links".into(), self.link_collection(current, last_page));
                fields.insert(
                    "next_page_url".into(),
                    self.optional_url(current < last_page, current.saturating_add(1)),
                );
                fields.insert("path".into(), json!(self.path));
                fields.insert("per_page".into(), json!(self.per_page));
                fields.insert(
                    "prev_page_url".into(),
                    self.optional_url(current > 1, current.saturating_sub(1)),
                );
                fields.insert("to".into(), self.to(current));
                fields.insert("total".into(), json!(total));
            }
            PageState::Simple {
                current_page,
                has_more,
            } => {
                let current = *current_page;
                fields.insert("current_page".into(), json!(current));
                fields.insert("first_page_url".into(), json!(self.url(1)));
                fields.insert("from".into(), self.from(current));
                fields.insert(
                    "next_page_url".into(),
                    self.optional_url(*has_more, current.saturating_add(1)),
                );
                fields.insert("path".into(), json!(self.path));
                fields.insert("per_page".into(), json!(self.per_page));
                fields.insert(
                    "prev_page_url".into(),
                    self.optional_url(current > 1, current.saturating_sub(1)),
                );
                fields.insert("to".into(), self.to(current));
            }
            PageState::Cursor {
                next_cursor,
                prev_cursor,
            } => {
                fields.insert("path".into(), json!(self.path));
                fields.insert("per_page".into(), json!(self.per_page));
                fields.insert(
                    "next_cursor".into(),
                    next_cursor.map_or(Value::Null, |c| json!(c.encode())),
                );
                fields.insert(
                    "next_page_url".into(),
                    next_cursor.map_or(Value::Null, |c| json!(self.url_with(&c.encode()))),
                );
                fields.insert(
                    "prev_cursor".into(),
                    prev_cursor.map_or(Value::Null, |c| json!(c.encode())),
                );
                fields.insert(
                    "prev_page_url".into(),
                    prev_cursor.map_or(Value::Null, |c| json!(self.url_with(&c.encode()))),
                );
            }
        }
        fields
    }

    /// URL of a given page number
    pub fn url(&self, page: usize) -> String {
        self.url_with(&page.max(1).to_string())
    }

    fn url_with(&self, value: &str) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, v) in &self.query {
            serializer.append_pair(name, v);
        }
        serializer.append_pair(&self.page_name, value);

        let separator = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.path, separator, serializer.finish())
    }

    fn optional_url(&self, condition: bool, page: usize) -> Value {
        if condition {
            json!(self.url(page))
        } else {
            Value::Null
        }
    }

    fn last_page(&self, total: usize) -> usize {
        total.div_ceil(self.per_page.max(1)).max(1)
    }

    /// Rows before the first item of a page
    fn offset(&self, current_page: usize) -> usize {
        current_page.saturating_sub(1).saturating_mul(self.per_page)
    }

    fn from(&self, current_page: usize) -> Value {
        if self.items.is_empty() {
            Value::Null
        } else {
            json!(self.offset(current_page).saturating_add(1))
        }
    }

    fn to(&self, current_page: usize) -> Value {
        if self.items.is_empty() {
            Value::Null
        } else {
            json!(self.offset(current_page).saturating_add(self.items.len()))
        }
    }

    /// Previous / numbered / next entries, eliding distant pages with `...`
    fn link_collection(&self, current: usize, last_page: usize) -> Value {
        let mut links = vec![json!({
            "url": self.optional_url(current > 1, current.saturating_sub(1)),
            "label": "&laquo; Previous",
            "active": false,
        })];

        let window_start = current.saturating_sub(ON_EACH_SIDE).max(1);
        let window_end = current.saturating_add(ON_EACH_SIDE).min(last_page);
        let mut previous: Option<usize> = None;

        for page in 1..=last_page {
            let in_window = (window_start..=window_end).contains(&page);
            let at_edge = page <= 2 || page + 1 >= last_page;
            if !in_window && !at_edge {
                continue;
            }
            if previous.is_some_and(|p| page > p + 1) {
                links.push(json!({ "url": null, "label": "...", "active": false }));
            }
            links.push(json!({
                "url": self.url(page),
                "label": page.to_string(),
                "active": page == current,
            }));
            previous = Some(page);
        }

        links.push(json!({
            "url": self.optional_url(current < last_page, current.saturating_add(1)),
            "label": "Next &raquo;",
            "active": false,
        }));

        Value::Array(links)
    }
}

//! Cached page structure and pagination metadata normalization

use crate::core::model::Record;
use crate::tables::projector::ProjectedRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields copied from a flat page into `meta`
pub const META_FIELDS: [&str; 13] = [
    "current_page",
    "first_page_url",
    "from",
    "last_page",
    "last_page_url",
    "next_page_url",
    "path",
    "per_page",
    "prev_page_url",
    "to",
    "total",
    "prev_cursor",
    "next_cursor",
];

/// URL fields moved from `meta` into `links` by [`PaginatedRecords::into_nested`]
const NESTED_LINKS: [(&str, &str); 4] = [
    ("first", "first_page_url"),
    ("last", "last_page_url"),
    ("prev", "prev_page_url"),
    ("next", "next_page_url"),
];

/// A projected page, as cached by a table session
///
/// `pagination` holds either the flat paginator fields or the nested
/// `links` / `meta` pair, depending on how the table transformed its records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedRecords {
    pub data: Vec<ProjectedRecord>,

    #[serde(flatten)]
    pub pagination: Record,
}

impl PaginatedRecords {
    pub fn new(data: Vec<ProjectedRecord>, pagination: Record) -> Self {
        Self { data, pagination }
    }

    /// Convert flat pagination fields into the nested resource shape
    ///
    /// `{data, links: {first, last, prev, next}, meta: {...}}`. Pages that
    /// are already nested are returned unchanged.
    pub fn into_nested(self) -> Self {
        if self.pagination.contains_key("meta") {
            return self;
        }

        let mut meta = self.pagination;
        let mut links = Record::new();
        for (link, field) in NESTED_LINKS {
            if let Some(url) = meta.remove(field) {
                links.insert(link.to_string(), url);
            }
        }

        let mut pagination = Record::new();
        pagination.insert("links".into(), Value::Object(links));
        pagination.insert("meta".into(), Value::Object(meta));

        Self {
            data: self.data,
            pagination,
        }
    }
}

/// Normalized pagination metadata sent alongside the records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatorMeta {
    pub links: Value,
    pub meta: Value,
}

impl PaginatorMeta {
    /// Normalize either pagination shape into `{links, meta}`
    ///
    /// A nested page passes through unchanged. A flat page keeps its `links`
    /// (or `{}`) and gathers the known pagination fields into `meta`,
    /// leaving out absent and null ones.
    pub fn normalize(pagination: &Record) -> Self {
        let links = pagination
            .get("links")
            .cloned()
            .unwrap_or_else(|| Value::Object(Record::new()));

        if let Some(meta) = pagination.get("meta") {
            return Self {
                links,
                meta: meta.clone(),
            };
        }

        let meta = META_FIELDS
            .iter()
            .filter_map(|field| {
                pagination
                    .get(*field)
                    .filter(|value| !value.is_null())
                    .map(|value| (field.to_string(), value.clone()))
            })
            .collect::<Record>();

        Self {
            links,
            meta: Value::Object(meta),
        }
    }
}

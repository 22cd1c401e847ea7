//! Pagination strategies, raw pages and metadata normalization

pub mod cursor;
pub mod meta;
pub mod page;

pub use cursor::Cursor;
pub use meta::{PaginatedRecords, PaginatorMeta};
pub use page::{PageState, RawPage};

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pagination strategy used by a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaginatorKind {
    /// Page numbers with a total count and a last page
    #[default]
    LengthAware,

    /// Page numbers without a total count
    Simple,

    /// Opaque cursors, no random page access
    Cursor,
}

impl PaginatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaginatorKind::LengthAware => "length_aware",
            PaginatorKind::Simple => "simple",
            PaginatorKind::Cursor => "cursor",
        }
    }

    /// Base name of the request parameter carrying the position
    pub fn parameter(&self) -> &'static str {
        match self {
            PaginatorKind::LengthAware | PaginatorKind::Simple => "page",
            PaginatorKind::Cursor => "cursor",
        }
    }
}

impl fmt::Display for PaginatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaginatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "length_aware" | "offset" => Ok(PaginatorKind::LengthAware),
            "simple" => Ok(PaginatorKind::Simple),
            "cursor" => Ok(PaginatorKind::Cursor),
            other => Err(ConfigError::InvalidPaginator {
                kind: other.to_string(),
            }),
        }
    }
}

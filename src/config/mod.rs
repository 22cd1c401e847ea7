//! Configuration loading and per-table options

use crate::core::error::ConfigError;
use crate::pagination::PaginatorKind;
use serde::{Deserialize, Serialize};

/// Application-wide configuration
///
/// ```yaml
/// tables:
///   enable_actions: true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HybridConfig {
    #[serde(default)]
    pub tables: TablesConfig,
}

/// Settings shared by every table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablesConfig {
    /// Whether row actions are available
    ///
    /// When enabled, records whose key is hidden or transformed still carry
    /// their real key under `__hybridId` so actions can find them again.
    #[serde(default = "default_true")]
    pub enable_actions: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            enable_actions: true,
        }
    }
}

impl HybridConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }
}

/// Options of a single table
///
/// The paginator type is kept as written in configuration and only resolved
/// when the table paginates, so a misconfigured kind fails the request that
/// uses it rather than application start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// `length_aware`, `simple` or `cursor`
    #[serde(default = "default_paginator")]
    pub paginator: String,

    #[serde(default = "default_per_page")]
    pub records_per_page: usize,

    /// Namespace for query parameters when several tables share a page
    #[serde(default)]
    pub scope: String,

    #[serde(default = "default_true")]
    pub resolves_authorizations: bool,
}

fn default_paginator() -> String {
    PaginatorKind::default().to_string()
}

fn default_per_page() -> usize {
    10
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            paginator: default_paginator(),
            records_per_page: default_per_page(),
            scope: String::new(),
            resolves_authorizations: true,
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the pagination strategy
    pub fn paginate_with(mut self, kind: PaginatorKind) -> Self {
        self.paginator = kind.to_string();
        self
    }

    pub fn per_page(mut self, records_per_page: usize) -> Self {
        self.records_per_page = records_per_page;
        self
    }

    pub fn scoped(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Skip resolving the `authorization` field of shaped records
    pub fn without_authorizations(mut self) -> Self {
        self.resolves_authorizations = false;
        self
    }

    /// Resolve the configured paginator kind
    pub fn paginator_kind(&self) -> Result<PaginatorKind, ConfigError> {
        self.paginator.parse()
    }

    /// Records per page, rejecting zero
    pub fn records_per_page(&self) -> Result<usize, ConfigError> {
        if self.records_per_page == 0 {
            return Err(ConfigError::InvalidPerPage {
                value: self.records_per_page,
            });
        }
        Ok(self.records_per_page)
    }
}

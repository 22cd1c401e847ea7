//! Opaque cursor tokens for cursor pagination

use crate::core::error::QueryError;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Position in a result set, encoded into an opaque token for clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Offset of the first item of the page this cursor points to
    pub offset: usize,

    /// Whether the cursor moves forward or backward
    #[serde(rename = "_pointsToNextItems")]
    pub points_to_next_items: bool,
}

impl Cursor {
    pub fn next(offset: usize) -> Self {
        Self {
            offset,
            points_to_next_items: true,
        }
    }

    pub fn previous(offset: usize) -> Self {
        Self {
            offset,
            points_to_next_items: false,
        }
    }

    /// Encode as URL-safe base64 JSON
    pub fn encode(&self) -> String {
        // A struct of two plain fields always serializes.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a token received from a client
    pub fn decode(name: &str, token: &str) -> Result<Self, QueryError> {
        let invalid = |message: String| QueryError::InvalidParameter {
            name: name.to_string(),
            message,
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim_end_matches('='))
            .map_err(|e| invalid(format!("cursor is not valid base64: {}", e)))?;

        serde_json::from_slice(&bytes).map_err(|e| invalid(format!("malformed cursor: {}", e)))
    }
}

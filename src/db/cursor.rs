//! Opaque pagination cursor for the book listing
//!
//! A cursor wraps the `created_at` of the last row returned, base64-encoded so
//! callers treat it as an opaque resume point. No version tag and no id
//! tiebreaker: two rows sharing the exact same creation instant can be skipped
//! or duplicated at a page boundary. Stored timestamps carry microsecond
//! precision, which keeps that window small.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::sqlite_helpers::datetime_to_str;

/// Failure to decode a client-supplied cursor. Always client-caused.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("cursor is not valid base64")]
    NotBase64,
    #[error("cursor does not decode to text")]
    NotUtf8,
    #[error("cursor does not contain a timestamp: {0}")]
    NotTimestamp(String),
}

/// Resume point for cursor pagination: the creation time of the last row
/// returned on the previous page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
}

impl Cursor {
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self { created_at }
    }

    /// Encode as an opaque token (base64 of the RFC3339 timestamp).
    pub fn encode(&self) -> String {
        BASE64.encode(datetime_to_str(self.created_at))
    }

    /// Decode an opaque token back to a timestamp.
    pub fn decode(cursor: &str) -> Result<Self, CursorError> {
        let bytes = BASE64.decode(cursor).map_err(|_| CursorError::NotBase64)?;
        let text = String::from_utf8(bytes).map_err(|_| CursorError::NotUtf8)?;
        let created_at = DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| CursorError::NotTimestamp(text))?;
        Ok(Self { created_at })
    }
}

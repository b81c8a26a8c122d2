//! SQLite helper utilities for type conversion
//!
//! SQLite has no native UUID or timestamp types, so this module defines the
//! TEXT representations used throughout the catalog tables.

use anyhow::{Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

// ============================================================================
// UUID Helpers
// ============================================================================

/// Convert a UUID to a SQLite-compatible string
#[inline]
pub fn uuid_to_str(id: Uuid) -> String {
    id.to_string()
}

/// Parse a SQLite string back to a UUID
#[inline]
pub fn str_to_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| anyhow!("Invalid UUID '{}': {}", s, e))
}

// ============================================================================
// Timestamp Helpers (stored as RFC3339 TEXT in SQLite)
// ============================================================================

/// Convert a chrono DateTime to the stored TEXT form.
///
/// Fixed-width: always UTC with a microsecond fraction and a "+00:00" offset,
/// so lexicographic comparison of stored values equals chronological order.
/// The cursor seek (`created_at < ?`) relies on this.
#[inline]
pub fn datetime_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Current UTC timestamp, truncated to the stored precision.
///
/// Truncation matters: a record's in-memory timestamp must round-trip exactly
/// through the TEXT column, since cursors are compared against stored values.
#[inline]
pub fn now_utc() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
}

/// Parse a stored TEXT timestamp back to DateTime
#[inline]
pub fn str_to_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("Invalid datetime '{}': {}", s, e))
}

//! Text encoding of spot timestamps.
//!
//! `date_added` is stored as ISO-8601 local date-time text. Reading it
//! back can fail for rows written by other tools, so the decoder takes an
//! explicit [`TimestampPolicy`] instead of guessing.

use crate::error::StorageError;
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Storage format for `date_added`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Human-facing format used in spot details.
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";

/// What to do when a stored timestamp cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Fail the read with [`StorageError::InvalidTimestamp`].
    Strict,
    /// Use the current local time, flag the spot and log a warning.
    #[default]
    SubstituteNow,
}

/// Current local time truncated to whole seconds.
#[must_use]
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Formats a timestamp for storage.
#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Formats a timestamp for display.
#[must_use]
pub fn display_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(DISPLAY_FORMAT).to_string()
}

/// Parses a stored timestamp.
///
/// Accepts the storage format and, for rows written with minute
/// precision, `%Y-%m-%dT%H:%M`.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Decodes a `date_added` column under `policy`.
///
/// Returns the timestamp and whether it was substituted.
pub fn decode_timestamp(
    policy: TimestampPolicy,
    spot_id: i64,
    raw: Option<&str>,
) -> Result<(NaiveDateTime, bool), StorageError> {
    if let Some(ts) = raw.and_then(parse_timestamp) {
        return Ok((ts, false));
    }

    let raw = raw.unwrap_or_default().to_string();
    match policy {
        TimestampPolicy::Strict => Err(StorageError::InvalidTimestamp { spot_id, raw }),
        TimestampPolicy::SubstituteNow => {
            tracing::warn!(spot_id, raw = %raw, "unreadable date_added, substituting current time");
            Ok((now(), true))
        }
    }
}

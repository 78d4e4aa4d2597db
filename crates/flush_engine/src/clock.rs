//! Wire timestamps.
//!
//! Items carry their creation time as an RFC 3339 string with an uppercase
//! `T` separator and fractional seconds, e.g. `2024-05-01T12:00:00.123Z`.

use chrono::{DateTime, SecondsFormat, Utc};
use contracts::ContractError;

const TIME_SEPARATOR_INDEX: usize = 10;
const FRACTION_INDEX: usize = 19;

/// Parse a wire timestamp into a UTC instant.
///
/// Second-precision strings, lowercase separators and anything chrono rejects
/// produce [`ContractError::MalformedTimestamp`].
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ContractError> {
    if raw.as_bytes().get(TIME_SEPARATOR_INDEX) != Some(&b'T') {
        return Err(ContractError::malformed_timestamp(
            raw,
            "expected 'T' between date and time",
        ));
    }

    if !has_fraction(raw) {
        return Err(ContractError::malformed_timestamp(
            raw,
            "missing fractional seconds",
        ));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ContractError::malformed_timestamp(raw, e.to_string()))
}

/// Render an instant in wire format (milliseconds, `Z` suffix).
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn has_fraction(raw: &str) -> bool {
    raw.get(FRACTION_INDEX..).is_some_and(|rest| {
        let mut chars = rest.chars();
        chars.next() == Some('.') && chars.next().is_some_and(|c| c.is_ascii_digit())
    })
}

//! xs:dateTime parsing and formatting.
//!
//! Decode accepts fractional seconds and explicit offsets and normalizes to
//! UTC; encode always emits `YYYY-MM-DDThh:mm:ssZ` at seconds precision. The
//! two sides are round-trip exact for whole-second UTC inputs, which is what
//! every `IssueInstant`/`NotOnOrAfter` attribute this library emits relies on.

use chrono::{DateTime, Utc};

use crate::error::{SamlError, SamlResult};

/// Parse an XML-Schema dateTime into epoch seconds.
pub fn parse_xs_date_time(value: &str) -> SamlResult<i64> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map_err(|e| SamlError::malformed(format!("invalid xs:dateTime {value:?}: {e}")))?;
    Ok(parsed.with_timezone(&Utc).timestamp())
}

/// Format epoch seconds as an XML-Schema dateTime in UTC.
pub fn format_xs_date_time(timestamp: i64) -> SamlResult<String> {
    let instant = DateTime::<Utc>::from_timestamp(timestamp, 0)
        .ok_or_else(|| SamlError::malformed(format!("timestamp {timestamp} out of range")))?;
    Ok(instant.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_utc_seconds() {
        let ts = parse_xs_date_time("2004-01-21T19:00:49Z").unwrap();
        assert_eq!(format_xs_date_time(ts).unwrap(), "2004-01-21T19:00:49Z");
    }

    #[test]
    fn accepts_fractional_seconds() {
        let plain = parse_xs_date_time("2004-01-21T19:00:49Z").unwrap();
        let fractional = parse_xs_date_time("2004-01-21T19:00:49.387Z").unwrap();
        assert_eq!(plain, fractional);
    }

    #[test]
    fn normalizes_offsets_to_utc() {
        let ts = parse_xs_date_time("2004-01-21T20:00:49+01:00").unwrap();
        assert_eq!(format_xs_date_time(ts).unwrap(), "2004-01-21T19:00:49Z");
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_xs_date_time("yesterday").unwrap_err();
        assert!(matches!(err, SamlError::MalformedValue(_)));
    }
}

//! Timestamp fields as the data service writes them.
//!
//! Accepted shapes: RFC 3339 with an offset, a date-time without an offset
//! (read as UTC, `T` or space separated, optional fractional seconds) and a
//! bare date (midnight UTC). On optional fields `null`, an empty string and
//! a missing key all read as `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, de::Error as _};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a service timestamp. Returns `None` for blank or unrecognized text.
pub(crate) fn parse(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` for a required timestamp.
pub(crate) fn required<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse(&text).ok_or_else(|| D::Error::custom(format!("invalid timestamp {:?}", text)))
}

/// `deserialize_with` for an optional timestamp. Blank reads as `None`.
pub(crate) fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => parse(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp {:?}", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
    }

    #[test_case("2024-03-01T08:30:00Z", at(8, 30) ; "utc designator")]
    #[test_case("2024-03-01T09:30:00+01:00", at(8, 30) ; "offset")]
    #[test_case("2024-03-01T08:30:00", at(8, 30) ; "no offset")]
    #[test_case("2024-03-01 08:30:00.250", at(8, 30) + chrono::Duration::milliseconds(250) ; "space and fraction")]
    #[test_case("2024-03-01", at(0, 0) ; "date only")]
    fn test_parse_shapes(text: &str, expected: DateTime<Utc>) {
        assert_eq!(parse(text), Some(expected));
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("yesterday" ; "prose")]
    fn test_parse_rejects(text: &str) {
        assert_eq!(parse(text), None);
    }
}

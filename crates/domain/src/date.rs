use chrono::prelude::*;
use thiserror::Error;

/// The appointment time of an order could not be turned into an absolute
/// instant, either because it is malformed or because it lacks an explicit
/// UTC offset.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid schedule input: `{0}` is not an RFC 3339 timestamp with an explicit offset")]
pub struct InvalidScheduleInput(pub String);

/// Parses an RFC 3339 timestamp into an absolute instant.
///
/// Strings without an offset (naive local times) are rejected because they do
/// not identify a single instant.
pub fn parse_instant(datestr: &str) -> Result<DateTime<Utc>, InvalidScheduleInput> {
    DateTime::parse_from_rfc3339(datestr.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| InvalidScheduleInput(datestr.to_string()))
}

/// Formats an instant as UTC RFC 3339 with fixed millisecond precision,
/// e.g. `2025-04-01T01:35:00.000Z`.
///
/// Every instant that is persisted or sent over the wire uses this format, so
/// comparing two formatted instants as strings gives the same order as
/// comparing the instants themselves.
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for `DateTime<Utc>` fields using `format_instant`
pub mod instant_format {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_instant(instant))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let datestr = String::deserialize(deserializer)?;
        parse_instant(&datestr).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S>(instant: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match instant {
                Some(instant) => serializer.serialize_some(&format_instant(instant)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(datestr) => parse_instant(&datestr)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_accepts_timestamps_with_offsets() {
        let valid = vec![
            "2025-03-31T10:00:00+05:30",
            "2025-04-01T01:35:00Z",
            "2025-04-01T01:35:00.123Z",
            "2025-04-01T01:35:00-08:00",
        ];

        for datestr in &valid {
            assert!(parse_instant(datestr).is_ok(), "{}", datestr);
        }
    }

    #[test]
    fn it_rejects_naive_and_malformed_timestamps() {
        let invalid = vec![
            "2025-03-31T10:00:00",
            "2025-03-31",
            "31/03/2025 10:00",
            "",
            "2025-02-30T10:00:00Z",
        ];

        for datestr in &invalid {
            assert_eq!(
                parse_instant(datestr),
                Err(InvalidScheduleInput(datestr.to_string()))
            );
        }
    }

    #[test]
    fn offsets_resolve_to_the_same_instant() {
        let a = parse_instant("2025-03-31T10:00:00+05:30").unwrap();
        let b = parse_instant("2025-03-31T04:30:00Z").unwrap();
        assert_eq!(a, b);
        assert_eq!(format_instant(&a), "2025-03-31T04:30:00.000Z");
    }

    #[test]
    fn formatted_instants_sort_like_instants() {
        let mut instants = vec![
            parse_instant("2025-04-01T01:35:00.5Z").unwrap(),
            parse_instant("2025-04-01T01:35:00Z").unwrap(),
            parse_instant("2025-03-31T23:59:59.999-02:00").unwrap(),
            parse_instant("2024-12-31T23:00:00+01:00").unwrap(),
            parse_instant("2025-04-01T07:00:00+05:30").unwrap(),
        ];
        let mut formatted = instants.iter().map(format_instant).collect::<Vec<_>>();
        instants.sort();
        formatted.sort();
        assert_eq!(
            instants.iter().map(format_instant).collect::<Vec<_>>(),
            formatted
        );
    }
}

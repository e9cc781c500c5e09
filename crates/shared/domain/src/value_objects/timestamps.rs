use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{DomainError, DomainResult};

use super::ValueObject;

/// Declares an instant value object over `DateTime<Utc>`.
macro_rules! timestamp_value_object {
    ($(#[$meta:meta])* $t:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $t(DateTime<Utc>);

        impl $t {
            pub fn new(value: DateTime<Utc>) -> Self {
                Self(value)
            }

            pub fn now() -> Self {
                Self(Utc::now())
            }

            /// Parse an RFC 3339 instant.
            ///
            /// # Errors
            /// `InvalidTimestamp` when the text is not a valid instant.
            pub fn parse(value: &str) -> DomainResult<Self> {
                DateTime::parse_from_rfc3339(value.trim())
                    .map(|parsed| Self(parsed.with_timezone(&Utc)))
                    .map_err(|e| {
                        DomainError::InvalidTimestamp(format!("'{}': {}", value, e))
                    })
            }

            pub fn value(&self) -> DateTime<Utc> {
                self.0
            }
        }

        impl From<DateTime<Utc>> for $t {
            fn from(value: DateTime<Utc>) -> Self {
                Self(value)
            }
        }

        impl ValueObject for $t {
            type Primitive = DateTime<Utc>;

            fn to_primitive(&self) -> DateTime<Utc> {
                self.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    };
}

timestamp_value_object!(
    /// Instant an entry was created. Never changes afterwards.
    CreatedAt
);

timestamp_value_object!(
    /// Instant of the last successful mutation.
    UpdatedAt
);

impl UpdatedAt {
    /// Current instant, clamped so it never moves backwards from `previous`.
    pub fn refreshed_from(previous: &UpdatedAt) -> Self {
        Self(Utc::now().max(previous.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_timestamp_parse() {
        let created = CreatedAt::parse("2024-03-01T10:15:30Z").unwrap();
        assert_eq!(created.to_string(), "2024-03-01T10:15:30.000Z");
    }

    #[test]
    fn test_timestamp_parse_with_offset_normalizes_to_utc() {
        let updated = UpdatedAt::parse("2024-03-01T12:15:30+02:00").unwrap();
        assert_eq!(updated, UpdatedAt::parse("2024-03-01T10:15:30Z").unwrap());
    }

    #[test]
    fn test_timestamp_unparseable_rejected() {
        assert!(matches!(
            CreatedAt::parse("yesterday"),
            Err(DomainError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            UpdatedAt::parse(""),
            Err(DomainError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_refreshed_never_goes_backwards() {
        let future = UpdatedAt::new(Utc::now() + Duration::hours(1));
        let refreshed = UpdatedAt::refreshed_from(&future);
        assert_eq!(refreshed, future);

        let past = UpdatedAt::new(Utc::now() - Duration::hours(1));
        assert!(UpdatedAt::refreshed_from(&past) > past);
    }
}

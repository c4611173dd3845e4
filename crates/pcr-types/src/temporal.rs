use chrono::{DateTime, Utc};

/// Wall-clock timestamp stored on records.
///
/// Serialized as RFC 3339 with nanosecond precision.
pub type Timestamp = DateTime<Utc>;

/// Convert nanoseconds since the UNIX epoch into a [`Timestamp`].
pub fn nanos_to_timestamp(nanos: i64) -> Timestamp {
    DateTime::from_timestamp_nanos(nanos)
}

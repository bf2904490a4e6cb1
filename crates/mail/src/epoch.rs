use chrono::NaiveDate;

use crate::error::MailError;

/// Server timestamps are seconds since 1904-01-01; unix timestamps are
/// seconds since 1970-01-01. `unix = server + EPOCH_OFFSET`.
pub const EPOCH_OFFSET: i64 = -2_082_826_800;

/// Sentinel the wire protocol uses for "never expires" in the 32-bit
/// `EXPR` argument: `2 * i32::MAX + 1`.
pub const NEVER_SENTINEL: u32 = u32::MAX;

pub fn server_to_unix(server_ts: i64) -> i64 {
    server_ts + EPOCH_OFFSET
}

pub fn unix_to_server(unix_ts: i64) -> i64 {
    unix_ts - EPOCH_OFFSET
}

/// The three forms `set_expiration` accepts on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expiration {
    Never,
    UnixTimestamp(i64),
}

impl Expiration {
    /// Parses `"never"`, a bare integer unix timestamp, or a
    /// `MM/DD/YYYY[ HH:MM:SS]` date string.
    pub fn parse(input: &str) -> Result<Self, MailError> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("never") {
            return Ok(Expiration::Never);
        }
        if let Ok(ts) = input.parse::<i64>() {
            return Ok(Expiration::UnixTimestamp(ts));
        }
        let (date_part, time_part) = match input.split_once(' ') {
            Some((d, t)) => (d, Some(t)),
            None => (input, None),
        };
        let mut fields = date_part.split('/');
        let (month, day, year) = match (fields.next(), fields.next(), fields.next()) {
            (Some(m), Some(d), Some(y)) => (m, d, y),
            _ => return Err(MailError::InvalidExpiration(input.to_string())),
        };
        let (month, day, year) = (
            month
                .parse::<u32>()
                .map_err(|_| MailError::InvalidExpiration(input.to_string()))?,
            day.parse::<u32>()
                .map_err(|_| MailError::InvalidExpiration(input.to_string()))?,
            year.parse::<i32>()
                .map_err(|_| MailError::InvalidExpiration(input.to_string()))?,
        );
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| MailError::InvalidExpiration(input.to_string()))?;
        let (hour, minute, second) = match time_part {
            Some(t) => {
                let mut tf = t.split(':');
                match (tf.next(), tf.next(), tf.next()) {
                    (Some(h), Some(m), s) => (
                        h.parse::<u32>()
                            .map_err(|_| MailError::InvalidExpiration(input.to_string()))?,
                        m.parse::<u32>()
                            .map_err(|_| MailError::InvalidExpiration(input.to_string()))?,
                        s.unwrap_or("0")
                            .parse::<u32>()
                            .map_err(|_| MailError::InvalidExpiration(input.to_string()))?,
                    ),
                    _ => return Err(MailError::InvalidExpiration(input.to_string())),
                }
            }
            None => (0, 0, 0),
        };
        let time = chrono::NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| MailError::InvalidExpiration(input.to_string()))?;
        let naive = date.and_time(time);
        Ok(Expiration::UnixTimestamp(naive.and_utc().timestamp()))
    }

    pub fn to_server_value(&self) -> u32 {
        match self {
            Expiration::Never => NEVER_SENTINEL,
            Expiration::UnixTimestamp(unix_ts) => unix_to_server(*unix_ts) as u32,
        }
    }

    pub fn from_server_value(value: u32) -> Self {
        if value == NEVER_SENTINEL {
            Expiration::Never
        } else {
            Expiration::UnixTimestamp(server_to_unix(value as i64))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_server_to_unix_per_scenario_3() {
        assert_eq!(server_to_unix(4_009_644_800), 1_926_818_000);
    }

    #[test]
    fn round_trips_unix_through_server() {
        let unix = 1_926_818_000;
        assert_eq!(server_to_unix(unix_to_server(unix)), unix);
    }

    #[test]
    fn never_sentinel_is_u32_max() {
        assert_eq!(Expiration::Never.to_server_value(), 4_294_967_295);
    }

    #[test]
    fn parses_never_case_insensitively() {
        assert_eq!(Expiration::parse("Never").unwrap(), Expiration::Never);
    }

    #[test]
    fn parses_bare_unix_timestamp() {
        assert_eq!(
            Expiration::parse("1926818000").unwrap(),
            Expiration::UnixTimestamp(1_926_818_000)
        );
    }

    #[test]
    fn parses_date_string_without_time() {
        let parsed = Expiration::parse("03/14/2025").unwrap();
        assert!(matches!(parsed, Expiration::UnixTimestamp(_)));
    }

    #[test]
    fn round_trips_set_expiration_never() {
        let expr = Expiration::parse("never").unwrap();
        let wire_value = expr.to_server_value();
        assert_eq!(Expiration::from_server_value(wire_value), Expiration::Never);
    }
}

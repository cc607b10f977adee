use std::convert::TryFrom;

use crate::bytes::parse_bytes;
use crate::DecodeError;

#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum TimeZone {
    Utc,
    /// Local time at the sending station; the frame does not say which
    /// zone that is.
    LocalToSender,
}

/// A partial timestamp as carried on the air. The missing calendar fields
/// (year, and month/day where absent) are deliberately not filled in.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Timestamp {
    DayHourMinute {
        day: u8,
        hour: u8,
        minute: u8,
        zone: TimeZone,
    },
    HourMinuteSecond {
        hour: u8,
        minute: u8,
        second: u8,
    },
    /// Positionless weather reports carry month/day/hour/minute.
    MonthDayHourMinute {
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
    },
}

impl TryFrom<&[u8]> for Timestamp {
    type Error = DecodeError;

    fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
        if b.len() != 7 {
            return Err(DecodeError::InvalidTimestamp(b.to_owned()));
        }

        let one = parse_bytes(&b[0..2]).ok_or_else(|| DecodeError::InvalidTimestamp(b.to_owned()))?;
        let two = parse_bytes(&b[2..4]).ok_or_else(|| DecodeError::InvalidTimestamp(b.to_owned()))?;
        let three =
            parse_bytes(&b[4..6]).ok_or_else(|| DecodeError::InvalidTimestamp(b.to_owned()))?;

        // Only '/' and 'h' select a format of their own. Real feeds carry
        // 'z', 'Z', 'a' and even spaces in the indicator slot; all of them
        // are read as a zulu DHM timestamp.
        Ok(match b[6] {
            b'/' => Timestamp::DayHourMinute {
                day: one,
                hour: two,
                minute: three,
                zone: TimeZone::LocalToSender,
            },
            b'h' => Timestamp::HourMinuteSecond {
                hour: one,
                minute: two,
                second: three,
            },
            _ => Timestamp::DayHourMinute {
                day: one,
                hour: two,
                minute: three,
                zone: TimeZone::Utc,
            },
        })
    }
}

impl Timestamp {
    /// Eight digits of `MMDDHHMM`, used by positionless weather reports.
    pub(crate) fn parse_mdhm(b: &[u8]) -> Result<Self, DecodeError> {
        if b.len() != 8 || !b.iter().all(u8::is_ascii_digit) {
            return Err(DecodeError::InvalidTimestamp(b.to_owned()));
        }

        Ok(Timestamp::MonthDayHourMinute {
            month: parse_bytes(&b[0..2]).unwrap(),
            day: parse_bytes(&b[2..4]).unwrap(),
            hour: parse_bytes(&b[4..6]).unwrap(),
            minute: parse_bytes(&b[6..8]).unwrap(),
        })
    }
}

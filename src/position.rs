use std::convert::TryFrom;

use crate::lonlat::{Latitude, Longitude, Precision};
use crate::packet::AprsPacket;
use crate::units;
use crate::DecodeError;
use crate::Symbol;
use crate::Timestamp;

/// Where a station is. All distances are meters.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct AprsPosition {
    pub latitude: Option<Latitude>,
    pub longitude: Option<Longitude>,
    pub precision: Precision,
    /// Altitude above sea level, from a compressed cs field, a Mic-E
    /// altitude group or a `/A=` comment.
    pub altitude: Option<f64>,
    /// Maidenhead locator, from grid-bearing status reports.
    pub maidenhead: Option<String>,
    /// Pre-calculated radio range from a compressed `{`-type cs field.
    pub range: Option<f64>,
}

/// Decodes a position body (after any data type identifier and timestamp),
/// dispatching on the compressed/uncompressed layout, and processes
/// everything that may follow it: data extensions, weather and the comment.
pub(crate) fn parse_position(
    packet: &mut AprsPacket,
    b: &[u8],
    with_timestamp: bool,
) -> Result<(), DecodeError> {
    let b = if with_timestamp {
        if b.len() < 7 {
            return Err(DecodeError::InvalidTimestamp(b.to_owned()));
        }
        packet.timestamp = Some(Timestamp::try_from(&b[0..7])?);
        &b[7..]
    } else {
        b
    };

    let rem = parse_coordinates(packet, b)?;
    parse_trailing(packet, rem)
}

/// Everything after a decoded position: data extensions, weather
/// parameters when the symbol asks for them, and the comment.
pub(crate) fn parse_trailing(packet: &mut AprsPacket, rem: &[u8]) -> Result<(), DecodeError> {
    let rem = crate::extension::parse(packet, rem)?;

    let is_weather = packet
        .symbol
        .map(|s| s.is_weather_station())
        .unwrap_or(false);

    if is_weather {
        crate::weather::parse_after_position(packet, rem)
    } else {
        crate::comment::process(packet, rem)
    }
}

fn parse_coordinates<'a>(
    packet: &mut AprsPacket,
    b: &'a [u8],
) -> Result<&'a [u8], DecodeError> {
    let is_uncompressed = b.first().map(u8::is_ascii_digit).unwrap_or(false);

    if is_uncompressed {
        if b.len() < 19 {
            return Err(DecodeError::InvalidPosition(b.to_owned()));
        }

        let (latitude, precision) = Latitude::parse_uncompressed(&b[0..8])?;
        let longitude = Longitude::parse_uncompressed(&b[9..18], precision)?;

        packet.symbol = Some(Symbol::try_from((b[8], b[18]))?);

        let position = packet.position_mut();
        position.latitude = Some(latitude);
        position.longitude = Some(longitude);
        position.precision = precision;

        Ok(&b[19..])
    } else {
        if b.len() < 13 {
            return Err(DecodeError::InvalidPosition(b.to_owned()));
        }

        let latitude = Latitude::parse_compressed(&b[1..5])?;
        let longitude = Longitude::parse_compressed(&b[5..9])?;

        packet.symbol = Some(Symbol::try_from((b[0], b[9]))?);

        let position = packet.position_mut();
        position.latitude = Some(latitude);
        position.longitude = Some(longitude);
        position.precision = Precision::HundredthMinute;

        parse_compressed_cs(packet, b[10], b[11], b[12])?;

        Ok(&b[13..])
    }
}

/// The cs pair of a compressed position. The compression type byte decides
/// whether it carries an altitude; otherwise the first byte selects
/// course/speed, radio range, or nothing.
fn parse_compressed_cs(packet: &mut AprsPacket, c: u8, s: u8, t: u8) -> Result<(), DecodeError> {
    // A space in c means the cs pair holds no data.
    if c == b' ' {
        return Ok(());
    }

    let t_val = t
        .checked_sub(33)
        .ok_or_else(|| DecodeError::InvalidPosition(vec![c, s, t]))?;
    let s_val = || {
        s.checked_sub(33)
            .ok_or_else(|| DecodeError::InvalidPosition(vec![c, s, t]))
    };

    // NMEA-source bits 10 mean the fix came from a GGA sentence and cs is
    // the altitude instead of course/speed.
    if (t_val >> 3) & 0b11 == 0b10 {
        let cs = i32::from(c - 33) * 91 + i32::from(s_val()?);
        packet.position_mut().altitude = Some(1.002_f64.powi(cs) * units::METERS_PER_FOOT);
    } else if (33..=122).contains(&c) {
        let speed = (1.08_f64.powi(i32::from(s_val()?)) - 1.0) * units::MPS_PER_KNOT;
        let course = packet.course_mut();
        course.direction = Some(u16::from(c - 33) * 4);
        course.speed = Some(speed);
    } else if c == b'{' {
        packet.position_mut().range =
            Some(2.0 * 1.08_f64.powi(i32::from(s_val()?)) * units::METERS_PER_MILE);
    }
    // anything else in c is ignored

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn parse_uncompressed_without_timestamp() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W-").unwrap();
        let position = packet.position.unwrap();
        assert_relative_eq!(*position.latitude.unwrap(), 49.05833333333333);
        assert_relative_eq!(*position.longitude.unwrap(), -72.02916666666667);
        assert_eq!(position.precision, Precision::HundredthMinute);
        assert_eq!(packet.symbol.unwrap().table, '/');
        assert_eq!(packet.symbol.unwrap().code, '-');
        assert_eq!(packet.comment, None);
        assert_eq!(packet.timestamp, None);
    }

    #[test]
    fn parse_uncompressed_with_timestamp() {
        let packet = parse(b"FROMCALL>TOCALL:/092345z4903.50N/07201.75W>").unwrap();
        assert_eq!(
            packet.timestamp,
            Some(Timestamp::DayHourMinute {
                day: 9,
                hour: 23,
                minute: 45,
                zone: crate::TimeZone::Utc
            })
        );
        let position = packet.position.unwrap();
        assert_relative_eq!(*position.latitude.unwrap(), 49.05833333333333);
    }

    #[test]
    fn parse_ambiguous_position() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.5 N/07201.7 W-").unwrap();
        let position = packet.position.unwrap();
        assert_eq!(position.precision, Precision::TenthMinute);
        assert_relative_eq!(*position.latitude.unwrap(), 49.05833333333333);
        assert_relative_eq!(*position.longitude.unwrap(), -72.02833333333334);
    }

    #[test]
    fn parse_compressed_position() {
        let packet = parse(b"N0CALL>APRS:!/5L!!<*e7>7P[").unwrap();
        let position = packet.position.unwrap();
        assert_relative_eq!(*position.latitude.unwrap(), 49.5);
        assert_relative_eq!(*position.longitude.unwrap(), -72.75000393777269);
        assert_eq!(packet.symbol.unwrap().table, '/');
        assert_eq!(packet.symbol.unwrap().code, '>');

        // c = '7', s = 'P', T = '[' selects course/speed
        let course = packet.course.unwrap();
        assert_eq!(course.direction, Some(88));
        assert_relative_eq!(
            course.speed.unwrap(),
            (1.08_f64.powi(47) - 1.0) * 0.514444
        );
    }

    #[test]
    fn parse_compressed_position_without_cs() {
        let packet = parse(b"N0CALL>APRS:!/5L!!<*e7> sT").unwrap();
        assert!(packet.course.is_none());
        assert!(packet.position.unwrap().altitude.is_none());
    }

    #[test]
    fn parse_compressed_radio_range() {
        // c = '{' means the s byte is a pre-calculated radio range
        let packet = parse(b"N0CALL>APRS:!/5L!!<*e7>{>!").unwrap();
        let range = packet.position.unwrap().range.unwrap();
        assert_relative_eq!(range, 2.0 * 1.08_f64.powi(29) * 1609.344);
    }

    #[test]
    fn parse_compressed_altitude() {
        // T = 'S' (0b110010): NMEA source GGA, cs is an altitude
        let packet = parse(b"N0CALL>APRS:!/5L!!<*e7>S]S").unwrap();
        let altitude = packet.position.unwrap().altitude.unwrap();
        assert_relative_eq!(altitude, 1.002_f64.powi(50 * 91 + 60) * 0.3048);
    }

    #[test]
    fn short_position_is_an_error() {
        assert!(parse(b"FROMCALL>TOCALL:!4903.50N/0720").is_err());
        assert!(parse(b"FROMCALL>TOCALL:!/5L!!<*e7").is_err());
    }

    #[test]
    fn bad_direction_byte_is_an_error() {
        assert!(parse(b"FROMCALL>TOCALL:!4903.50Q/07201.75W-").is_err());
        assert!(parse(b"FROMCALL>TOCALL:!4903.50N/07201.75Q-").is_err());
    }
}

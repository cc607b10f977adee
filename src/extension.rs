//! Data extensions: the fixed 7- and 15-byte groups that may directly
//! follow a position and describe course/speed, transmitter power and
//! antenna characteristics, direction finding, or a pre-calculated range.

use crate::bytes::parse_bytes;
use crate::packet::AprsPacket;
use crate::units;
use crate::DecodeError;

/// Movement of the station (or a direction-finding fix on it).
/// Angles in degrees, speeds in m/s, ranges in meters.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct AprsCourse {
    pub direction: Option<u16>,
    pub speed: Option<f64>,
    pub bearing: Option<u16>,
    pub range: Option<f64>,
    pub report_quality: Option<ReportQuality>,
    pub bearing_accuracy: Option<BearingAccuracy>,
}

impl AprsCourse {
    pub(crate) fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Transmitter and antenna data from the PHG, DFS and RNG extensions.
/// Power in watts, height in meters, gain in dB, range in meters.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct AprsAntenna {
    pub power: Option<u16>,
    pub strength: Option<u8>,
    pub height: Option<f64>,
    pub gain: Option<u8>,
    pub directivity: Option<Directivity>,
    pub range: Option<f64>,
}

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Directivity {
    Omni,
    Degrees(u16),
}

/// The N digit of an NRQ group.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum ReportQuality {
    Useless,
    Rated(u8),
    Manual,
}

/// The Q digit of an NRQ group.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum BearingAccuracy {
    Useless,
    LessThanDegrees(u16),
}

/// Tries the 15-byte and then the 7-byte extensions on the bytes following
/// a position. Returns the remainder after anything consumed. Candidates
/// that merely fail to match flow on to the comment; a matched PHG/DFS
/// prefix with bad codes is an error.
pub(crate) fn parse<'a>(packet: &mut AprsPacket, b: &'a [u8]) -> Result<&'a [u8], DecodeError> {
    if let Some(rem) = parse_course_bearing_nrq(packet, b) {
        return Ok(rem);
    }

    if b.len() < 7 {
        return Ok(b);
    }

    if is_course_speed(&b[..7]) {
        let course = packet.course_mut();
        course.direction = parse_bytes(&b[0..3]);
        course.speed =
            parse_bytes::<f64>(&b[4..7]).map(|speed| speed * units::MPS_PER_KNOT);
        return Ok(&b[7..]);
    }

    match &b[..3] {
        b"PHG" => {
            let codes = phgd_codes(&b[3..7]).ok_or_else(|| DecodeError::InvalidPhg(b.to_owned()))?;
            let antenna = packet.antenna_mut();
            antenna.power = Some(u16::from(codes.0).pow(2));
            antenna.height = Some(codes.1);
            antenna.gain = Some(codes.2);
            antenna.directivity = Some(codes.3);
            Ok(&b[7..])
        }
        b"DFS" => {
            let codes = phgd_codes(&b[3..7]).ok_or_else(|| DecodeError::InvalidDfs(b.to_owned()))?;
            let antenna = packet.antenna_mut();
            antenna.strength = Some(codes.0);
            antenna.height = Some(codes.1);
            antenna.gain = Some(codes.2);
            antenna.directivity = Some(codes.3);
            Ok(&b[7..])
        }
        b"RNG" => match parse_bytes::<u32>(&b[3..7]) {
            Some(miles) => {
                packet.antenna_mut().range = Some(f64::from(miles) * units::METERS_PER_MILE);
                Ok(&b[7..])
            }
            None => Ok(b),
        },
        _ => Ok(b),
    }
}

/// `dir/spd/brg/NRQ` from direction-finding reports.
fn parse_course_bearing_nrq<'a>(packet: &mut AprsPacket, b: &'a [u8]) -> Option<&'a [u8]> {
    if b.len() < 15 {
        return None;
    }

    let groups = [&b[0..3], &b[4..7], &b[8..11], &b[12..15]];
    if b[3] != b'/' || b[7] != b'/' || b[11] != b'/' {
        return None;
    }
    if !groups.iter().all(|g| g.iter().all(u8::is_ascii_digit)) {
        return None;
    }

    let course = packet.course_mut();
    course.direction = parse_bytes(groups[0]);
    course.speed = parse_bytes::<f64>(groups[1]).map(|speed| speed * units::MPS_PER_KNOT);
    course.bearing = parse_bytes(groups[2]);

    let n = groups[3][0] - b'0';
    let r = groups[3][1] - b'0';
    let q = groups[3][2] - b'0';

    course.report_quality = Some(match n {
        0 => ReportQuality::Useless,
        9 => ReportQuality::Manual,
        n => ReportQuality::Rated(n),
    });
    course.range = Some(2_f64.powi(i32::from(r)) * units::METERS_PER_MILE);
    course.bearing_accuracy = Some(match q {
        0 => BearingAccuracy::Useless,
        q => BearingAccuracy::LessThanDegrees(2_u16.pow(u32::from(9 - q)) * 2),
    });

    Some(&b[15..])
}

fn is_course_speed(b: &[u8]) -> bool {
    b[3] == b'/'
        && b[0..3].iter().all(u8::is_ascii_digit)
        && b[4..7].iter().all(u8::is_ascii_digit)
}

/// The shared height/gain/directivity scheme of PHG and DFS, plus the
/// leading digit (power or strength). The height code counts in powers of
/// two above (or, below `0`, fractions of) ten feet.
fn phgd_codes(b: &[u8]) -> Option<(u8, f64, u8, Directivity)> {
    let first = char::from(b[0]).to_digit(10)? as u8;

    // beyond the plain digits, '*'..'/' encode heights below ten feet and
    // ':'..'B' the extended tall-antenna codes
    let height_exponent = match b[1] {
        b'*'..=b'B' => i32::from(b[1]) - i32::from(b'0'),
        _ => return None,
    };
    let height = 2_f64.powi(height_exponent) * 10.0 * units::METERS_PER_FOOT;

    let gain = char::from(b[2]).to_digit(10)? as u8;

    let directivity = match b[3] {
        b'0' => Directivity::Omni,
        b'1'..=b'8' => Directivity::Degrees(45 * u16::from(b[3] - b'0')),
        _ => return None,
    };

    Some((first, height, gain, directivity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn course_and_speed() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W>123/456").unwrap();
        let course = packet.course.unwrap();
        assert_eq!(course.direction, Some(123));
        assert_relative_eq!(course.speed.unwrap(), 234.586464);
        assert_eq!(packet.comment, None);
    }

    #[test]
    fn course_speed_with_comment() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W>088/036/Hello").unwrap();
        let course = packet.course.unwrap();
        assert_eq!(course.direction, Some(88));
        assert_eq!(packet.comment.unwrap(), b"/Hello");
    }

    #[test]
    fn bearing_and_nrq() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W\\088/036/270/729").unwrap();
        let course = packet.course.unwrap();
        assert_eq!(course.direction, Some(88));
        assert_relative_eq!(course.speed.unwrap(), 36.0 * 0.514444);
        assert_eq!(course.bearing, Some(270));
        assert_eq!(course.report_quality, Some(ReportQuality::Rated(7)));
        assert_relative_eq!(course.range.unwrap(), 4.0 * 1609.344);
        assert_eq!(
            course.bearing_accuracy,
            Some(BearingAccuracy::LessThanDegrees(2))
        );
    }

    #[test]
    fn nrq_edge_digits() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W\\088/036/270/090").unwrap();
        let course = packet.course.unwrap();
        assert_eq!(course.report_quality, Some(ReportQuality::Useless));
        assert_eq!(course.bearing_accuracy, Some(BearingAccuracy::Useless));

        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W\\088/036/270/901").unwrap();
        let course = packet.course.unwrap();
        assert_eq!(course.report_quality, Some(ReportQuality::Manual));
        assert_eq!(
            course.bearing_accuracy,
            Some(BearingAccuracy::LessThanDegrees(512))
        );
    }

    #[test]
    fn phg() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W#PHG5132").unwrap();
        let antenna = packet.antenna.unwrap();
        assert_eq!(antenna.power, Some(25));
        assert_relative_eq!(antenna.height.unwrap(), 20.0 * 0.3048);
        assert_eq!(antenna.gain, Some(3));
        assert_eq!(antenna.directivity, Some(Directivity::Degrees(90)));
    }

    #[test]
    fn phg_extended_height() {
        // ':' is one step above '9': 10240 feet
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W#PHG5:32").unwrap();
        let antenna = packet.antenna.unwrap();
        assert_relative_eq!(antenna.height.unwrap(), 10240.0 * 0.3048);

        // '*' is below '0': a height under ten feet
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W#PHG5*32").unwrap();
        let antenna = packet.antenna.unwrap();
        assert_relative_eq!(antenna.height.unwrap(), 10.0 / 64.0 * 0.3048);
    }

    #[test]
    fn phg_bad_codes_are_errors() {
        assert!(parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W#PHG5139").is_err());
        assert!(parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W#PHG5x32").is_err());
        assert!(parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W#PHGX132").is_err());
    }

    #[test]
    fn dfs() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W\\DFS2360").unwrap();
        let antenna = packet.antenna.unwrap();
        assert_eq!(antenna.strength, Some(2));
        assert_relative_eq!(antenna.height.unwrap(), 80.0 * 0.3048);
        assert_eq!(antenna.gain, Some(6));
        assert_eq!(antenna.directivity, Some(Directivity::Omni));
        assert_eq!(antenna.power, None);
    }

    #[test]
    fn rng() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W-RNG0050").unwrap();
        let antenna = packet.antenna.unwrap();
        assert_relative_eq!(antenna.range.unwrap(), 50.0 * 1609.344);
    }

    #[test]
    fn rng_with_letters_is_a_comment() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W-RNGefgh").unwrap();
        assert!(packet.antenna.is_none());
        assert_eq!(packet.comment.unwrap(), b"RNGefgh");
    }

    #[test]
    fn unrelated_comment_is_untouched() {
        let packet = parse(b"FROMCALL>TOCALL:!4903.50N/07201.75W-Hello world").unwrap();
        assert!(packet.course.is_none());
        assert!(packet.antenna.is_none());
        assert_eq!(packet.comment.unwrap(), b"Hello world");
    }
}

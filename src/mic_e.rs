//! Mic-E: a compact position/status encoding that hides half of its data
//! in the destination address. Each destination byte carries a latitude
//! digit plus one of the message bits, the N/S and W/E indicators, or the
//! longitude offset.

use lazy_static::lazy_static;

use crate::base91;
use crate::lonlat::{Latitude, Longitude, Precision};
use crate::packet::AprsPacket;
use crate::units;
use crate::DecodeError;
use crate::Symbol;

/// The Mic-E position comment, the standard message codes and their
/// custom counterparts. Mixing standard and custom one-bits yields
/// `Unknown`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MicEMessage {
    M0,
    M1,
    M2,
    M3,
    M4,
    M5,
    M6,
    C0,
    C1,
    C2,
    C3,
    C4,
    C5,
    C6,
    Emergency,
    Unknown,
}

impl MicEMessage {
    fn decode(a: MessageBit, b: MessageBit, c: MessageBit) -> Self {
        use self::MessageBit::{CustomOne, StandardOne, Zero};
        use self::MicEMessage::*;

        match (a, b, c) {
            (StandardOne, StandardOne, StandardOne) => M0,
            (CustomOne, CustomOne, CustomOne) => C0,

            (StandardOne, StandardOne, Zero) => M1,
            (CustomOne, CustomOne, Zero) => C1,

            (StandardOne, Zero, StandardOne) => M2,
            (CustomOne, Zero, CustomOne) => C2,

            (StandardOne, Zero, Zero) => M3,
            (CustomOne, Zero, Zero) => C3,

            (Zero, StandardOne, StandardOne) => M4,
            (Zero, CustomOne, CustomOne) => C4,

            (Zero, StandardOne, Zero) => M5,
            (Zero, CustomOne, Zero) => C5,

            (Zero, Zero, StandardOne) => M6,
            (Zero, Zero, CustomOne) => C6,

            (Zero, Zero, Zero) => Self::Emergency,
            _ => Self::Unknown,
        }
    }

    pub fn status_text(&self) -> &'static str {
        match self {
            Self::M0 => "Off Duty",
            Self::M1 => "En Route",
            Self::M2 => "In Service",
            Self::M3 => "Returning",
            Self::M4 => "Committed",
            Self::M5 => "Special",
            Self::M6 => "Priority",
            Self::C0 => "Custom-0",
            Self::C1 => "Custom-1",
            Self::C2 => "Custom-2",
            Self::C3 => "Custom-3",
            Self::C4 => "Custom-4",
            Self::C5 => "Custom-5",
            Self::C6 => "Custom-6",
            Self::Emergency => "Emergency",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Copy, Clone)]
enum MessageBit {
    Zero,
    CustomOne,
    StandardOne,
}

impl MessageBit {
    fn decode(c: u8) -> Option<Self> {
        match c {
            b'0'..=b'9' | b'L' => Some(MessageBit::Zero),
            b'A'..=b'K' => Some(MessageBit::CustomOne),
            b'P'..=b'Z' => Some(MessageBit::StandardOne),
            _ => None,
        }
    }
}

enum LatDir {
    North,
    South,
}

impl LatDir {
    fn decode(c: u8) -> Option<Self> {
        match c {
            b'0'..=b'9' | b'L' => Some(LatDir::South),
            b'P'..=b'Z' => Some(LatDir::North),
            _ => None,
        }
    }
}

enum LongOffset {
    Zero,
    Hundred,
}

impl LongOffset {
    fn decode(c: u8) -> Option<Self> {
        match c {
            b'0'..=b'9' | b'L' => Some(LongOffset::Zero),
            b'P'..=b'Z' => Some(LongOffset::Hundred),
            _ => None,
        }
    }
}

enum LongDir {
    East,
    West,
}

impl LongDir {
    fn decode(c: u8) -> Option<Self> {
        match c {
            b'0'..=b'9' | b'L' => Some(Self::East),
            b'P'..=b'Z' => Some(Self::West),
            _ => None,
        }
    }
}

// returns the ASCII value, since we can have spaces
fn decode_latitude_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c),
        b'A'..=b'J' => Some(c - 17),
        b'K' | b'L' | b'Z' => Some(b' '),
        b'P'..=b'Y' => Some(c - 32),
        _ => None,
    }
}

lazy_static! {
    // leading family byte, trailing suffix, device name
    static ref DEVICE_SUFFIXES: Vec<(u8, &'static [u8], &'static str)> = vec![
        (b'`', b"_ ", "Yaesu VX-8"),
        (b'`', b"_=", "Yaesu FTM-350"),
        (b'`', b"_#", "Yaesu VX-8G"),
        (b'`', b"_$", "Yaesu FT1D"),
        (b'`', b"_%", "Yaesu FTM-400DR"),
        (b'`', b"_)", "Yaesu FTM-100D"),
        (b'`', b"_(", "Yaesu FT2D"),
        (b'`', b"_0", "Yaesu FT3D"),
        (b'`', b"_3", "Yaesu FT5D"),
        (b'`', b"_1", "Yaesu FTM-300D"),
        (b'`', b" X", "AP510"),
        (b'`', b"(5", "Anytone D578UV"),
        (b'\'', b"(8", "Anytone D878UV"),
        (b'\'', b"|3", "Byonics TinyTrack3"),
        (b'\'', b"|4", "Byonics TinyTrack5"),
        (b'\'', b":4", "P4dragon DR-7400"),
        (b'\'', b":8", "P4dragon DR-7800"),
    ];
}

/// A Mic-E information field (after the data type identifier). The
/// destination address of the packet supplies the latitude, the message
/// bits, the N/S and W/E indicators and the longitude offset.
pub(crate) fn parse(packet: &mut AprsPacket, b: &[u8]) -> Result<(), DecodeError> {
    let destination = decode_destination(packet)?;

    if b.len() < 8 {
        return Err(DecodeError::InvalidMicEInformation(b.to_owned()));
    }

    let longitude = decode_longitude(&b[0..3], destination.offset, destination.west)
        .ok_or_else(|| DecodeError::InvalidMicEInformation(b.to_owned()))?;

    let (speed, direction) = decode_speed_and_direction(&b[3..6])
        .ok_or_else(|| DecodeError::InvalidMicEInformation(b.to_owned()))?;

    packet.symbol = Some(Symbol::try_from((b[7], b[6]))?);
    packet.status = Some(destination.message.status_text().as_bytes().to_vec());

    let position = packet.position_mut();
    position.latitude = Some(destination.latitude);
    position.longitude = Some(longitude);
    position.precision = destination.precision;

    let course = packet.course_mut();
    course.speed = Some(speed * units::MPS_PER_KNOT);
    course.direction = Some(direction);

    let rem = parse_device(packet, &b[8..]);
    let rem = parse_altitude(packet, rem);

    crate::comment::process(packet, rem)
}

struct MicEDestination {
    latitude: Latitude,
    precision: Precision,
    message: MicEMessage,
    offset: u32,
    west: bool,
}

fn decode_destination(packet: &AprsPacket) -> Result<MicEDestination, DecodeError> {
    let call = packet.to.call.clone();
    let data = call.as_bytes();

    if data.len() != 6 {
        return Err(DecodeError::MicEDestinationLength(call));
    }

    let invalid = || DecodeError::InvalidMicEDestination(call.clone());

    let mut digits = [0u8; 6];
    for (digit, byte) in digits.iter_mut().zip(data) {
        *digit = decode_latitude_digit(*byte).ok_or_else(invalid)?;
    }

    // ambiguity spaces may only trail the digits
    let spaces = digits.iter().rev().take_while(|&&d| d == b' ').count();
    if digits[..6 - spaces].contains(&b' ') {
        return Err(invalid());
    }
    let precision = Precision::from_num_spaces(spaces as u8).ok_or_else(invalid)?;

    let value = |d: u8| u32::from(if d == b' ' { 0 } else { d - b'0' });
    let deg = value(digits[0]) * 10 + value(digits[1]);
    let min = value(digits[2]) * 10 + value(digits[3]);
    let hundredths = value(digits[4]) * 10 + value(digits[5]);

    let north = match LatDir::decode(data[3]).ok_or_else(invalid)? {
        LatDir::North => true,
        LatDir::South => false,
    };
    let latitude = Latitude::from_dmh(deg, min, hundredths, north).ok_or_else(invalid)?;

    let a = MessageBit::decode(data[0]).ok_or_else(invalid)?;
    let b = MessageBit::decode(data[1]).ok_or_else(invalid)?;
    let c = MessageBit::decode(data[2]).ok_or_else(invalid)?;
    let message = MicEMessage::decode(a, b, c);

    let offset = match LongOffset::decode(data[4]).ok_or_else(invalid)? {
        LongOffset::Zero => 0,
        LongOffset::Hundred => 100,
    };

    let west = match LongDir::decode(data[5]).ok_or_else(invalid)? {
        LongDir::West => true,
        LongDir::East => false,
    };

    Ok(MicEDestination {
        latitude,
        precision,
        message,
        offset,
        west,
    })
}

fn decode_longitude(b: &[u8], offset: u32, west: bool) -> Option<Longitude> {
    let mut deg = u32::from(b[0].checked_sub(28)?) + offset;
    if (180..=199).contains(&deg) {
        deg -= 100;
    }

    let mut min = u32::from(b[1].checked_sub(28)?);
    if min >= 60 {
        min -= 60;
    }

    let hundredths = u32::from(b[2].checked_sub(28)?);

    Longitude::from_dmh(deg, min, hundredths, !west)
}

/// Speed in knots and direction in degrees from the three shared bytes.
fn decode_speed_and_direction(b: &[u8]) -> Option<(f64, u16)> {
    let mut sp = u32::from(b[0].checked_sub(28)?);
    if sp >= 80 {
        sp -= 80;
    }

    let dc = u32::from(b[1].checked_sub(28)?);
    let mut speed = sp * 10 + dc / 10;
    if speed >= 800 {
        speed -= 800;
    }

    let mut direction = (dc % 10) * 100 + u32::from(b[2].checked_sub(28)?);
    if direction >= 400 {
        direction -= 400;
    }

    Some((f64::from(speed), direction as u16))
}

/// Best-effort device fingerprinting from the leading byte and the
/// trailing suffix of the comment. Both are stripped on a match; an
/// unmatched comment is left alone and the device stays unknown.
fn parse_device<'a>(packet: &mut AprsPacket, rem: &'a [u8]) -> &'a [u8] {
    let Some(&first) = rem.first() else {
        packet.device = Some("Original Mic-E".to_string());
        return rem;
    };

    match first {
        b' ' => {
            packet.device = Some("Original Mic-E".to_string());
            &rem[1..]
        }
        b'>' => {
            let body = &rem[1..];
            let (name, body) = match body.split_last() {
                Some((b'=', middle)) => ("Kenwood TH-D72", middle),
                Some((b'^', middle)) => ("Kenwood TH-D74", middle),
                _ => ("Kenwood TH-D7A", body),
            };
            packet.device = Some(name.to_string());
            body
        }
        b']' => {
            let body = &rem[1..];
            let (name, body) = match body.split_last() {
                Some((b'=', middle)) => ("Kenwood TM-D710", middle),
                _ => ("Kenwood TM-D700", body),
            };
            packet.device = Some(name.to_string());
            body
        }
        b'`' | b'\'' => {
            let body = &rem[1..];
            for (family, suffix, name) in DEVICE_SUFFIXES.iter() {
                if first != *family {
                    continue;
                }
                if let Some(middle) = body.strip_suffix(*suffix) {
                    packet.device = Some((*name).to_string());
                    return middle;
                }
            }
            rem
        }
        _ => rem,
    }
}

/// An optional `xxx}` group at the front of the comment: three base-91
/// digits offset by 10 km.
fn parse_altitude<'a>(packet: &mut AprsPacket, rem: &'a [u8]) -> &'a [u8] {
    if rem.len() >= 4 && rem[3] == b'}' {
        if let Some(value) = base91::decode_ascii(&rem[0..3]) {
            packet.position_mut().altitude = Some(value - 10000.0);
            return &rem[4..];
        }
    }

    rem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn parse_standard_report() {
        let packet = parse(b"N0CALL>T7SYWT:`2U*n\"Oj/Comment text").unwrap();

        let position = packet.position.clone().unwrap();
        assert_relative_eq!(*position.latitude.unwrap(), 47.66233333333333);
        assert_relative_eq!(*position.longitude.unwrap(), -122.95233333333334);
        assert_eq!(position.precision, Precision::HundredthMinute);

        let course = packet.course.unwrap();
        assert_eq!(course.direction, Some(251));
        assert_relative_eq!(course.speed.unwrap(), 20.0 * 0.514444);

        assert_eq!(packet.symbol.unwrap().table, '/');
        assert_eq!(packet.symbol.unwrap().code, 'j');
        assert_eq!(packet.status.unwrap(), b"In Service");
        assert_eq!(packet.comment.unwrap(), b"Comment text");
    }

    #[test]
    fn kenwood_device_and_altitude() {
        let packet = parse(b"N0CALL>T7SYWT:`2U*n\"Oj/]\"4V}=").unwrap();

        assert_eq!(packet.device.unwrap(), "Kenwood TM-D710");
        assert_relative_eq!(packet.position.unwrap().altitude.unwrap(), 63.0);
        assert_eq!(packet.comment, None);
    }

    #[test]
    fn th_d7a_without_suffix() {
        let packet = parse(b"N0CALL>T7SYWT:`2U*n\"Oj/>hello").unwrap();
        assert_eq!(packet.device.unwrap(), "Kenwood TH-D7A");
        assert_eq!(packet.comment.unwrap(), b"hello");
    }

    #[test]
    fn yaesu_two_byte_suffix() {
        let packet = parse(b"N0CALL>T7SYWT:`2U*n\"Oj/`hello_%").unwrap();
        assert_eq!(packet.device.unwrap(), "Yaesu FTM-400DR");
        assert_eq!(packet.comment.unwrap(), b"hello");
    }

    #[test]
    fn unmatched_signature_leaves_device_absent() {
        let packet = parse(b"N0CALL>T7SYWT:`2U*n\"Oj/`oddball").unwrap();
        assert_eq!(packet.device, None);
        assert_eq!(packet.comment.unwrap(), b"`oddball");
    }

    #[test]
    fn empty_comment_is_original_mic_e() {
        let packet = parse(b"N0CALL>T7SYWT:`2U*n\"Oj/").unwrap();
        assert_eq!(packet.device.unwrap(), "Original Mic-E");
        assert_eq!(packet.comment, None);
    }

    #[test]
    fn custom_message_code() {
        let packet = parse(b"N0CALL>AB0YWT:`2U*n\"Oj/").unwrap();
        assert_eq!(packet.status.unwrap(), b"Custom-1");
        let position = packet.position.unwrap();
        assert_relative_eq!(*position.latitude.unwrap(), 1.1623333333333332);
    }

    #[test]
    fn emergency_message_code() {
        let packet = parse(b"N0CALL>220YWT:`2U*n\"Oj/").unwrap();
        assert_eq!(packet.status.unwrap(), b"Emergency");
    }

    #[test]
    fn mixed_bit_classes_are_unknown() {
        let packet = parse(b"N0CALL>A7SYWT:`2U*n\"Oj/").unwrap();
        assert_eq!(packet.status.unwrap(), b"Unknown");
    }

    #[test]
    fn ambiguous_latitude_digits() {
        let packet = parse(b"N0CALL>T7SYZZ:`2U*n\"Oj/").unwrap();
        let position = packet.position.unwrap();
        assert_eq!(position.precision, Precision::Minute);
        assert_relative_eq!(*position.latitude.unwrap(), 47.65);
    }

    #[test]
    fn south_and_east() {
        // byte 4 south, byte 6 east
        let packet = parse(b"N0CALL>T7S9W0:`2U*n\"Oj/").unwrap();
        let position = packet.position.unwrap();
        assert!(*position.latitude.unwrap() < 0.0);
        assert!(*position.longitude.unwrap() > 0.0);
    }

    #[test]
    fn destination_must_be_six_bytes() {
        let err = parse(b"N0CALL>T7SYW:`2U*n\"Oj/").unwrap_err();
        assert_eq!(
            err.error,
            DecodeError::MicEDestinationLength("T7SYW".to_string())
        );
    }

    #[test]
    fn invalid_destination_byte() {
        let err = parse(b"N0CALL>T7SYW[:`2U*n\"Oj/").unwrap_err();
        assert_eq!(
            err.error,
            DecodeError::InvalidMicEDestination("T7SYW[".to_string())
        );
    }

    #[test]
    fn truncated_information_field() {
        assert!(parse(b"N0CALL>T7SYWT:`2U*n").is_err());
    }

    #[test]
    fn longitude_offset_adjustment() {
        // offset +100 with a degree byte that lands in the 180..=199 window
        // 'w' = 119: 119 - 28 + 100 = 191 -> 91 degrees
        let packet = parse(b"N0CALL>T7SYWT:`wU*n\"Oj/").unwrap();
        let position = packet.position.unwrap();
        assert_relative_eq!(*position.longitude.unwrap(), -91.95233333333334);
    }
}

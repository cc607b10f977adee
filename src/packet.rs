use std::convert::TryFrom;

use crate::extension::{AprsAntenna, AprsCourse};
use crate::message::AprsMessage;
use crate::object::NamedEntity;
use crate::position::AprsPosition;
use crate::telemetry::AprsTelemetry;
use crate::weather::WeatherReport;
use crate::{Callsign, DecodeError, Symbol, Timestamp, Via};

/// One decoded APRS frame. `from`, `to` and `path` are always present;
/// every other field is filled in only when the information field carried
/// it.
#[derive(PartialEq, Debug, Clone)]
pub struct AprsPacket {
    /// The frame exactly as it was received.
    pub raw: Vec<u8>,
    pub from: Callsign,
    pub to: Callsign,
    /// Digipeater path, with server-appended q-constructs removed.
    pub path: Vec<Via>,
    pub timestamp: Option<Timestamp>,
    pub symbol: Option<Symbol>,
    pub position: Option<AprsPosition>,
    pub course: Option<AprsCourse>,
    pub antenna: Option<AprsAntenna>,
    pub weather: Option<WeatherReport>,
    pub telemetry: Option<AprsTelemetry>,
    pub message: Option<AprsMessage>,
    pub status: Option<Vec<u8>>,
    pub device: Option<String>,
    pub object: Option<NamedEntity>,
    pub item: Option<NamedEntity>,
    pub raw_gps: Option<String>,
    pub comment: Option<Vec<u8>>,
}

impl AprsPacket {
    fn new(raw: &[u8], from: Callsign, to: Callsign, path: Vec<Via>) -> Self {
        Self {
            raw: raw.to_owned(),
            from,
            to,
            path,
            timestamp: None,
            symbol: None,
            position: None,
            course: None,
            antenna: None,
            weather: None,
            telemetry: None,
            message: None,
            status: None,
            device: None,
            object: None,
            item: None,
            raw_gps: None,
            comment: None,
        }
    }

    pub(crate) fn position_mut(&mut self) -> &mut AprsPosition {
        self.position.get_or_insert_with(Default::default)
    }

    pub(crate) fn course_mut(&mut self) -> &mut AprsCourse {
        self.course.get_or_insert_with(Default::default)
    }

    pub(crate) fn antenna_mut(&mut self) -> &mut AprsAntenna {
        self.antenna.get_or_insert_with(Default::default)
    }

    pub(crate) fn weather_mut(&mut self) -> &mut WeatherReport {
        self.weather.get_or_insert_with(Default::default)
    }

    pub(crate) fn telemetry_mut(&mut self) -> &mut AprsTelemetry {
        self.telemetry.get_or_insert_with(Default::default)
    }
}

impl TryFrom<&[u8]> for AprsPacket {
    type Error = DecodeError;

    fn try_from(s: &[u8]) -> Result<Self, Self::Error> {
        let from_delimiter = s
            .iter()
            .position(|x| *x == b'>')
            .ok_or_else(|| DecodeError::InvalidFrom(s.to_owned()))?;
        let (from, rest) = s.split_at(from_delimiter);
        let from = Callsign::try_from(from)?;
        let rest = &rest[1..];

        let header_delimiter = rest
            .iter()
            .position(|x| *x == b':')
            .ok_or_else(|| DecodeError::InvalidPath(rest.to_owned()))?;
        let (header, body) = rest.split_at(header_delimiter);
        let body = &body[1..];

        let mut tokens: Vec<&[u8]> = header.split(|x| *x == b',').collect();
        crate::via::strip_q_construct(&mut tokens);

        let mut tokens = tokens.into_iter();
        let to = tokens
            .next()
            .ok_or_else(|| DecodeError::InvalidPath(rest.to_owned()))?;
        let to = Callsign::try_from(to)?;

        let mut path = vec![];
        for token in tokens {
            path.push(Via::try_from(token)?);
        }

        let mut packet = AprsPacket::new(s, from, to, path);
        parse_info(&mut packet, body)?;

        Ok(packet)
    }
}

/// The first byte of the information field selects the sub-parser.
fn parse_info(packet: &mut AprsPacket, body: &[u8]) -> Result<(), DecodeError> {
    let Some(&identifier) = body.first() else {
        return Err(DecodeError::ReservedDataType(0, body.to_owned()));
    };
    let rest = &body[1..];

    match identifier {
        b'!' | b'=' => crate::position::parse_position(packet, rest, false),
        b'/' | b'@' => crate::position::parse_position(packet, rest, true),
        0x1c | 0x1d | b'`' | b'\'' => crate::mic_e::parse(packet, rest),
        b'>' => crate::status::parse(packet, rest),
        b':' => crate::message::parse(packet, rest),
        b'T' => crate::telemetry::parse_report(packet, rest),
        b';' => crate::object::parse(packet, rest),
        b')' => crate::item::parse(packet, rest),
        b'$' => {
            packet.raw_gps = Some(
                String::from_utf8(rest.to_vec())
                    .map_err(|_| DecodeError::NonUtf8Text("raw_gps"))?,
            );
            Ok(())
        }
        b'_' => crate::weather::parse_positionless(packet, rest),
        b'#' | b'%' | b'(' | b'*' | b',' | b'-' | b'<' | b'?' | b'[' => {
            Err(DecodeError::UnimplementedDataType(identifier, body.to_owned()))
        }
        _ => Err(DecodeError::ReservedDataType(identifier, body.to_owned())),
    }
}

//! Messages: addressed text, acks/rejects, and the telemetry definition
//! messages a station addresses to itself.

use crate::bytes::{parse_bytes, trim_spaces};
use crate::packet::AprsPacket;
use crate::DecodeError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AprsMessage {
    /// The addressee, with the padding spaces removed.
    pub addressee: Vec<u8>,
    /// Message text; `b"ack"` / `b"rej"` for acknowledgements.
    pub text: Vec<u8>,
    /// Message number. Kept as raw bytes; real feeds use alphanumerics.
    pub id: Option<Vec<u8>>,
}

/// A message body (after the `:` data type identifier): nine addressee
/// bytes, a colon, then the text. A message a station sends to itself may
/// actually be a telemetry definition.
pub(crate) fn parse(packet: &mut AprsPacket, b: &[u8]) -> Result<(), DecodeError> {
    if b.len() < 10 || b[9] != b':' {
        return Err(DecodeError::InvalidMessage(b.to_owned()));
    }

    let addressee = trim_spaces(&b[0..9]);
    let body = &b[10..];

    if addressee == packet.from.to_string().as_bytes() && parse_definition(packet, addressee, body)?
    {
        return Ok(());
    }

    packet.message = Some(parse_body(addressee, body));

    Ok(())
}

fn parse_body(addressee: &[u8], body: &[u8]) -> AprsMessage {
    for verb in [&b"ack"[..], &b"rej"[..]] {
        if let Some(id) = body.strip_prefix(verb) {
            if !id.is_empty() {
                return AprsMessage {
                    addressee: addressee.to_vec(),
                    text: verb.to_vec(),
                    id: Some(id.to_vec()),
                };
            }
        }
    }

    if let Some(brace) = body.iter().position(|&c| c == b'{') {
        let digits: Vec<u8> = body[brace + 1..]
            .iter()
            .copied()
            .take_while(u8::is_ascii_digit)
            .collect();
        if !digits.is_empty() {
            return AprsMessage {
                addressee: addressee.to_vec(),
                text: body[..brace].to_vec(),
                id: Some(digits),
            };
        }
    }

    AprsMessage {
        addressee: addressee.to_vec(),
        text: body.to_vec(),
        id: None,
    }
}

/// `PARM.` / `UNIT.` / `EQNS.` / `BITS.` bodies on a self-addressed
/// message define the telemetry channels instead of carrying text.
/// Returns whether the body was such a definition.
fn parse_definition(
    packet: &mut AprsPacket,
    addressee: &[u8],
    body: &[u8],
) -> Result<bool, DecodeError> {
    let Some(prefix) = body.get(0..5) else {
        return Ok(false);
    };
    let rest = &body[5..];

    match prefix {
        b"PARM." => {
            let parm = split_to_strings(rest);
            let telemetry = packet.telemetry_mut();
            telemetry.parm = parm;
        }
        b"UNIT." => {
            let unit = split_to_strings(rest);
            let telemetry = packet.telemetry_mut();
            telemetry.unit = unit;
        }
        b"EQNS." => {
            let mut coefficients = Vec::new();
            for field in rest.split(|&c| c == b',').take(15) {
                let value = parse_bytes::<f64>(trim_spaces(field))
                    .ok_or_else(|| DecodeError::InvalidTelemetryValue(field.to_owned()))?;
                coefficients.push(value);
            }
            coefficients.truncate(coefficients.len() / 3 * 3);

            let telemetry = packet.telemetry_mut();
            telemetry.eqns = coefficients
                .chunks(3)
                .map(|c| [c[0], c[1], c[2]])
                .collect();
        }
        b"BITS." => {
            let bit_count = rest
                .iter()
                .take_while(|c| matches!(c, b'0' | b'1'))
                .count()
                .min(8);
            if bit_count == 0 {
                return Err(DecodeError::InvalidTelemetryBits(rest.to_owned()));
            }

            let project_title = match rest.get(bit_count) {
                Some(b',') => Some(String::from_utf8_lossy(&rest[bit_count + 1..]).into_owned()),
                _ => None,
            };

            let telemetry = packet.telemetry_mut();
            telemetry.bits = rest[..bit_count].iter().map(|c| c - b'0').collect();
            telemetry.project_title = project_title;
        }
        _ => return Ok(false),
    }

    let to = String::from_utf8_lossy(addressee).into_owned();
    packet.telemetry_mut().to = Some(to);

    Ok(true)
}

fn split_to_strings(b: &[u8]) -> Vec<String> {
    b.split(|&c| c == b',')
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn plain_message() {
        let packet = parse(b"FROMCALL>TOCALL::DEST     :Hello World! This msg has a : colon")
            .unwrap();
        let message = packet.message.unwrap();
        assert_eq!(message.addressee, b"DEST");
        assert_eq!(message.text, b"Hello World! This msg has a : colon");
        assert_eq!(message.id, None);
    }

    #[test]
    fn message_with_number() {
        let packet =
            parse(b"FROMCALL>TOCALL::DESTINATI:Hello World{32975").unwrap();
        let message = packet.message.unwrap();
        assert_eq!(message.addressee, b"DESTINATI");
        assert_eq!(message.text, b"Hello World");
        assert_eq!(message.id.unwrap(), b"32975");
    }

    #[test]
    fn brace_without_digits_is_text() {
        let packet = parse(b"FROMCALL>TOCALL::DEST     :curly {brace}").unwrap();
        let message = packet.message.unwrap();
        assert_eq!(message.text, b"curly {brace}");
        assert_eq!(message.id, None);
    }

    #[test]
    fn ack_and_rej() {
        let packet = parse(b"FROMCALL>TOCALL::DEST     :ack003").unwrap();
        let message = packet.message.unwrap();
        assert_eq!(message.text, b"ack");
        assert_eq!(message.id.unwrap(), b"003");

        let packet = parse(b"FROMCALL>TOCALL::DEST     :rejA1").unwrap();
        let message = packet.message.unwrap();
        assert_eq!(message.text, b"rej");
        assert_eq!(message.id.unwrap(), b"A1");
    }

    #[test]
    fn bare_ack_is_plain_text() {
        let packet = parse(b"FROMCALL>TOCALL::DEST     :ack").unwrap();
        let message = packet.message.unwrap();
        assert_eq!(message.text, b"ack");
        assert_eq!(message.id, None);
    }

    #[test]
    fn short_addressee_is_an_error() {
        assert!(parse(b"FROMCALL>TOCALL::DEST:Hello").is_err());
    }

    #[test]
    fn eqns_definition() {
        let packet = parse(
            b"FROMCALL>TOCALL::FROMCALL :EQNS.0,0.075,0,0,10,0,0,10,0,0,1,0,0,0,0",
        )
        .unwrap();
        assert!(packet.message.is_none());
        let telemetry = packet.telemetry.unwrap();
        assert_eq!(telemetry.to.unwrap(), "FROMCALL");
        assert_eq!(
            telemetry.eqns,
            vec![
                [0.0, 0.075, 0.0],
                [0.0, 10.0, 0.0],
                [0.0, 10.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
            ]
        );
    }

    #[test]
    fn eqns_truncates_to_triples() {
        let packet =
            parse(b"FROMCALL>TOCALL::FROMCALL :EQNS.0,1,2,3,4").unwrap();
        let telemetry = packet.telemetry.unwrap();
        assert_eq!(telemetry.eqns, vec![[0.0, 1.0, 2.0]]);
    }

    #[test]
    fn eqns_with_bad_float_is_an_error() {
        assert!(parse(b"FROMCALL>TOCALL::FROMCALL :EQNS.0,abc,2").is_err());
    }

    #[test]
    fn parm_and_unit_definitions() {
        let packet = parse(
            b"FROMCALL>TOCALL::FROMCALL :PARM.Battery,Temp,Pressure,Rain,Wind",
        )
        .unwrap();
        let telemetry = packet.telemetry.unwrap();
        assert_eq!(
            telemetry.parm,
            vec!["Battery", "Temp", "Pressure", "Rain", "Wind"]
        );

        let packet = parse(b"FROMCALL>TOCALL::FROMCALL :UNIT.V,deg.C,mbar,mm,m/s").unwrap();
        let telemetry = packet.telemetry.unwrap();
        assert_eq!(telemetry.unit, vec!["V", "deg.C", "mbar", "mm", "m/s"]);
    }

    #[test]
    fn bits_definition() {
        let packet =
            parse(b"FROMCALL>TOCALL::FROMCALL :BITS.10110000,Telemetry test").unwrap();
        let telemetry = packet.telemetry.unwrap();
        assert_eq!(telemetry.bits, vec![1, 0, 1, 1, 0, 0, 0, 0]);
        assert_eq!(telemetry.project_title.unwrap(), "Telemetry test");
    }

    #[test]
    fn definitions_for_other_stations_stay_messages() {
        let packet = parse(b"FROMCALL>TOCALL::OTHERCALL:PARM.Battery").unwrap();
        assert!(packet.telemetry.is_none());
        let message = packet.message.unwrap();
        assert_eq!(message.text, b"PARM.Battery");
    }

    #[test]
    fn self_message_with_ssid() {
        let packet = parse(b"CALL-9>TOCALL::CALL-9   :UNIT.V").unwrap();
        assert_eq!(packet.telemetry.unwrap().unit, vec!["V"]);
    }
}

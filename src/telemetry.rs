//! Telemetry: `T#` reports with analog channels and a digital bit field,
//! plus the definition data (names, units, equations, bit sense) that
//! stations send to themselves as messages.

use crate::bytes::parse_bytes;
use crate::packet::AprsPacket;
use crate::DecodeError;

#[derive(PartialEq, Debug, Clone, Default)]
pub struct AprsTelemetry {
    /// Report sequence counter. Absent for `T#MIC` reports and for
    /// definition messages.
    pub sequence_counter: Option<u32>,
    /// Analog channel values, in transmission order.
    pub values: Vec<f64>,
    /// Digital channel bits.
    pub bits: Vec<u8>,
    /// Channel names from a `PARM.` definition.
    pub parm: Vec<String>,
    /// Channel units from a `UNIT.` definition.
    pub unit: Vec<String>,
    /// `(a, b, c)` coefficient triples from an `EQNS.` definition.
    pub eqns: Vec<[f64; 3]>,
    /// Project title from a `BITS.` definition.
    pub project_title: Option<String>,
    /// Addressee of the definition message (the defining station itself).
    pub to: Option<String>,
}

/// A `T#` telemetry report body (after the `T`).
pub(crate) fn parse_report(packet: &mut AprsPacket, b: &[u8]) -> Result<(), DecodeError> {
    if b.first() != Some(&b'#') {
        return Err(DecodeError::InvalidTelemetry(b.to_owned()));
    }
    let b = &b[1..];

    let (sequence, rest) = if let Some(rest) = b.strip_prefix(b"MIC,") {
        (None, rest)
    } else if let Some(rest) = b.strip_prefix(b"MIC") {
        (None, rest)
    } else {
        let digits = b.iter().take_while(|c| c.is_ascii_digit()).count();
        if !(1..=5).contains(&digits) || b.get(digits) != Some(&b',') {
            return Err(DecodeError::InvalidTelemetry(b.to_owned()));
        }
        (parse_bytes::<u32>(&b[..digits]), &b[digits + 1..])
    };

    if rest.is_empty() {
        return Err(DecodeError::InvalidTelemetry(b.to_owned()));
    }

    let mut fields: Vec<&[u8]> = rest.split(|&c| c == b',').collect();
    let digital = fields.pop().unwrap();

    let mut values = Vec::new();
    for field in fields {
        if field.is_empty() {
            continue;
        }
        let value = parse_bytes::<f64>(field)
            .ok_or_else(|| DecodeError::InvalidTelemetryValue(field.to_owned()))?;
        if values.len() < 5 {
            values.push(value);
        }
    }

    let bit_count = digital
        .iter()
        .take_while(|c| matches!(c, b'0' | b'1'))
        .count()
        .min(8);
    if bit_count == 0 {
        return Err(DecodeError::InvalidTelemetryBits(digital.to_owned()));
    }

    let telemetry = packet.telemetry_mut();
    telemetry.sequence_counter = sequence;
    telemetry.values = values;
    telemetry.bits = digital[..bit_count].iter().map(|c| c - b'0').collect();

    crate::comment::process(packet, &digital[bit_count..])
}

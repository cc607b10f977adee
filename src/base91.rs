//! Base-91 arithmetic over ASCII digits, as used by compressed positions,
//! comment telemetry and Mic-E altitude fields.

pub(crate) fn decode_ascii(bytes: &[u8]) -> Option<f64> {
    let mut val = 0.0;

    for b in bytes {
        let x = digit_from_ascii(*b)?;

        val *= 91.0;
        val += x as f64;
    }
    Some(val)
}

// APRS standard - subtract 33
pub(crate) fn digit_from_ascii(ascii: u8) -> Option<u8> {
    ascii.checked_sub(33)
}

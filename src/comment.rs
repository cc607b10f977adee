//! Comment post-processing: the free-text tail of a report may still carry
//! an altitude, a base-91 telemetry block and a DAO marker.

use crate::base91;
use crate::bytes::trim_whitespace;
use crate::packet::AprsPacket;
use crate::units;
use crate::DecodeError;

/// Runs the comment pipeline and stores whatever is left, or nothing when
/// the trimmed comment is empty.
pub(crate) fn process(packet: &mut AprsPacket, b: &[u8]) -> Result<(), DecodeError> {
    let mut comment = b.to_vec();

    extract_altitude(packet, &comment);
    extract_telemetry(packet, &mut comment);
    strip_dao(&mut comment);

    let trimmed = trim_whitespace(&comment);
    if !trimmed.is_empty() {
        packet.comment = Some(trimmed.to_vec());
    }

    Ok(())
}

/// `/A=dddddd` (or `/A=-ddddd`) anywhere in the comment is an altitude in
/// feet. The text itself stays in the comment.
fn extract_altitude(packet: &mut AprsPacket, comment: &[u8]) {
    for (i, window) in comment.windows(3).enumerate() {
        if window != b"/A=" {
            continue;
        }

        let Some(digits) = comment.get(i + 3..i + 9) else {
            continue;
        };

        let valid = (digits[0] == b'-' && digits[1..].iter().all(u8::is_ascii_digit))
            || digits.iter().all(u8::is_ascii_digit);
        if !valid {
            continue;
        }

        if let Some(feet) = crate::bytes::parse_bytes::<i32>(digits) {
            packet.position_mut().altitude = Some(f64::from(feet) * units::METERS_PER_FOOT);
            return;
        }
    }
}

/// A `|…|` block with an inner length of 4, 6, 8, 10 or 12 is base-91
/// telemetry: a two-byte sequence counter followed by two-byte channels.
/// The block is removed from the comment.
fn extract_telemetry(packet: &mut AprsPacket, comment: &mut Vec<u8>) {
    let Some((start, end, inner)) = find_telemetry_block(comment) else {
        return;
    };

    let telemetry = packet.telemetry_mut();
    telemetry.sequence_counter = base91::decode_ascii(&inner[0..2]).map(|v| v as u32);
    telemetry.values = inner[2..]
        .chunks(2)
        .filter_map(base91::decode_ascii)
        .collect();

    comment.drain(start..end);
}

fn find_telemetry_block(comment: &[u8]) -> Option<(usize, usize, Vec<u8>)> {
    let start = comment.iter().position(|&c| c == b'|')?;
    let inner_len = comment[start + 1..]
        .iter()
        .position(|&c| c == b'|')?;

    if ![4, 6, 8, 10, 12].contains(&inner_len) {
        return None;
    }

    let inner = comment[start + 1..start + 1 + inner_len].to_vec();
    if !inner.iter().all(|&c| (33..=124).contains(&c)) {
        return None;
    }

    Some((start, start + inner_len + 2, inner))
}

/// The `!DAO!` datum marker is recognized and removed, nothing more.
fn strip_dao(comment: &mut Vec<u8>) {
    let mut i = 0;
    while i + 5 <= comment.len() {
        let w = &comment[i..i + 5];
        if w[0] == b'!'
            && w[4] == b'!'
            && (0x21..=0x7B).contains(&w[1])
            && (0x20..=0x7B).contains(&w[2])
            && (0x20..=0x7B).contains(&w[3])
        {
            comment.drain(i..i + 5);
            return;
        }
        i += 1;
    }
}

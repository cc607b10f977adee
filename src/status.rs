//! A Status Report announces the station's current mission or any other
//! single line status to everyone. The report starts with the '>' APRS
//! Data Type Identifier, and may carry a DHM timestamp or a Maidenhead
//! grid locator with a symbol instead of a position.
//!
//! Examples:
//! - ">12.6V 0.2A 22degC"               (report without timestamp)
//! - ">281205zSystem will shutdown"     (report with timestamp in DHM format)
//! - ">IO91SX/- at home"                (report with grid locator)

use std::convert::TryFrom;

use crate::packet::AprsPacket;
use crate::DecodeError;
use crate::Symbol;
use crate::Timestamp;

pub(crate) fn parse(packet: &mut AprsPacket, b: &[u8]) -> Result<(), DecodeError> {
    // DHM zulu timestamp, then free text
    if b.len() >= 7 && b[0..6].iter().all(u8::is_ascii_digit) && b[6] == b'z' {
        packet.timestamp = Some(Timestamp::try_from(&b[0..7])?);
        packet.status = Some(b[7..].to_vec());
        return Ok(());
    }

    // grid locator plus symbol, optionally followed by a space and text
    if b.len() == 6 && is_maidenhead(&b[0..4]) {
        packet.symbol = Some(Symbol::try_from((b[4], b[5]))?);
        set_maidenhead(packet, &b[0..4]);
        return Ok(());
    }
    if b.len() >= 8 && is_maidenhead(&b[0..6]) {
        if b.len() == 8 {
            packet.symbol = Some(Symbol::try_from((b[6], b[7]))?);
            set_maidenhead(packet, &b[0..6]);
            return Ok(());
        }
        if b[8] == b' ' {
            packet.symbol = Some(Symbol::try_from((b[6], b[7]))?);
            set_maidenhead(packet, &b[0..6]);
            packet.status = Some(b[9..].to_vec());
            return Ok(());
        }
    }

    packet.status = Some(b.to_vec());
    Ok(())
}

fn set_maidenhead(packet: &mut AprsPacket, grid: &[u8]) {
    // the grid bytes are ASCII by construction
    packet.position_mut().maidenhead = Some(String::from_utf8_lossy(grid).into_owned());
}

fn is_maidenhead(b: &[u8]) -> bool {
    let field_ok = b[0].is_ascii_uppercase() && b[1].is_ascii_uppercase();
    let square_ok = b[2].is_ascii_digit() && b[3].is_ascii_digit();
    let subsquare_ok = match b.get(4..6) {
        Some(sub) => sub[0].is_ascii_lowercase() && sub[1].is_ascii_lowercase(),
        None => true,
    };

    field_ok && square_ok && subsquare_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::TimeZone;

    #[test]
    fn plain_status() {
        let packet = parse(b"FROMCALL>TOCALL:>12.6V 0.2A 22degC").unwrap();
        assert_eq!(packet.status.unwrap(), b"12.6V 0.2A 22degC");
        assert_eq!(packet.timestamp, None);
    }

    #[test]
    fn empty_status() {
        let packet = parse(b"FROMCALL>TOCALL:>").unwrap();
        assert_eq!(packet.status.unwrap(), b"");
    }

    #[test]
    fn status_with_timestamp() {
        let packet = parse(b"FROMCALL>TOCALL:>281205zSystem will shutdown").unwrap();
        assert_eq!(
            packet.timestamp,
            Some(Timestamp::DayHourMinute {
                day: 28,
                hour: 12,
                minute: 5,
                zone: TimeZone::Utc
            })
        );
        assert_eq!(packet.status.unwrap(), b"System will shutdown");
    }

    #[test]
    fn non_digit_timestamp_is_plain_text() {
        let packet = parse(b"FROMCALL>TOCALL:>2812x5zHello").unwrap();
        assert_eq!(packet.timestamp, None);
        assert_eq!(packet.status.unwrap(), b"2812x5zHello");
    }

    #[test]
    fn four_char_grid() {
        let packet = parse(b"FROMCALL>TOCALL:>IO91/-").unwrap();
        assert_eq!(packet.position.unwrap().maidenhead.unwrap(), "IO91");
        assert_eq!(packet.symbol.unwrap().table, '/');
        assert_eq!(packet.status, None);
    }

    #[test]
    fn six_char_grid_with_text() {
        let packet = parse(b"FROMCALL>TOCALL:>IO91sx/- at home").unwrap();
        assert_eq!(packet.position.unwrap().maidenhead.unwrap(), "IO91sx");
        assert_eq!(packet.symbol.unwrap().code, '-');
        assert_eq!(packet.status.unwrap(), b"at home");
    }

    #[test]
    fn six_char_grid_without_text() {
        let packet = parse(b"FROMCALL>TOCALL:>IO91sx/-").unwrap();
        assert_eq!(packet.position.unwrap().maidenhead.unwrap(), "IO91sx");
        assert_eq!(packet.status, None);
    }

    #[test]
    fn grid_needs_the_separating_space() {
        let packet = parse(b"FROMCALL>TOCALL:>IO91sx/-at home").unwrap();
        assert!(packet.position.is_none());
        assert_eq!(packet.status.unwrap(), b"IO91sx/-at home");
    }
}

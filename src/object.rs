//! Any APRS station can manually report the position of an APRS entity
//! (e.g. another station or a weather phenomenon). Object Reports carry a
//! nine-byte name, a liveness indicator and a timestamped position.

use crate::bytes::trim_spaces;
use crate::packet::AprsPacket;
use crate::DecodeError;

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum EntityState {
    Alive,
    Killed,
}

/// A reported object or item: its name and whether the sender considers
/// it alive.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct NamedEntity {
    pub name: Vec<u8>,
    pub state: EntityState,
}

/// An object body (after the `;`): name, state byte, then a position
/// report with timestamp.
pub(crate) fn parse(packet: &mut AprsPacket, b: &[u8]) -> Result<(), DecodeError> {
    if b.len() < 10 {
        return Err(DecodeError::InvalidObject(b.to_owned()));
    }

    let state = match b[9] {
        b'*' => EntityState::Alive,
        b'_' => EntityState::Killed,
        _ => return Err(DecodeError::InvalidObjectState(b[9..].to_owned())),
    };

    packet.object = Some(NamedEntity {
        name: trim_spaces(&b[0..9]).to_vec(),
        state,
    });

    crate::position::parse_position(packet, &b[10..], true)
}

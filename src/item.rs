//! Item Reports specify the position of inanimate things that are
//! occasionally posted on a map (e.g. marathon checkpoints or first-aid
//! posts). They carry a short name but, unlike objects, no timestamp.

use crate::object::{EntityState, NamedEntity};
use crate::packet::AprsPacket;
use crate::DecodeError;

/// An item body (after the `)`): a 3..=9 byte name terminated by the state
/// byte, then a position report without timestamp.
pub(crate) fn parse(packet: &mut AprsPacket, b: &[u8]) -> Result<(), DecodeError> {
    let mut split = None;
    for index in 3..=9.min(b.len().saturating_sub(1)) {
        match b[index] {
            b'!' => {
                split = Some((index, EntityState::Alive));
                break;
            }
            b'_' => {
                split = Some((index, EntityState::Killed));
                break;
            }
            _ => {}
        }
    }

    let Some((index, state)) = split else {
        return Err(DecodeError::InvalidItem(b.to_owned()));
    };

    packet.item = Some(NamedEntity {
        name: b[..index].to_vec(),
        state,
    });

    crate::position::parse_position(packet, &b[index + 1..], false)
}

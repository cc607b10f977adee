use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use crate::{Callsign, DecodeError};

/// One entry of the digipeater path. The trailing `*` marks an entry that
/// has already repeated the packet.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Via {
    pub callsign: Callsign,
    pub heard: bool,
}

impl TryFrom<&[u8]> for Via {
    type Error = DecodeError;

    fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
        let (b, heard) = match b.split_last() {
            Some((b'*', rest)) => (rest, true),
            _ => (b, false),
        };

        Ok(Via {
            callsign: Callsign::try_from(b)?,
            heard,
        })
    }
}

impl Display for Via {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.callsign)?;
        if self.heard {
            write!(f, "*")?;
        }
        Ok(())
    }
}

// Server-generated construct identifying how a packet entered APRS-IS.
// These are appended by servers and are not part of the radio payload.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum QConstruct {
    AC,
    AX,
    AU,
    Ao,
    AS,
    Ar,
    AR,
}

impl QConstruct {
    fn decode(bytes: &[u8]) -> Option<Self> {
        let q = match bytes {
            b"qAC" => QConstruct::AC,
            b"qAX" => QConstruct::AX,
            b"qAU" => QConstruct::AU,
            b"qAo" => QConstruct::Ao,
            b"qAS" => QConstruct::AS,
            b"qAr" => QConstruct::Ar,
            b"qAR" => QConstruct::AR,
            _ => return None,
        };

        Some(q)
    }
}

fn is_server_call(bytes: &[u8]) -> bool {
    (1..=8).contains(&bytes.len())
        && bytes
            .iter()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase() || *c == b'-')
}

/// Drops a trailing `qA?,SERVER` pair from the raw path token list.
pub(crate) fn strip_q_construct(tokens: &mut Vec<&[u8]>) {
    if tokens.len() >= 2
        && QConstruct::decode(tokens[tokens.len() - 2]).is_some()
        && is_server_call(tokens[tokens.len() - 1])
    {
        tokens.truncate(tokens.len() - 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_heard_marker() {
        let via = Via::try_from(&b"TCPIP*"[..]).unwrap();
        assert_eq!(via.callsign, Callsign::new("TCPIP", None));
        assert!(via.heard);
    }

    #[test]
    fn parse_plain_entry() {
        let via = Via::try_from(&b"WIDE2-2"[..]).unwrap();
        assert_eq!(via.callsign, Callsign::new("WIDE2", Some("2")));
        assert!(!via.heard);
    }

    #[test]
    fn strips_trailing_q_construct() {
        let mut tokens: Vec<&[u8]> = vec![b"TCPIP*", b"qAC", b"T2TEXAS"];
        strip_q_construct(&mut tokens);
        assert_eq!(tokens, vec![&b"TCPIP*"[..]]);
    }

    #[test]
    fn keeps_q_construct_lookalikes() {
        // not a server verb
        let mut tokens: Vec<&[u8]> = vec![b"qAZ", b"T2TEXAS"];
        strip_q_construct(&mut tokens);
        assert_eq!(tokens.len(), 2);

        // server call too long
        let mut tokens: Vec<&[u8]> = vec![b"qAC", b"T2TEXASX9"];
        strip_q_construct(&mut tokens);
        assert_eq!(tokens.len(), 2);

        // lower-case server call
        let mut tokens: Vec<&[u8]> = vec![b"qAC", b"texas"];
        strip_q_construct(&mut tokens);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn keeps_q_construct_in_the_middle() {
        let mut tokens: Vec<&[u8]> = vec![b"qAC", b"T2TEXAS", b"WIDE1-1"];
        strip_q_construct(&mut tokens);
        assert_eq!(tokens.len(), 3);
    }
}

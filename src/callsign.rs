use std::convert::TryFrom;
use std::fmt;

use crate::DecodeError;

/// A station identifier as transmitted: the base call and, when present,
/// the SSID after the first dash.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Callsign {
    pub call: String,
    pub ssid: Option<String>,
}

impl Callsign {
    pub fn new<T: Into<String>>(call: T, ssid: Option<T>) -> Callsign {
        Callsign {
            call: call.into(),
            ssid: ssid.map(Into::into),
        }
    }
}

impl TryFrom<&[u8]> for Callsign {
    type Error = DecodeError;

    fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
        let s = std::str::from_utf8(b).map_err(|_| DecodeError::NonUtf8Callsign(b.to_owned()))?;

        // Everything after the first dash is the SSID, further dashes
        // included; both halves must be nonempty.
        let (call, ssid) = match s.find('-') {
            Some(dash) => (&s[..dash], Some(&s[dash + 1..])),
            None => (s, None),
        };

        if call.is_empty() {
            return Err(DecodeError::EmptyCallsign(s.to_owned()));
        }
        if ssid.is_some_and(str::is_empty) {
            return Err(DecodeError::EmptySsid(s.to_owned()));
        }

        Ok(Callsign {
            call: call.to_owned(),
            ssid: ssid.map(str::to_owned),
        })
    }
}

impl fmt::Display for Callsign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ssid {
            Some(ssid) => write!(f, "{}-{}", self.call, ssid),
            None => f.write_str(&self.call),
        }
    }
}

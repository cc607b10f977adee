use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use crate::DecodeError;

/// The two-byte display symbol of a station: table identifier (`/` for the
/// primary table, `\` for the alternate, or an overlay character) and the
/// symbol code within that table.
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub struct Symbol {
    pub table: char,
    pub code: char,
}

impl Symbol {
    /// A weather station symbol triggers weather decoding of the bytes
    /// after the position.
    pub fn is_weather_station(&self) -> bool {
        self.table == '/' && self.code == '_'
    }
}

impl TryFrom<(u8, u8)> for Symbol {
    type Error = DecodeError;

    fn try_from((table, code): (u8, u8)) -> Result<Self, Self::Error> {
        let s = [table, code];
        let s = std::str::from_utf8(&s).map_err(|_| DecodeError::NonUtf8Text("symbol"))?;
        let mut chars = s.chars();

        match (chars.next(), chars.next()) {
            (Some(table), Some(code)) => Ok(Symbol { table, code }),
            _ => Err(DecodeError::NonUtf8Text("symbol")),
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}{}", self.table, self.code)
    }
}

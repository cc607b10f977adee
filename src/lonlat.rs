use std::ops::Deref;

use crate::base91;
use crate::bytes::parse_bytes;
use crate::DecodeError;

/// Position ambiguity, signalled by trailing spaces in the minute digits
/// of an uncompressed latitude. The latitude's ambiguity governs the
/// longitude of the same report.
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq)]
pub enum Precision {
    HundredthMinute,
    TenthMinute,
    Minute,
    TenthDegree,
    Degree,
}

impl Precision {
    pub(crate) fn from_num_spaces(spaces: u8) -> Option<Self> {
        let res = match spaces {
            0 => Precision::HundredthMinute,
            1 => Precision::TenthMinute,
            2 => Precision::Minute,
            3 => Precision::TenthDegree,
            4 => Precision::Degree,
            _ => return None,
        };

        Some(res)
    }

    /// How many of the trailing minute digits are blanked out.
    pub(crate) fn num_digits(&self) -> u8 {
        match self {
            Precision::HundredthMinute => 0,
            Precision::TenthMinute => 1,
            Precision::Minute => 2,
            Precision::TenthDegree => 3,
            Precision::Degree => 4,
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::HundredthMinute
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Default)]
pub struct Latitude(f64);

impl Deref for Latitude {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Latitude {
    /// Creates a new `Latitude`.
    /// Returns `None` if the given value is not a valid latitude.
    pub fn new(value: f64) -> Option<Self> {
        if value > 90.0 || value < -90.0 || value.is_nan() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub(crate) fn from_dmh(deg: u32, min: u32, hundredths: u32, north: bool) -> Option<Self> {
        let value = f64::from(deg) + f64::from(min) / 60. + f64::from(hundredths) / 6_000.;
        let value = if north { value } else { -value };

        Self::new(value)
    }

    /// The value of the latitude in degrees.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Parses `DDMM.hhD`. Trailing spaces in the minute digits convey
    /// ambiguity; they are counted for the precision and read as zeros.
    pub(crate) fn parse_uncompressed(b: &[u8]) -> Result<(Self, Precision), DecodeError> {
        if b.len() != 8 || b[4] != b'.' {
            return Err(DecodeError::InvalidLatitude(b.to_owned()));
        }

        let north = match b[7] {
            b'N' | b'n' => true,
            b'S' | b's' => false,
            _ => return Err(DecodeError::InvalidLatitude(b.to_owned())),
        };

        // The degree digits can never be ambiguous.
        let deg = parse_bytes::<u32>(&b[0..2])
            .ok_or_else(|| DecodeError::InvalidLatitude(b.to_owned()))?;

        // From the first space onward the minute digits must all be
        // spaces; they count toward the precision and read as zeros.
        let mut minute_digits = [b[2], b[3], b[5], b[6]];
        let spaces = match minute_digits.iter().position(|&d| d == b' ') {
            Some(first) => {
                if minute_digits[first..].iter().any(|&d| d != b' ') {
                    return Err(DecodeError::InvalidLatitude(b.to_owned()));
                }
                for digit in &mut minute_digits[first..] {
                    *digit = b'0';
                }
                (minute_digits.len() - first) as u8
            }
            None => 0,
        };

        let precision = Precision::from_num_spaces(spaces)
            .ok_or_else(|| DecodeError::InvalidLatitude(b.to_owned()))?;

        let min = parse_bytes::<u32>(&minute_digits[0..2])
            .ok_or_else(|| DecodeError::InvalidLatitude(b.to_owned()))?;
        let min_frac = parse_bytes::<u32>(&minute_digits[2..4])
            .ok_or_else(|| DecodeError::InvalidLatitude(b.to_owned()))?;

        let lat = Self::from_dmh(deg, min, min_frac, north)
            .ok_or_else(|| DecodeError::InvalidLatitude(b.to_owned()))?;

        Ok((lat, precision))
    }

    pub(crate) fn parse_compressed(b: &[u8]) -> Result<Self, DecodeError> {
        let value = 90.0
            - (base91::decode_ascii(b)
                .ok_or_else(|| DecodeError::InvalidLatitude(b.to_owned()))?
                / 380926.0);

        Self::new(value).ok_or_else(|| DecodeError::InvalidLatitude(b.to_owned()))
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Default)]
pub struct Longitude(f64);

impl Deref for Longitude {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Longitude {
    /// Creates a new `Longitude`.
    /// Returns `None` if the given value is not a valid longitude
    pub fn new(value: f64) -> Option<Self> {
        if value > 180.0 || value < -180.0 || value.is_nan() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub(crate) fn from_dmh(deg: u32, min: u32, hundredths: u32, east: bool) -> Option<Self> {
        let value = f64::from(deg) + f64::from(min) / 60. + f64::from(hundredths) / 6_000.;
        let value = if east { value } else { -value };

        Self::new(value)
    }

    /// The value of the longitude in degrees.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Parses `DDDMM.hhD`. The precision comes from the latitude of the
    /// same report; the corresponding trailing digits are ignored here.
    pub(crate) fn parse_uncompressed(b: &[u8], precision: Precision) -> Result<Self, DecodeError> {
        if b.len() != 9 || b[5] != b'.' {
            return Err(DecodeError::InvalidLongitude(b.to_owned()));
        }

        let east = match b[8] {
            b'E' | b'e' => true,
            b'W' | b'w' => false,
            _ => return Err(DecodeError::InvalidLongitude(b.to_owned())),
        };

        // The last `precision.num_digits()` digit slots are covered by the
        // latitude's ambiguity and read as zeros, whatever they hold.
        let slots = [b[0], b[1], b[2], b[3], b[4], b[6], b[7]];
        let ambiguous_from = slots.len() - usize::from(precision.num_digits());

        let mut digits = [0u32; 7];
        for (i, &slot) in slots.iter().enumerate().take(ambiguous_from) {
            digits[i] = char::from(slot)
                .to_digit(10)
                .ok_or_else(|| DecodeError::InvalidLongitude(b.to_owned()))?;
        }

        let deg = digits[0] * 100 + digits[1] * 10 + digits[2];
        let min = digits[3] * 10 + digits[4];
        let min_frac = digits[5] * 10 + digits[6];

        Self::from_dmh(deg, min, min_frac, east)
            .ok_or_else(|| DecodeError::InvalidLongitude(b.to_owned()))
    }

    pub(crate) fn parse_compressed(b: &[u8]) -> Result<Self, DecodeError> {
        let value = (base91::decode_ascii(b)
            .ok_or_else(|| DecodeError::InvalidLongitude(b.to_owned()))?
            / 190463.0)
            - 180.0;

        Self::new(value).ok_or_else(|| DecodeError::InvalidLongitude(b.to_owned()))
    }
}

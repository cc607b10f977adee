//! Weather reports: the parameter groups following a `/_` position symbol
//! and the positionless `_` report form. All values are normalized on the
//! way in; wind speeds end up in m/s, rainfall in meters, temperature in
//! degrees Celsius.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::bytes::parse_bytes;
use crate::packet::AprsPacket;
use crate::units;
use crate::DecodeError;
use crate::Timestamp;

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum StormCategory {
    TropicalStorm,
    Hurricane,
    TropicalDepression,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct WeatherReport {
    /// Wind direction in degrees.
    pub wind_direction: Option<u16>,
    /// Sustained wind speed in m/s.
    pub wind_speed: Option<f64>,
    /// Gust speed in m/s.
    pub gust_speed: Option<f64>,
    /// Peak wind gust in m/s.
    pub peak_wind_gust: Option<f64>,
    /// Temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Rainfall in the last hour, meters.
    pub rainfall_last_hour: Option<f64>,
    /// Rainfall in the last 24 hours, meters.
    pub rainfall_last_24_hours: Option<f64>,
    /// Rainfall since local midnight, meters.
    pub rainfall_since_midnight: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<u8>,
    /// Barometric pressure as transmitted, scaled by 0.1 (millibars).
    pub barometric_pressure: Option<f64>,
    /// Luminosity in W/m².
    pub luminosity: Option<f64>,
    /// Snowfall in the last 24 hours, meters.
    pub snowfall: Option<f64>,
    /// Raw rain counter ticks.
    pub rain_counts: Option<u32>,
    /// Water height in meters.
    pub water_height: Option<f64>,
    /// Radius of hurricane-force winds, meters.
    pub hurricane_radius: Option<f64>,
    /// Radius of tropical-storm-force winds, meters.
    pub tropical_storm_radius: Option<f64>,
    /// Radius of gale-force winds, meters.
    pub gale_radius: Option<f64>,
    pub storm_category: Option<StormCategory>,
    /// Station software identification from the trailing tag.
    pub software_type: Option<String>,
    /// Weather unit identification from the trailing tag.
    pub wx_unit: Option<String>,
}

lazy_static! {
    static ref WX_SOFTWARE: HashMap<u8, &'static str> = vec![
        (b'd', "APRSdos"),
        (b'M', "MacAPRS"),
        (b'P', "pocketAPRS"),
        (b'S', "APRS+SA"),
        (b'W', "WinAPRS"),
        (b'X', "X-APRS"),
    ]
    .into_iter()
    .collect();
    static ref WX_UNITS: HashSet<&'static str> = vec![
        "Dvs", "HKT", "PIC", "RSW", "U-II", "U2R", "U2k", "U5",
    ]
    .into_iter()
    .collect();
}

/// Weather data following a `/_` position. The wind comes from an already
/// consumed course/speed extension when one was present, or from a literal
/// dots-tolerant `ddd/ddd` group at the front of the remainder.
pub(crate) fn parse_after_position(packet: &mut AprsPacket, b: &[u8]) -> Result<(), DecodeError> {
    packet.weather_mut();

    let b = if take_wind_from_course(packet) {
        b
    } else {
        parse_wind_group(packet, b)
    };

    parse_parameters(packet, b, false)
}

/// A positionless report: `_` then an 8-digit month/day/hour/minute
/// timestamp, then the parameter list with `c`/`s` as the wind.
pub(crate) fn parse_positionless(packet: &mut AprsPacket, b: &[u8]) -> Result<(), DecodeError> {
    if b.len() < 8 {
        return Err(DecodeError::InvalidTimestamp(b.to_owned()));
    }

    packet.timestamp = Some(Timestamp::parse_mdhm(&b[0..8])?);
    packet.weather_mut();

    parse_parameters(packet, &b[8..], true)
}

/// A course/speed extension in front of a weather report is the wind.
fn take_wind_from_course(packet: &mut AprsPacket) -> bool {
    let Some(course) = packet.course.as_mut() else {
        return false;
    };

    if course.direction.is_none() && course.speed.is_none() {
        return false;
    }

    let weather = packet.weather.as_mut().unwrap();
    weather.wind_direction = course.direction.take();
    weather.wind_speed = course.speed.take();

    if course.is_empty() {
        packet.course = None;
    }

    true
}

/// `ddd/ddd` with either side allowed to be all dots or all spaces.
/// Unlike the course/speed extension, the speed here counts in mph.
fn parse_wind_group<'a>(packet: &mut AprsPacket, b: &'a [u8]) -> &'a [u8] {
    if b.len() < 7 || b[3] != b'/' {
        return b;
    }

    let (Some(direction), Some(speed)) = (wind_group_value(&b[0..3]), wind_group_value(&b[4..7]))
    else {
        return b;
    };

    let weather = packet.weather.as_mut().unwrap();
    weather.wind_direction = direction.map(|v| v as u16);
    weather.wind_speed = speed.map(|v| v * units::MPS_PER_MPH);

    &b[7..]
}

// Some(None) is a present-but-missing value (dots or spaces)
fn wind_group_value(b: &[u8]) -> Option<Option<f64>> {
    if b.iter().all(|&c| c == b'.') || b.iter().all(|&c| c == b' ') {
        Some(None)
    } else if b.iter().all(u8::is_ascii_digit) {
        Some(parse_bytes(b))
    } else {
        None
    }
}

fn parse_parameters(
    packet: &mut AprsPacket,
    b: &[u8],
    positionless: bool,
) -> Result<(), DecodeError> {
    let mut rem = b;

    loop {
        let Some(&code) = rem.first() else { break };

        if code == b'/' {
            match storm_category(rem) {
                Some(category) => {
                    packet.weather.as_mut().unwrap().storm_category = Some(category);
                    rem = &rem[3..];
                    continue;
                }
                None => break,
            }
        }

        let mut width = match code {
            b'h' => 2,
            b'b' => 5,
            b'g' | b't' | b'r' | b'p' | b'P' | b'c' | b's' | b'#' | b'F' | b'f' | b'^'
            | b'>' | b'&' | b'%' | b'L' | b'l' => 3,
            _ => break,
        };

        // h and b values grow by one digit when the sender used the wider
        // form (three-digit humidity, six-digit pressure)
        if (code == b'h' || code == b'b')
            && rem.get(1 + width).map(u8::is_ascii_digit).unwrap_or(false)
        {
            width += 1;
        }

        if rem.len() < 1 + width {
            break;
        }
        let value_bytes = &rem[1..1 + width];

        // all dots or all spaces: the station has no reading for this one
        if value_bytes.iter().all(|&c| c == b'.') || value_bytes.iter().all(|&c| c == b' ') {
            rem = &rem[1 + width..];
            continue;
        }

        if !value_bytes
            .iter()
            .all(|c| matches!(c, b'0'..=b'9' | b'.' | b'-'))
        {
            break;
        }
        let Some(value) = parse_bytes::<f64>(value_bytes) else {
            break;
        };

        let weather = packet.weather.as_mut().unwrap();
        match code {
            b'g' => weather.gust_speed = Some(value * units::MPS_PER_MPH),
            b't' => weather.temperature = Some(units::fahrenheit_to_celsius(value)),
            b'r' => weather.rainfall_last_hour = Some(value * units::METERS_PER_HUNDREDTH_INCH),
            b'p' => {
                weather.rainfall_last_24_hours = Some(value * units::METERS_PER_HUNDREDTH_INCH)
            }
            b'P' => {
                weather.rainfall_since_midnight = Some(value * units::METERS_PER_HUNDREDTH_INCH)
            }
            b'h' => weather.humidity = Some(value as u8),
            b'b' => weather.barometric_pressure = Some(value * 0.1),
            b'L' => weather.luminosity = Some(value),
            b'l' => weather.luminosity = Some(value * 1000.0),
            b'c' => weather.wind_direction = Some(value as u16),
            b's' if positionless => weather.wind_speed = Some(value * units::MPS_PER_MPH),
            b's' => weather.snowfall = Some(value * units::METERS_PER_INCH),
            b'#' => weather.rain_counts = Some(value as u32),
            b'F' => weather.water_height = Some(value * units::METERS_PER_FOOT),
            b'f' => weather.water_height = Some(value),
            b'^' => weather.peak_wind_gust = Some(value * units::MPS_PER_KNOT),
            b'>' => weather.hurricane_radius = Some(value * units::METERS_PER_NAUTICAL_MILE),
            b'&' => weather.tropical_storm_radius = Some(value * units::METERS_PER_NAUTICAL_MILE),
            b'%' => weather.gale_radius = Some(value * units::METERS_PER_NAUTICAL_MILE),
            _ => unreachable!(),
        }

        rem = &rem[1 + width..];
    }

    let rem = parse_software_tag(packet, rem)?;
    crate::comment::process(packet, rem)
}

fn storm_category(b: &[u8]) -> Option<StormCategory> {
    match b.get(1..3)? {
        b"TS" => Some(StormCategory::TropicalStorm),
        b"HC" => Some(StormCategory::Hurricane),
        b"TD" => Some(StormCategory::TropicalDepression),
        _ => None,
    }
}

/// The trailing station tag: one software type byte plus up to four unit
/// bytes. Unknown codes are kept, marked as unknown, rather than refused.
fn parse_software_tag<'a>(
    packet: &mut AprsPacket,
    b: &'a [u8],
) -> Result<&'a [u8], DecodeError> {
    if !(2..=5).contains(&b.len()) {
        return Ok(b);
    }

    let software =
        std::str::from_utf8(&b[0..1]).map_err(|_| DecodeError::NonUtf8Text("software_type"))?;
    let unit = std::str::from_utf8(&b[1..]).map_err(|_| DecodeError::NonUtf8Text("wx_unit"))?;

    let weather = packet.weather.as_mut().unwrap();
    weather.software_type = Some(match WX_SOFTWARE.get(&b[0]) {
        Some(name) => (*name).to_string(),
        None => format!("Unknown '{}'", software),
    });
    weather.wx_unit = Some(match WX_UNITS.get(unit) {
        Some(token) => (*token).to_string(),
        None => format!("Unknown '{}'", unit),
    });

    Ok(&b[b.len()..])
}

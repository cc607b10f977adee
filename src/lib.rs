//! [APRS] packet decoder for [Rust]
//!
//! [APRS]: http://www.aprs.org/
//! [Rust]: https://www.rust-lang.org/
//!
//! Turns one APRS frame into a normalized record: positions (compressed,
//! uncompressed and Mic-E), weather, telemetry, messages, objects, items,
//! status reports and raw GPS sentences, with every measurement converted
//! to SI units on the way in.
//!
//! # Usage
//!
//! ```rust
//! use aprs_decode::{Callsign, Precision};
//!
//! let packet = aprs_decode::parse(
//!     br"ICA3D17F2>APRS,WIDE1-1:!4821.61N\01224.49E^322/103/A=003054",
//! )
//! .unwrap();
//!
//! assert_eq!(packet.from, Callsign::new("ICA3D17F2", None));
//! let position = packet.position.unwrap();
//! assert_eq!(position.precision, Precision::HundredthMinute);
//! assert!((position.latitude.unwrap().value() - 48.36016).abs() < 1e-4);
//! let course = packet.course.unwrap();
//! assert_eq!(course.direction, Some(322));
//! ```
//!
//! Parsing is all-or-nothing: any malformed field aborts with a
//! [`ParseError`] that names the problem and the byte position it was
//! found near.

#[cfg(test)]
#[macro_use]
extern crate approx;

mod base91;
mod bytes;
mod callsign;
mod comment;
mod error;
mod extension;
mod item;
mod lonlat;
mod message;
mod mic_e;
mod object;
mod packet;
mod position;
mod status;
mod symbol;
mod telemetry;
mod timestamp;
mod units;
mod via;
mod weather;

pub mod client;

use std::convert::TryFrom;

pub use callsign::Callsign;
pub use error::{DecodeError, ParseError};
pub use extension::{AprsAntenna, AprsCourse, BearingAccuracy, Directivity, ReportQuality};
pub use lonlat::{Latitude, Longitude, Precision};
pub use message::AprsMessage;
pub use mic_e::MicEMessage;
pub use object::{EntityState, NamedEntity};
pub use packet::AprsPacket;
pub use position::AprsPosition;
pub use symbol::Symbol;
pub use telemetry::AprsTelemetry;
pub use timestamp::{TimeZone, Timestamp};
pub use via::{QConstruct, Via};
pub use weather::{StormCategory, WeatherReport};

/// Decodes a single APRS frame.
pub fn parse(b: &[u8]) -> Result<AprsPacket, ParseError> {
    AprsPacket::try_from(b).map_err(|error| ParseError::new(b, error))
}

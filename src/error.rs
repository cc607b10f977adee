#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
pub enum DecodeError {
    #[error("Could not parse the FROM callsign: {0:?}")]
    InvalidFrom(Vec<u8>),
    #[error("Could not parse the PATH: {0:?}")]
    InvalidPath(Vec<u8>),
    #[error("Non-UTF8 Callsign: {0:?}")]
    NonUtf8Callsign(Vec<u8>),
    #[error("Empty Callsign: {0:?}")]
    EmptyCallsign(String),
    #[error("Empty Callsign SSID: {0:?}")]
    EmptySsid(String),
    #[error("Unimplemented data type identifier '{}'", .0.escape_ascii())]
    UnimplementedDataType(u8, Vec<u8>),
    #[error("Data type identifier '{}' is not in the APRS spec or is reserved", .0.escape_ascii())]
    ReservedDataType(u8, Vec<u8>),
    #[error("Invalid Timestamp: {0:?}")]
    InvalidTimestamp(Vec<u8>),
    #[error("Invalid Position: {0:?}")]
    InvalidPosition(Vec<u8>),
    #[error("Invalid Latitude: {0:?}")]
    InvalidLatitude(Vec<u8>),
    #[error("Invalid Longitude: {0:?}")]
    InvalidLongitude(Vec<u8>),
    #[error("Invalid Mic-E destination address: {0:?}")]
    InvalidMicEDestination(String),
    #[error("Mic-E destination address must be 6 bytes long: {0:?}")]
    MicEDestinationLength(String),
    #[error("Invalid Mic-E information field: {0:?}")]
    InvalidMicEInformation(Vec<u8>),
    #[error("Invalid Object: {0:?}")]
    InvalidObject(Vec<u8>),
    #[error("Invalid Object state indicator: {0:?}")]
    InvalidObjectState(Vec<u8>),
    #[error("Invalid Item name: {0:?}")]
    InvalidItem(Vec<u8>),
    #[error("Invalid Message: {0:?}")]
    InvalidMessage(Vec<u8>),
    #[error("Invalid Telemetry report: {0:?}")]
    InvalidTelemetry(Vec<u8>),
    #[error("Telemetry digital value is not a bit string: {0:?}")]
    InvalidTelemetryBits(Vec<u8>),
    #[error("Invalid Telemetry channel value: {0:?}")]
    InvalidTelemetryValue(Vec<u8>),
    #[error("Invalid PHG extension: {0:?}")]
    InvalidPhg(Vec<u8>),
    #[error("Invalid DFS extension: {0:?}")]
    InvalidDfs(Vec<u8>),
    #[error("Non-UTF8 text in field {0}")]
    NonUtf8Text(&'static str),
}

impl DecodeError {
    /// The unconsumed remainder at the point of failure, when the variant
    /// carries one. Used to reconstruct the character position in the frame.
    pub fn remainder(&self) -> Option<&[u8]> {
        match self {
            DecodeError::InvalidFrom(r)
            | DecodeError::InvalidPath(r)
            | DecodeError::UnimplementedDataType(_, r)
            | DecodeError::ReservedDataType(_, r)
            | DecodeError::InvalidTimestamp(r)
            | DecodeError::InvalidPosition(r)
            | DecodeError::InvalidLatitude(r)
            | DecodeError::InvalidLongitude(r)
            | DecodeError::InvalidMicEInformation(r)
            | DecodeError::InvalidObject(r)
            | DecodeError::InvalidObjectState(r)
            | DecodeError::InvalidItem(r)
            | DecodeError::InvalidMessage(r)
            | DecodeError::InvalidTelemetry(r)
            | DecodeError::InvalidTelemetryBits(r)
            | DecodeError::InvalidTelemetryValue(r)
            | DecodeError::InvalidPhg(r)
            | DecodeError::InvalidDfs(r) => Some(r),
            _ => None,
        }
    }
}

/// Failure of a whole-frame parse. Carries the original frame, the
/// underlying decode error and the approximate byte offset it occurred at.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[error("{error} near character {near_character_position}")]
pub struct ParseError {
    pub raw: Vec<u8>,
    pub error: DecodeError,
    pub near_character_position: usize,
}

impl ParseError {
    pub(crate) fn new(raw: &[u8], error: DecodeError) -> Self {
        // The remainder carried by the error is a suffix of the frame
        // whenever decoding failed on live input rather than on a
        // reassembled field buffer.
        let near_character_position = match error.remainder() {
            Some(rem) if rem.len() <= raw.len() => (raw.len() - rem.len()).saturating_sub(1),
            _ => 0,
        };

        Self {
            raw: raw.to_owned(),
            error,
            near_character_position,
        }
    }
}

use crate::wire::WireType;

/// Errors that can occur while encoding or decoding parcel data.
#[derive(Debug, thiserror::Error)]
pub enum ParcelError {
    /// Fewer bytes remain than the wire type needs.
    #[error("not enough data to decode {wire_type} (needed {needed} bytes, {available} available)")]
    DecodeUnderrun {
        wire_type: WireType,
        needed: usize,
        available: usize,
    },

    /// The value cannot be encoded as the requested wire type.
    #[error("cannot encode {value} as {wire_type}")]
    Unencodable { wire_type: WireType, value: String },

    /// A string slot did not contain valid UTF-8.
    #[error("string slot is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// A textual literal could not be parsed as the requested wire type.
    #[error("invalid {wire_type} literal: {literal:?}")]
    InvalidLiteral { wire_type: WireType, literal: String },

    /// The reply contained no recognizable record-dump lines.
    #[error("service call failed: reply contained no parcel dump")]
    MalformedResponse,

    /// A record-dump line carried a hex run that does not decode.
    #[error("invalid hex in parcel dump line {line}: {source}")]
    InvalidHex {
        line: usize,
        source: hex::FromHexError,
    },
}

pub type Result<T> = std::result::Result<T, ParcelError>;

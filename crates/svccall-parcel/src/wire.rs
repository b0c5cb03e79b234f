use std::fmt;

use crate::error::{ParcelError, Result};

/// The closed set of parcel types the codec can marshal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// Schema placeholder; never carries data on the wire.
    Void,
    Int32,
    Int64,
    /// Stored in a 4-byte slot, nonzero is `true`.
    Bool,
    /// Variable width, single-byte length prefix.
    String,
}

/// A typed value read from or written to a parcel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParcelValue {
    Null,
    Int32(i32),
    Int64(i64),
    Bool(bool),
    String(String),
}

impl WireType {
    /// Byte width when fixed, `None` for variable-width types.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            WireType::Void => Some(0),
            WireType::Int32 => Some(4),
            WireType::Int64 => Some(8),
            WireType::Bool => Some(4),
            WireType::String => None,
        }
    }

    /// Short lowercase name used in diagnostics and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            WireType::Void => "void",
            WireType::Int32 => "int32",
            WireType::Int64 => "int64",
            WireType::Bool => "bool",
            WireType::String => "string",
        }
    }

    /// Decode one value from the front of `buf`.
    ///
    /// Returns the value and the number of bytes consumed.
    pub fn decode(self, buf: &[u8]) -> Result<(ParcelValue, usize)> {
        match self {
            WireType::Void => Ok((ParcelValue::Null, 0)),
            WireType::Int32 => Ok((ParcelValue::Int32(decode_int32(buf)?), 4)),
            WireType::Int64 => {
                let bytes = self.take::<8>(buf)?;
                Ok((ParcelValue::Int64(i64::from_le_bytes(bytes)), 8))
            }
            WireType::Bool => {
                let bytes = self.take::<4>(buf)?;
                Ok((ParcelValue::Bool(bytes != [0; 4]), 4))
            }
            WireType::String => decode_string(buf),
        }
    }

    /// Encode a value as `service call` argument tokens (type tag + literal).
    pub fn encode(self, value: &ParcelValue) -> Result<Vec<String>> {
        match (self, value) {
            (WireType::Void, _) => Ok(Vec::new()),
            (WireType::Int32, ParcelValue::Int32(v)) => Ok(vec!["i32".into(), v.to_string()]),
            (WireType::Int64, ParcelValue::Int64(v)) => Ok(vec!["i64".into(), v.to_string()]),
            (WireType::Bool, ParcelValue::Bool(v)) => {
                Ok(vec!["i32".into(), if *v { "1" } else { "0" }.into()])
            }
            (WireType::String, ParcelValue::String(v)) => Ok(vec!["s16".into(), v.clone()]),
            (wire_type, value) => Err(ParcelError::Unencodable {
                wire_type,
                value: value.to_string(),
            }),
        }
    }

    /// Parse a textual literal (e.g. from the command line) into a value of this type.
    ///
    /// `Void` accepts any literal and yields [`ParcelValue::Null`].
    pub fn parse_value(self, literal: &str) -> Result<ParcelValue> {
        let invalid = || ParcelError::InvalidLiteral {
            wire_type: self,
            literal: literal.to_string(),
        };
        match self {
            WireType::Void => Ok(ParcelValue::Null),
            WireType::Int32 => literal
                .trim()
                .parse()
                .map(ParcelValue::Int32)
                .map_err(|_| invalid()),
            WireType::Int64 => literal
                .trim()
                .parse()
                .map(ParcelValue::Int64)
                .map_err(|_| invalid()),
            WireType::Bool => match literal.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(ParcelValue::Bool(true)),
                "false" | "0" => Ok(ParcelValue::Bool(false)),
                _ => Err(invalid()),
            },
            WireType::String => Ok(ParcelValue::String(literal.to_string())),
        }
    }

    fn take<const N: usize>(self, buf: &[u8]) -> Result<[u8; N]> {
        buf.get(..N)
            .and_then(|slice| slice.try_into().ok())
            .ok_or(ParcelError::DecodeUnderrun {
                wire_type: self,
                needed: N,
                available: buf.len(),
            })
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// The first byte is the raw length `n`, the content is `buf[1..n-1]` and the
// slot occupies `n + 1` bytes. The bounds are kept exactly as observed on the
// remote side even though they look off by one.
fn decode_string(buf: &[u8]) -> Result<(ParcelValue, usize)> {
    let underrun = |needed| ParcelError::DecodeUnderrun {
        wire_type: WireType::String,
        needed,
        available: buf.len(),
    };

    let length = *buf.first().ok_or_else(|| underrun(1))? as usize;
    let consumed = length + 1;
    if consumed > buf.len() {
        return Err(underrun(consumed));
    }

    let content = if length >= 2 { &buf[1..length - 1] } else { &[][..] };
    let text = std::str::from_utf8(content)?;
    Ok((ParcelValue::String(text.to_string()), consumed))
}

/// Read one little-endian `int32` slot from the front of `buf`.
pub fn decode_int32(buf: &[u8]) -> Result<i32> {
    WireType::Int32.take::<4>(buf).map(i32::from_le_bytes)
}

/// Decode `types` in order from `buf`, each starting where the last ended.
pub fn decode_sequence(types: &[WireType], buf: &[u8]) -> Result<Vec<ParcelValue>> {
    let mut offset = 0usize;
    let mut values = Vec::with_capacity(types.len());
    for wire_type in types {
        let (value, consumed) = wire_type.decode(&buf[offset..])?;
        offset += consumed;
        values.push(value);
    }
    Ok(values)
}

impl ParcelValue {
    /// The wire type this value naturally encodes as.
    pub fn wire_type(&self) -> WireType {
        match self {
            ParcelValue::Null => WireType::Void,
            ParcelValue::Int32(_) => WireType::Int32,
            ParcelValue::Int64(_) => WireType::Int64,
            ParcelValue::Bool(_) => WireType::Bool,
            ParcelValue::String(_) => WireType::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParcelValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParcelValue::Int32(v) => Some(i64::from(*v)),
            ParcelValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParcelValue::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ParcelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParcelValue::Null => f.write_str("null"),
            ParcelValue::Int32(v) => write!(f, "{v}"),
            ParcelValue::Int64(v) => write!(f, "{v}"),
            ParcelValue::Bool(v) => write!(f, "{v}"),
            ParcelValue::String(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i32> for ParcelValue {
    fn from(value: i32) -> Self {
        ParcelValue::Int32(value)
    }
}

impl From<i64> for ParcelValue {
    fn from(value: i64) -> Self {
        ParcelValue::Int64(value)
    }
}

impl From<bool> for ParcelValue {
    fn from(value: bool) -> Self {
        ParcelValue::Bool(value)
    }
}

impl From<&str> for ParcelValue {
    fn from(value: &str) -> Self {
        ParcelValue::String(value.to_string())
    }
}

impl From<String> for ParcelValue {
    fn from(value: String) -> Self {
        ParcelValue::String(value)
    }
}

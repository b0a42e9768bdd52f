//! Hex and fixed-width byte conversions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    #[error("expected {expected} bytes, got {found}")]
    InvalidLength { expected: usize, found: usize },
    #[error("value {value:#x} does not fit in {width} bytes")]
    Overflow { value: u64, width: usize },
}

/// Decode a hex string, tolerating surrounding whitespace and a `0x` prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, CodecError> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| CodecError::InvalidHex(e.to_string()))
}

pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn to_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CodecError> {
    bytes.try_into().map_err(|_| CodecError::InvalidLength {
        expected: N,
        found: bytes.len(),
    })
}

/// Big-endian, zero-padded encoding of `value` into exactly `N` bytes.
pub fn be_fixed<const N: usize>(value: u64) -> Result<[u8; N], CodecError> {
    let full = value.to_be_bytes();
    let (high, low) = full.split_at(full.len().saturating_sub(N));
    if high.iter().any(|&b| b != 0) {
        return Err(CodecError::Overflow { value, width: N });
    }
    let mut out = [0u8; N];
    out[N - low.len()..].copy_from_slice(low);
    Ok(out)
}

/// A byte value supplied in one of the forms callers commonly hold it in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ByteInput {
    Number(u64),
    Hex(String),
    Bytes(Vec<u8>),
}

impl ByteInput {
    /// Raw bytes; numbers are rendered as their minimal big-endian form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        match self {
            ByteInput::Hex(s) => decode_hex(s),
            ByteInput::Bytes(b) => Ok(b.clone()),
            ByteInput::Number(n) => {
                let full = n.to_be_bytes();
                let skip = full.iter().take_while(|&&b| b == 0).count();
                Ok(full[skip.min(full.len() - 1)..].to_vec())
            }
        }
    }

    /// Exactly `N` bytes. Numbers are left-padded; hex and raw input must
    /// already have the right length.
    pub fn to_fixed<const N: usize>(&self) -> Result<[u8; N], CodecError> {
        match self {
            ByteInput::Number(n) => be_fixed::<N>(*n),
            other => to_array::<N>(&other.to_bytes()?),
        }
    }
}

impl From<&str> for ByteInput {
    fn from(s: &str) -> Self {
        ByteInput::Hex(s.to_string())
    }
}

impl From<Vec<u8>> for ByteInput {
    fn from(bytes: Vec<u8>) -> Self {
        ByteInput::Bytes(bytes)
    }
}

impl From<u64> for ByteInput {
    fn from(n: u64) -> Self {
        ByteInput::Number(n)
    }
}

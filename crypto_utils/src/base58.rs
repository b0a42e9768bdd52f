use crate::hash::sha256d;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58Error {
    #[error("invalid base58 character {0:?}")]
    InvalidCharacter(char),
    #[error("invalid base58 length")]
    InvalidLength,
    #[error("base58check checksum mismatch")]
    ChecksumMismatch,
}

pub const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const CHECKSUM_LEN: usize = 4;

/// Long division of a big-endian number given as `digits` in `radix` by
/// `divisor`. Returns the quotient (leading zeros dropped) and remainder.
fn long_divide(digits: &[u8], radix: u32, divisor: u32) -> (Vec<u8>, u32) {
    let mut quotient = Vec::with_capacity(digits.len());
    let mut remainder: u32 = 0;
    for &digit in digits {
        let acc = remainder * radix + digit as u32;
        let q = (acc / divisor) as u8;
        remainder = acc % divisor;
        if !quotient.is_empty() || q != 0 {
            quotient.push(q);
        }
    }
    (quotient, remainder)
}

/// Re-expresses a big-endian number from one radix in another. The result
/// is little-endian and empty for zero.
fn convert_radix(digits: &[u8], from: u32, to: u32) -> Vec<u8> {
    let mut out = Vec::new();
    let mut rest = digits.to_vec();
    while !rest.is_empty() {
        let (quotient, remainder) = long_divide(&rest, from, to);
        out.push(remainder as u8);
        rest = quotient;
    }
    out
}

pub fn base58_encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();
    let digits = convert_radix(&data[zeros..], 256, 58);

    let mut encoded = String::with_capacity(zeros + digits.len());
    encoded.extend(std::iter::repeat_n(BASE58_ALPHABET[0] as char, zeros));
    encoded.extend(digits.iter().rev().map(|&d| BASE58_ALPHABET[d as usize] as char));
    encoded
}

pub fn base58_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    if s.is_empty() {
        return Err(Base58Error::InvalidLength);
    }
    let digits = s
        .chars()
        .map(|c| {
            u8::try_from(c)
                .ok()
                .and_then(|b| BASE58_ALPHABET.iter().position(|&a| a == b))
                .map(|idx| idx as u8)
                .ok_or(Base58Error::InvalidCharacter(c))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    let zeros = digits.iter().take_while(|&&d| d == 0).count();
    let bytes = convert_radix(&digits[zeros..], 58, 256);

    let mut decoded = vec![0u8; zeros];
    decoded.extend(bytes.iter().rev());
    Ok(decoded)
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = sha256d(payload);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hash[..CHECKSUM_LEN]);
    out
}

/// Base58 of `payload ‖ SHA256d(payload)[..4]`.
pub fn base58_check_encode(payload: &[u8]) -> String {
    let mut extended = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    extended.extend_from_slice(payload);
    extended.extend_from_slice(&checksum(payload));
    base58_encode(&extended)
}

pub fn base58_check_decode(s: &str) -> Result<Vec<u8>, Base58Error> {
    let raw = base58_decode(s)?;
    if raw.len() < CHECKSUM_LEN {
        return Err(Base58Error::InvalidLength);
    }
    let (payload, check) = raw.split_at(raw.len() - CHECKSUM_LEN);
    if checksum(payload) != check {
        return Err(Base58Error::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

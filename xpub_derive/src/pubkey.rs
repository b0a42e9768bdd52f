use crate::error::{Result, XpubError};
use crypto_utils::{ByteInput, codec, hash::hash160};
use std::fmt;

pub const UNCOMPRESSED_LEN: usize = 65;
pub const COMPRESSED_LEN: usize = 33;

const UNCOMPRESSED_PREFIX: u8 = 0x04;
const EVEN_Y_PREFIX: u8 = 0x02;
const ODD_Y_PREFIX: u8 = 0x03;

/// SEC1 compressed public key: parity prefix followed by the X coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompressedPublicKey([u8; COMPRESSED_LEN]);

impl CompressedPublicKey {
    /// Compresses a 65-byte `04 ‖ X ‖ Y` key. The prefix is chosen from the
    /// parity of the last byte of Y; the point itself is not validated.
    pub fn from_uncompressed(field: &'static str, key: &[u8]) -> Result<Self> {
        if key.len() != UNCOMPRESSED_LEN {
            return Err(XpubError::InvalidPublicKeyFormat {
                field,
                reason: format!("expected {} bytes, got {}", UNCOMPRESSED_LEN, key.len()),
            });
        }
        if key[0] != UNCOMPRESSED_PREFIX {
            return Err(XpubError::InvalidPublicKeyFormat {
                field,
                reason: format!("expected 0x04 prefix, got {:#04x}", key[0]),
            });
        }
        let mut out = [0u8; COMPRESSED_LEN];
        out[0] = if key[UNCOMPRESSED_LEN - 1] & 1 == 0 {
            EVEN_Y_PREFIX
        } else {
            ODD_Y_PREFIX
        };
        out[1..].copy_from_slice(&key[1..33]);
        Ok(CompressedPublicKey(out))
    }

    /// Same as [`from_uncompressed`](Self::from_uncompressed) for hex, raw or
    /// numeric input.
    pub fn compress(field: &'static str, input: &ByteInput) -> Result<Self> {
        let bytes = input
            .to_bytes()
            .map_err(|e| XpubError::public_key(field, e))?;
        Self::from_uncompressed(field, &bytes)
    }

    /// Wraps bytes that are already in compressed form.
    pub fn from_compressed(bytes: [u8; COMPRESSED_LEN]) -> Result<Self> {
        match bytes[0] {
            EVEN_Y_PREFIX | ODD_Y_PREFIX => Ok(CompressedPublicKey(bytes)),
            _ => Err(XpubError::InvalidKeyData),
        }
    }

    pub fn as_bytes(&self) -> &[u8; COMPRESSED_LEN] {
        &self.0
    }

    /// HASH160 of the serialized key.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.0)
    }

    /// First 4 bytes of HASH160; identifies this key as a parent.
    pub fn fingerprint(&self) -> [u8; 4] {
        let mut fp = [0u8; 4];
        fp.copy_from_slice(&self.hash160()[..4]);
        fp
    }
}

impl fmt::Debug for CompressedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompressedPublicKey({})", self)
    }
}

impl fmt::Display for CompressedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::encode_hex(&self.0))
    }
}

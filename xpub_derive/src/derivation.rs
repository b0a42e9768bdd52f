use crate::{
    error::{Result, XpubError},
    extended_key::{ExtendedPubKey, HARDENED_OFFSET},
    pubkey::CompressedPublicKey,
};
use secp256k1::{All, Secp256k1};
use std::fmt;
use std::str::FromStr;

/// A BIP-32 derivation path (e.g., "m/44'/0'/0'" or "0/0").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivationPath(pub Vec<u32>);

impl FromStr for DerivationPath {
    type Err = XpubError;

    /// Parses "m/44'/0'/0'", "44h/0h/0h" or a relative "0/0". `m` alone is
    /// the empty path.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = |reason: String| XpubError::MalformedDerivationPath {
            path: s.to_string(),
            reason,
        };

        let trimmed = s.trim();
        let body = if trimmed.eq_ignore_ascii_case("m") {
            return Ok(DerivationPath::default());
        } else if let Some(stripped) = trimmed
            .strip_prefix("m/")
            .or_else(|| trimmed.strip_prefix("M/"))
        {
            stripped
        } else {
            trimmed
        };

        if body.is_empty() {
            return Ok(DerivationPath::default());
        }

        let mut indices = Vec::new();
        for part in body.split('/') {
            if part.is_empty() {
                return Err(malformed("empty segment".to_string()));
            }
            let (num_str, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
                Some(num) => (num, true),
                None => (part, false),
            };
            if num_str.is_empty() || !num_str.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed(format!("segment `{}` is not a number", part)));
            }
            let idx: u32 = num_str
                .parse()
                .ok()
                .filter(|&i| i < HARDENED_OFFSET)
                .ok_or_else(|| malformed(format!("index `{}` out of range", num_str)))?;
            indices.push(if hardened { idx | HARDENED_OFFSET } else { idx });
        }
        Ok(DerivationPath(indices))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "m");
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|&i| {
                if i >= HARDENED_OFFSET {
                    format!("{}'", i - HARDENED_OFFSET)
                } else {
                    i.to_string()
                }
            })
            .collect();
        write!(f, "m/{}", parts.join("/"))
    }
}

impl DerivationPath {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments, as stored in the extended key's depth byte.
    pub fn depth(&self) -> Result<u8> {
        u8::try_from(self.0.len()).map_err(|_| XpubError::MalformedDerivationPath {
            path: self.to_string(),
            reason: format!("{} segments exceed the maximum depth of 255", self.0.len()),
        })
    }

    /// The last index with its hardened bit, or 0 for the empty path.
    pub fn child_number(&self) -> u32 {
        self.0.last().copied().unwrap_or(0)
    }

    /// The first hardened segment, if any, without its hardened bit.
    pub fn first_hardened(&self) -> Option<u32> {
        self.0
            .iter()
            .find(|&&i| i >= HARDENED_OFFSET)
            .map(|&i| i - HARDENED_OFFSET)
    }

    /// Derive a public extended key along this path (non-hardened only).
    pub fn derive_public(
        &self,
        secp: &Secp256k1<All>,
        parent: &ExtendedPubKey,
    ) -> Result<ExtendedPubKey> {
        if let Some(index) = self.first_hardened() {
            return Err(XpubError::HardenedDerivationUnsupported { index });
        }
        let mut key = parent.clone();
        for &index in &self.0 {
            key = key.derive_public_child(secp, index)?;
            log::trace!("derived child {} at depth {}", index, key.depth);
        }
        Ok(key)
    }
}

/// Elliptic-curve child key derivation from public data.
pub trait PublicDerivation {
    fn derive_public_key(
        &self,
        parent: &ExtendedPubKey,
        path: &DerivationPath,
    ) -> Result<CompressedPublicKey>;
}

/// [`PublicDerivation`] backed by libsecp256k1.
pub struct Secp256k1Derivation {
    secp: Secp256k1<All>,
}

impl Secp256k1Derivation {
    pub fn new() -> Self {
        Secp256k1Derivation {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for Secp256k1Derivation {
    fn default() -> Self {
        Self::new()
    }
}

impl PublicDerivation for Secp256k1Derivation {
    fn derive_public_key(
        &self,
        parent: &ExtendedPubKey,
        path: &DerivationPath,
    ) -> Result<CompressedPublicKey> {
        Ok(path.derive_public(&self.secp, parent)?.public_key)
    }
}

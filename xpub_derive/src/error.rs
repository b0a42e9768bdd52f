use crypto_utils::{Base58Error, CodecError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XpubError {
    #[error("invalid public key in `{field}`: {reason}")]
    InvalidPublicKeyFormat { field: &'static str, reason: String },
    #[error("unsupported network `{0}`")]
    UnsupportedNetwork(String),
    #[error("malformed derivation path `{path}`: {reason}")]
    MalformedDerivationPath { path: String, reason: String },
    #[error("cannot derive hardened child {index}' from public data")]
    HardenedDerivationUnsupported { index: u32 },
    #[error("base58check checksum mismatch")]
    ChecksumMismatch,
    #[error("network `{0}` does not support segwit addresses")]
    SegwitUnsupported(String),
    #[error("invalid chain code: {0}")]
    InvalidChainCode(String),
    #[error("invalid base58 character {0:?}")]
    InvalidBase58(char),
    #[error("invalid extended key length")]
    InvalidLength,
    #[error("extended key version {found:08x} does not match network version {expected:08x}")]
    InvalidVersion { expected: u32, found: u32 },
    #[error("invalid extended key data")]
    InvalidKeyData,
    #[error("invalid child key")]
    InvalidChildKey,
    #[error("invalid network table: {0}")]
    InvalidNetworkTable(String),
}

pub type Result<T> = std::result::Result<T, XpubError>;

impl From<Base58Error> for XpubError {
    fn from(e: Base58Error) -> Self {
        match e {
            Base58Error::ChecksumMismatch => XpubError::ChecksumMismatch,
            Base58Error::InvalidLength => XpubError::InvalidLength,
            Base58Error::InvalidCharacter(c) => XpubError::InvalidBase58(c),
        }
    }
}

impl XpubError {
    pub(crate) fn public_key(field: &'static str, e: CodecError) -> Self {
        XpubError::InvalidPublicKeyFormat {
            field,
            reason: e.to_string(),
        }
    }
}

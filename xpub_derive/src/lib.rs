//! Watch-only BIP32 key export.
//!
//! Turns the public key, chain code and parent public key reported by a
//! hardware signer into a Base58Check extended public key, and derives
//! P2PKH or P2SH-P2WPKH receiving addresses from such a key. Private keys
//! never pass through this crate.

pub mod address;
pub mod derivation;
pub mod error;
pub mod extended_key;
pub mod network;
pub mod pubkey;
pub mod xpub;

pub use address::{AddressKind, AddressRequest, derive_address, encode_address};
pub use derivation::{DerivationPath, PublicDerivation, Secp256k1Derivation};
pub use error::{Result, XpubError};
pub use extended_key::{ExtendedPubKey, HARDENED_OFFSET};
pub use network::{NetworkParams, NetworkRegistry};
pub use pubkey::CompressedPublicKey;
pub use xpub::{XpubRequest, build_xpub, derive_xpub};

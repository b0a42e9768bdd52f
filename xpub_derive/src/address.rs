//! Receiving addresses from an account xpub.

use crate::{
    derivation::{DerivationPath, PublicDerivation},
    error::{Result, XpubError},
    extended_key::ExtendedPubKey,
    network::{NetworkParams, NetworkRegistry},
    pubkey::CompressedPublicKey,
};
use crypto_utils::{base58, hash::hash160};
use serde::{Deserialize, Serialize};

/// OP_0 followed by a 20-byte push.
const P2WPKH_PREFIX: [u8; 2] = [0x00, 0x14];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// Pay-to-Pubkey-Hash
    P2pkh,
    /// P2WPKH nested in P2SH
    P2shP2wpkh,
}

impl AddressKind {
    pub fn from_segwit_flag(is_segwit: bool) -> Self {
        if is_segwit {
            AddressKind::P2shP2wpkh
        } else {
            AddressKind::P2pkh
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub symbol: String,
    pub xpub: String,
    /// Path relative to the xpub, e.g. "0/0".
    pub path: String,
    #[serde(default)]
    pub is_segwit: bool,
}

/// Version-0 witness program for `key`: `0x00 0x14 ‖ HASH160(key)`.
pub fn p2wpkh_witness_program(key: &CompressedPublicKey) -> [u8; 22] {
    let mut program = [0u8; 22];
    program[..2].copy_from_slice(&P2WPKH_PREFIX);
    program[2..].copy_from_slice(&key.hash160());
    program
}

/// The address version byte `kind` needs on `network`.
fn address_version(network: &NetworkParams, kind: AddressKind) -> Result<u8> {
    match kind {
        AddressKind::P2pkh => network
            .pub_key_hash_version
            .ok_or_else(|| XpubError::UnsupportedNetwork(network.symbol.clone())),
        AddressKind::P2shP2wpkh => {
            if !network.segwit_supported {
                return Err(XpubError::SegwitUnsupported(network.symbol.clone()));
            }
            network
                .script_hash_version
                .ok_or_else(|| XpubError::UnsupportedNetwork(network.symbol.clone()))
        }
    }
}

/// Base58Check address for `key`.
pub fn encode_address(
    network: &NetworkParams,
    key: &CompressedPublicKey,
    kind: AddressKind,
) -> Result<String> {
    let version = address_version(network, kind)?;
    Ok(encode_with_version(version, key, kind))
}

fn encode_with_version(version: u8, key: &CompressedPublicKey, kind: AddressKind) -> String {
    let hash = match kind {
        AddressKind::P2pkh => key.hash160(),
        AddressKind::P2shP2wpkh => hash160(&p2wpkh_witness_program(key)),
    };
    let mut payload = Vec::with_capacity(1 + hash.len());
    payload.push(version);
    payload.extend_from_slice(&hash);
    base58::base58_check_encode(&payload)
}

/// Derive the address at `request.path` below `request.xpub`.
pub fn derive_address<D>(
    registry: &NetworkRegistry,
    deriver: &D,
    request: &AddressRequest,
) -> Result<String>
where
    D: PublicDerivation + ?Sized,
{
    let network = registry.get(&request.symbol)?;
    let kind = AddressKind::from_segwit_flag(request.is_segwit);
    let version = address_version(network, kind)?;

    let path: DerivationPath = request.path.parse()?;
    if path.is_empty() {
        return Err(XpubError::MalformedDerivationPath {
            path: request.path.clone(),
            reason: "path has no segments".to_string(),
        });
    }
    if let Some(index) = path.first_hardened() {
        return Err(XpubError::HardenedDerivationUnsupported { index });
    }
    let xpub = ExtendedPubKey::from_base58(&request.xpub, network.xpub_version)?;
    let key = deriver.derive_public_key(&xpub, &path)?;

    let address = encode_with_version(version, &key, kind);
    log::debug!(
        "derived {} {:?} address at {}",
        network.symbol,
        kind,
        path
    );
    Ok(address)
}

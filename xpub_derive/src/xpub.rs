//! Building an xpub from what a hardware signer reports for a path.

use crate::{
    derivation::DerivationPath,
    error::{Result, XpubError},
    extended_key::ExtendedPubKey,
    network::NetworkRegistry,
    pubkey::CompressedPublicKey,
};
use crypto_utils::ByteInput;
use serde::{Deserialize, Serialize};

/// Public material for the key at `derivation_path` and for its parent.
/// Keys are uncompressed (65 bytes, `04` prefix).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpubRequest {
    pub symbol: String,
    pub derivation_path: String,
    pub pub_key: ByteInput,
    pub chain_code: ByteInput,
    pub parent_pub_key: ByteInput,
}

/// Assemble the extended public key described by `request`.
pub fn build_xpub(registry: &NetworkRegistry, request: &XpubRequest) -> Result<ExtendedPubKey> {
    let network = registry.get(&request.symbol)?;

    let path: DerivationPath = request.derivation_path.parse()?;
    if path.is_empty() {
        return Err(XpubError::MalformedDerivationPath {
            path: request.derivation_path.clone(),
            reason: "path has no segments".to_string(),
        });
    }
    let depth = path.depth()?;

    let parent = CompressedPublicKey::compress("parentPubKey", &request.parent_pub_key)?;
    let public_key = CompressedPublicKey::compress("pubKey", &request.pub_key)?;
    let chain_code = request
        .chain_code
        .to_fixed::<32>()
        .map_err(|e| XpubError::InvalidChainCode(e.to_string()))?;

    Ok(ExtendedPubKey {
        version: network.xpub_version,
        depth,
        parent_fingerprint: parent.fingerprint(),
        child_number: path.child_number(),
        chain_code,
        public_key,
    })
}

/// Base58Check xpub string for `request`.
pub fn derive_xpub(registry: &NetworkRegistry, request: &XpubRequest) -> Result<String> {
    let xpub = build_xpub(registry, request)?.to_base58();
    log::debug!(
        "derived {} xpub for path {}",
        request.symbol,
        request.derivation_path
    );
    Ok(xpub)
}

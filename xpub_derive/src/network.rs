//! Per-network version bytes, looked up by ticker symbol.
//!
//! A [`NetworkRegistry`] is an ordinary value: build it once (from the
//! built-in table, from JSON, or by hand) and pass it to the derivation
//! functions. Lookups are case-insensitive.

use crate::error::{Result, XpubError};
use crypto_utils::ByteInput;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    pub symbol: String,
    /// 4-byte BIP32 public version magic; decides the xpub string prefix.
    pub xpub_version: [u8; 4],
    /// P2PKH address version. `None` if the network has no legacy addresses.
    pub pub_key_hash_version: Option<u8>,
    /// P2SH address version, used for segwit-wrapped addresses.
    pub script_hash_version: Option<u8>,
    pub segwit_supported: bool,
}

impl NetworkParams {
    pub fn new(
        symbol: &str,
        xpub_version: u32,
        pub_key_hash_version: u8,
        script_hash_version: u8,
        segwit_supported: bool,
    ) -> Self {
        NetworkParams {
            symbol: symbol.to_string(),
            xpub_version: xpub_version.to_be_bytes(),
            pub_key_hash_version: Some(pub_key_hash_version),
            script_hash_version: Some(script_hash_version),
            segwit_supported,
        }
    }

    pub fn xpub_version_u32(&self) -> u32 {
        u32::from_be_bytes(self.xpub_version)
    }
}

/// JSON shape of a network table entry. Version fields accept a number,
/// a hex string, or a byte array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkEntry {
    symbol: String,
    xpub_version: ByteInput,
    #[serde(default)]
    pub_key_hash_version: Option<ByteInput>,
    #[serde(default)]
    script_hash_version: Option<ByteInput>,
    #[serde(default)]
    segwit_supported: bool,
}

impl TryFrom<NetworkEntry> for NetworkParams {
    type Error = XpubError;

    fn try_from(entry: NetworkEntry) -> Result<Self> {
        let field_err = |field: &str, e: crypto_utils::CodecError| {
            XpubError::InvalidNetworkTable(format!("{}.{}: {}", entry.symbol, field, e))
        };
        let xpub_version = entry
            .xpub_version
            .to_fixed::<4>()
            .map_err(|e| field_err("xpubVersion", e))?;
        let pub_key_hash_version = entry
            .pub_key_hash_version
            .as_ref()
            .map(|v| v.to_fixed::<1>().map(|[b]| b))
            .transpose()
            .map_err(|e| field_err("pubKeyHashVersion", e))?;
        let script_hash_version = entry
            .script_hash_version
            .as_ref()
            .map(|v| v.to_fixed::<1>().map(|[b]| b))
            .transpose()
            .map_err(|e| field_err("scriptHashVersion", e))?;
        Ok(NetworkParams {
            symbol: entry.symbol,
            xpub_version,
            pub_key_hash_version,
            script_hash_version,
            segwit_supported: entry.segwit_supported,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    networks: HashMap<String, NetworkParams>,
}

impl NetworkRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table: BTC, BTC_TESTNET, LTC, DOGE, DASH and BCH.
    pub fn builtin() -> Self {
        [
            NetworkParams::new("BTC", 0x0488_B21E, 0x00, 0x05, true),
            NetworkParams::new("BTC_TESTNET", 0x0435_87CF, 0x6F, 0xC4, true),
            NetworkParams::new("LTC", 0x019D_A462, 0x30, 0x32, true),
            NetworkParams::new("DOGE", 0x02FA_CAFD, 0x1E, 0x16, false),
            NetworkParams::new("DASH", 0x02FE_52F8, 0x4C, 0x10, false),
            NetworkParams::new("BCH", 0x0488_B21E, 0x00, 0x05, false),
        ]
        .into_iter()
        .fold(Self::new(), Self::with_network)
    }

    /// Adds `params`, replacing any entry with the same symbol.
    pub fn with_network(mut self, params: NetworkParams) -> Self {
        let key = params.symbol.to_ascii_uppercase();
        if self.networks.contains_key(&key) {
            log::warn!("network {} overrides an existing entry", params.symbol);
        }
        self.networks.insert(key, params);
        self
    }

    /// Parses a JSON array of network entries, e.g.
    /// `[{"symbol": "BTC", "xpubVersion": "0488b21e", "pubKeyHashVersion": 0,
    /// "scriptHashVersion": 5, "segwitSupported": true}]`.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<NetworkEntry> = serde_json::from_str(json)
            .map_err(|e| XpubError::InvalidNetworkTable(e.to_string()))?;
        let mut registry = Self::new();
        for entry in entries {
            let params = NetworkParams::try_from(entry)?;
            let key = params.symbol.to_ascii_uppercase();
            if registry.networks.contains_key(&key) {
                return Err(XpubError::InvalidNetworkTable(format!(
                    "duplicate symbol {}",
                    params.symbol
                )));
            }
            registry.networks.insert(key, params);
        }
        Ok(registry)
    }

    pub fn get(&self, symbol: &str) -> Result<&NetworkParams> {
        self.networks
            .get(&symbol.to_ascii_uppercase())
            .ok_or_else(|| XpubError::UnsupportedNetwork(symbol.to_string()))
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

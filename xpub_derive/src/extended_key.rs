use crate::{
    error::{Result, XpubError},
    pubkey::CompressedPublicKey,
};
use crypto_utils::{base58, hmac::hmac_sha512};
use secp256k1::{All, PublicKey, Secp256k1, SecretKey};
use std::fmt;

/// Index offset for hardened children (index >= 0x80000000) i.e., 0x80000000 = 2³¹
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// version (4) | depth (1) | parent_fp (4) | child_number (4) | chain_code (32) | key (33)
pub const EXTENDED_KEY_LEN: usize = 78;

/// Extended public key (xpub)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPubKey {
    pub version: [u8; 4],
    pub depth: u8,
    pub parent_fingerprint: [u8; 4],
    pub child_number: u32,
    pub chain_code: [u8; 32],
    pub public_key: CompressedPublicKey,
}

impl ExtendedPubKey {
    /// Fingerprint of this key, as recorded in its children.
    pub fn fingerprint(&self) -> [u8; 4] {
        self.public_key.fingerprint()
    }

    /// The 78-byte serialization; every integer is fixed-width big-endian.
    pub fn to_bytes(&self) -> [u8; EXTENDED_KEY_LEN] {
        let mut payload = [0u8; EXTENDED_KEY_LEN];
        payload[0..4].copy_from_slice(&self.version);
        payload[4] = self.depth;
        payload[5..9].copy_from_slice(&self.parent_fingerprint);
        payload[9..13].copy_from_slice(&self.child_number.to_be_bytes());
        payload[13..45].copy_from_slice(&self.chain_code);
        payload[45..].copy_from_slice(self.public_key.as_bytes());
        payload
    }

    /// Serialize to Base58Check. The prefix ("xpub", "Ltub", ...) follows
    /// from the version bytes alone.
    pub fn to_base58(&self) -> String {
        base58::base58_check_encode(&self.to_bytes())
    }

    /// Parse a 78-byte payload whose version must equal `expected_version`.
    pub fn from_bytes(data: &[u8], expected_version: [u8; 4]) -> Result<Self> {
        if data.len() != EXTENDED_KEY_LEN {
            return Err(XpubError::InvalidLength);
        }
        let mut version = [0u8; 4];
        version.copy_from_slice(&data[0..4]);
        if version != expected_version {
            return Err(XpubError::InvalidVersion {
                expected: u32::from_be_bytes(expected_version),
                found: u32::from_be_bytes(version),
            });
        }
        let depth = data[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let mut child_number = [0u8; 4];
        child_number.copy_from_slice(&data[9..13]);
        let child_number = u32::from_be_bytes(child_number);
        if depth == 0 && (parent_fingerprint != [0u8; 4] || child_number != 0) {
            return Err(XpubError::InvalidChildKey);
        }
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);

        // Key bytes must be a compressed point on the curve.
        if data[45] != 0x02 && data[45] != 0x03 {
            return Err(XpubError::InvalidKeyData);
        }
        let point = PublicKey::from_slice(&data[45..]).map_err(|_| XpubError::InvalidKeyData)?;
        let public_key = CompressedPublicKey::from_compressed(point.serialize())?;

        Ok(ExtendedPubKey {
            version,
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            public_key,
        })
    }

    /// Deserialize an xpub from a Base58Check string
    pub fn from_base58(s: &str, expected_version: [u8; 4]) -> Result<Self> {
        let data = base58::base58_check_decode(s.trim())?;
        Self::from_bytes(&data, expected_version)
    }

    /// Derive a child public key for non-hardened indices (CKDpub)
    pub fn derive_public_child(&self, secp: &Secp256k1<All>, index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(XpubError::HardenedDerivationUnsupported {
                index: index - HARDENED_OFFSET,
            });
        }

        // I = HMAC-SHA512(chain_code, serP(K) || ser32(i))
        let i = hmac_sha512(
            &self.chain_code,
            &[&self.public_key.as_bytes()[..], &index.to_be_bytes()[..]],
        );
        let (il, ir) = i.split_at(32);

        // Child public key: G*IL + parent_pub
        let parent_point =
            PublicKey::from_slice(self.public_key.as_bytes()).map_err(|_| XpubError::InvalidKeyData)?;
        let tweak = SecretKey::from_slice(il).map_err(|_| XpubError::InvalidChildKey)?;
        let child_point = parent_point
            .combine(&PublicKey::from_secret_key(secp, &tweak))
            .map_err(|_| XpubError::InvalidChildKey)?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(ir);
        let depth = self.depth.checked_add(1).ok_or(XpubError::InvalidChildKey)?;

        Ok(ExtendedPubKey {
            version: self.version,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_number: index,
            chain_code,
            public_key: CompressedPublicKey::from_compressed(child_point.serialize())?,
        })
    }
}

impl fmt::Display for ExtendedPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::DerivationPath;
    use hex_literal::hex;

    const XPUB: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

    fn parse(s: &str) -> ExtendedPubKey {
        ExtendedPubKey::from_base58(s, XPUB).unwrap()
    }

    /// BIP32 test vector 1, chain m
    #[test]
    fn decode_master_fields() {
        let m = parse(
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8",
        );
        assert_eq!(m.depth, 0);
        assert_eq!(m.parent_fingerprint, [0u8; 4]);
        assert_eq!(m.child_number, 0);
        assert_eq!(
            m.chain_code,
            hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508")
        );
        assert_eq!(
            m.public_key.as_bytes(),
            &hex!("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2")
        );
        assert_eq!(m.fingerprint(), hex!("3442193e"));
    }

    #[test]
    fn payload_layout() {
        let key = ExtendedPubKey {
            version: [0x01, 0x9D, 0xA4, 0x62],
            depth: 3,
            parent_fingerprint: [0xde, 0xad, 0xbe, 0xef],
            child_number: HARDENED_OFFSET | 7,
            chain_code: [0x11; 32],
            public_key: CompressedPublicKey::from_compressed([0x02; 33]).unwrap(),
        };
        let bytes = key.to_bytes();
        assert_eq!(bytes.len(), EXTENDED_KEY_LEN);
        assert_eq!(&bytes[0..4], &[0x01, 0x9D, 0xA4, 0x62]);
        assert_eq!(bytes[4], 3);
        assert_eq!(&bytes[5..9], &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(&bytes[9..13], &[0x80, 0x00, 0x00, 0x07]);
        assert_eq!(&bytes[13..45], &[0x11; 32]);
        assert_eq!(&bytes[45..], &[0x02; 33]);
        assert!(key.to_base58().starts_with("Ltub"));
    }

    #[test]
    fn roundtrip_vectors() {
        for s in [
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8",
            "xpub6D4BDPcP2GT577Vvch3R8wDkScZWzQzMMUm3PWbmWvVJrZwQY4VUNgqFJPMM3No2dFDFGTsxxpG5uJh7n7epu4trkrX7x7DogT5Uv6fcLW5",
            "xpub6FnCn6nSzZAw5Tw7cgR9bi15UV96gLZhjDstkXXxvCLsUXBGXPdSnLFbdpq8p9HmGsApME5hQTZ3emM2rnY5agb9rXpVGyy3bdW6EEgAtqt",
        ] {
            assert_eq!(parse(s).to_base58(), s);
        }
    }

    /// BIP32 test vectors 1 and 2, non-hardened steps.
    #[test]
    fn public_child_derivation() {
        let secp = Secp256k1::new();
        let cases = [
            (
                "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw",
                1,
                "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ",
            ),
            (
                "xpub6FHa3pjLCk84BayeJxFW2SP4XRrFd1JYnxeLeU8EqN3vDfZmbqBqaGJAyiLjTAwm6ZLRQUMv1ZACTj37sR62cfN7fe5JnJ7dh8zL4fiyLHV",
                1000000000,
                "xpub6H1LXWLaKsWFhvm6RVpEL9P4KfRZSW7abD2ttkWP3SSQvnyA8FSVqNTEcYFgJS2UaFcxupHiYkro49S8yGasTvXEYBVPamhGW6cFJodrTHy",
            ),
            (
                "xpub661MyMwAqRbcFW31YEwpkMuc5THy2PSt5bDMsktWQcFF8syAmRUapSCGu8ED9W6oDMSgv6Zz8idoc4a6mr8BDzTJY47LJhkJ8UB7WEGuduB",
                0,
                "xpub69H7F5d8KSRgmmdJg2KhpAK8SR3DjMwAdkxj3ZuxV27CprR9LgpeyGmXUbC6wb7ERfvrnKZjXoUmmDznezpbZb7ap6r1D3tgFxHmwMkQTPH",
            ),
        ];
        for (parent, index, expected) in cases {
            let parent = parse(parent);
            let child = parent.derive_public_child(&secp, index).unwrap();
            assert_eq!(child.to_base58(), expected);
            assert_eq!(child.depth, parent.depth + 1);
            assert_eq!(child.parent_fingerprint, parent.fingerprint());
            assert_eq!(child.child_number, index);
        }
    }

    #[test]
    fn derive_along_path() {
        let secp = Secp256k1::new();
        let parent = parse(
            "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw",
        );
        let path: DerivationPath = "1".parse().unwrap();
        assert_eq!(
            path.derive_public(&secp, &parent).unwrap().to_base58(),
            "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ"
        );
        assert_eq!(
            DerivationPath::default().derive_public(&secp, &parent).unwrap(),
            parent
        );
    }

    #[test]
    fn hardened_on_xpub() {
        let secp = Secp256k1::new();
        let xpub = parse(
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8",
        );
        assert_eq!(
            xpub.derive_public_child(&secp, HARDENED_OFFSET + 5).unwrap_err(),
            XpubError::HardenedDerivationUnsupported { index: 5 }
        );
        let path: DerivationPath = "0/1'/2".parse().unwrap();
        assert_eq!(
            path.derive_public(&secp, &xpub).unwrap_err(),
            XpubError::HardenedDerivationUnsupported { index: 1 }
        );
    }

    struct Case<'a> {
        key: &'a str,
        expected: XpubError,
    }

    /// BIP32 Test vector 5
    #[test]
    fn invalid_xpubs() {
        let cases = [
            // pubkey version / prvkey mismatch
            Case {
                key: "xpub661MyMwAqRbcEYS8w7XLSVeEsBXy79zSzH1J8vCdxAZningWLdN3zgtU6LBpB85b3D2yc8sfvZU521AAwdZafEz7mnzBBsz4wKY5fTtTQBm",
                expected: XpubError::InvalidKeyData,
            },
            // invalid pubkey prefix 04
            Case {
                key: "xpub661MyMwAqRbcEYS8w7XLSVeEsBXy79zSzH1J8vCdxAZningWLdN3zgtU6Txnt3siSujt9RCVYsx4qHZGc62TG4McvMGcAUjeuwZdduYEvFn",
                expected: XpubError::InvalidKeyData,
            },
            // zero depth with non-zero parent fingerprint
            Case {
                key: "xpub661no6RGEX3uJkY4bNnPcw4URcQTrSibUZ4NqJEw5eBkv7ovTwgiT91XX27VbEXGENhYRCf7hyEbWrR3FewATdCEebj6znwMfQkhRYHRLpJ",
                expected: XpubError::InvalidChildKey,
            },
            // zero depth with non-zero index
            Case {
                key: "xpub661MyMwAuDcm6CRQ5N4qiHKrJ39Xe1R1NyfouMKTTWcguwVcfrZJaNvhpebzGerh7gucBvzEQWRugZDuDXjNDRmXzSZe4c7mnTK97pTvGS8",
                expected: XpubError::InvalidChildKey,
            },
            // invalid pubkey 020000000000000000000000000000000000000000000000000000000000000007
            Case {
                key: "xpub661MyMwAqRbcEYS8w7XLSVeEsBXy79zSzH1J8vCdxAZningWLdN3zgtU6Q5JXayek4PRsn35jii4veMimro1xefsM58PgBMrvdYre8QyULY",
                expected: XpubError::InvalidKeyData,
            },
        ];

        for case in &cases {
            let err = ExtendedPubKey::from_base58(case.key, XPUB).unwrap_err();
            assert_eq!(
                err, case.expected,
                "xpub=\"{}\" returned {:?}, expected {:?}",
                case.key, err, case.expected
            );
        }
    }

    #[test]
    fn version_mismatch() {
        let s = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";
        assert_eq!(
            ExtendedPubKey::from_base58(s, [0x04, 0x35, 0x87, 0xCF]).unwrap_err(),
            XpubError::InvalidVersion {
                expected: 0x0435_87CF,
                found: 0x0488_B21E
            }
        );
    }

    #[test]
    fn base58_errors() {
        assert_eq!(
            ExtendedPubKey::from_base58("", XPUB).unwrap_err(),
            XpubError::InvalidLength
        );
        assert_eq!(
            ExtendedPubKey::from_base58("0", XPUB).unwrap_err(),
            XpubError::InvalidBase58('0')
        );
        let mut bad = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8".to_string();
        bad.pop();
        bad.push('9');
        assert_eq!(
            ExtendedPubKey::from_base58(&bad, XPUB).unwrap_err(),
            XpubError::ChecksumMismatch
        );
        // valid checksum, wrong payload length
        let short = base58::base58_check_encode(&[0x04, 0x88, 0xB2, 0x1E, 0x00]);
        assert_eq!(
            ExtendedPubKey::from_base58(&short, XPUB).unwrap_err(),
            XpubError::InvalidLength
        );
    }
}

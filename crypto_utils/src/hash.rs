use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

pub fn sha256(input: &[u8]) -> [u8; 32] {
    Sha256::digest(input).into()
}

/// SHA256(SHA256(input)), the Base58Check checksum hash.
pub fn sha256d(input: &[u8]) -> [u8; 32] {
    sha256(&sha256(input))
}

pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    Ripemd160::digest(input).into()
}

/// RIPEMD160(SHA256(input)). Identifies keys and scripts.
pub fn hash160(input: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_empty() {
        let expected = hex!(
            "e3b0c44298fc1c149afbf4c8996fb924"
            "27ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(sha256(b""), expected);
    }

    #[test]
    fn sha256_abc() {
        let expected = hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(sha256(b"abc"), expected);
    }

    #[test]
    fn sha256d_empty() {
        let expected = hex!("5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456");
        assert_eq!(sha256d(b""), expected);
    }

    #[test]
    fn sha256d_hello() {
        let expected = hex!("9595c9df90075148eb06860365df33584b75bff782a510c6cd4883a419833d50");
        assert_eq!(sha256d(b"hello"), expected);
    }

    #[test]
    fn ripemd160_empty() {
        let expected = hex!("9c1185a5c5e9fc54612808977ee8f548b2258d31");
        assert_eq!(ripemd160(b""), expected);
    }

    #[test]
    fn ripemd160_quick_brown() {
        let expected = hex!("37f332f68db77bd9d7edd4969571ad671cf9dd3b");
        assert_eq!(
            ripemd160(b"The quick brown fox jumps over the lazy dog"),
            expected
        );
    }

    /// BIP32 test vector 1, master key identifier.
    #[test]
    fn hash160_bip32_master_identifier() {
        let pubkey = hex!("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2");
        let expected = hex!("3442193e1bb70916e914552172cd4e2dbc9df811");
        assert_eq!(hash160(&pubkey), expected);
    }

    #[test]
    fn hash160_is_ripemd_of_sha() {
        let data = b"watch-only";
        assert_eq!(hash160(data), ripemd160(&sha256(data)));
    }
}

use sha2::{Digest, Sha256};

/// One-way payload digest.
///
/// Produces the lowercase hex SHA-256 of the payload bytes, the same value
/// the ledger has always stored in `data_hash`, so digests of existing
/// records remain comparable.
pub struct PayloadHasher;

impl PayloadHasher {
    /// Width of every digest in hex characters.
    pub const HEX_LEN: usize = 64;

    /// Hex-encoded digest of `payload`.
    pub fn digest(payload: &str) -> String {
        hex::encode(Self::raw(payload.as_bytes()))
    }

    /// Raw 32-byte digest of arbitrary bytes.
    pub fn raw(data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_vector() {
        assert_eq!(
            PayloadHasher::digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn empty_input_still_hashes() {
        assert_eq!(
            PayloadHasher::digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    proptest! {
        #[test]
        fn digest_is_deterministic_and_fixed_width(payload in ".{0,256}") {
            let first = PayloadHasher::digest(&payload);
            let second = PayloadHasher::digest(&payload);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.len(), PayloadHasher::HEX_LEN);
            prop_assert!(first.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        }
    }
}

//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical unsigned encoding and the block hash so
//! that independent node implementations can check interoperability.

use bytes::Bytes;
use chainhead_core::{encode_unsigned, hash160, Hash256, UnsignedHeader, WinnerType};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// The header under test.
    pub header: UnsignedHeader,
    /// Expected canonical bytes (hex), when pinned.
    pub expected_bytes: Option<&'static str>,
    /// Expected block hash (hex).
    pub expected_hash: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "height 100 with 20-byte signer",
            header: UnsignedHeader {
                version: 0,
                prev_block_hash: Hash256::ZERO,
                transactions_root: Hash256::ZERO,
                state_root: Hash256::ZERO,
                timestamp: 1_600_000_000,
                height: 100,
                winner_type: WinnerType::GENESIS_SIGNER,
                signer: Bytes::from((0u8..20).collect::<Vec<u8>>()),
                chord_id: Bytes::new(),
                ..UnsignedHeader::default()
            },
            expected_bytes: Some(concat!(
                "00000000",
                "20",
                "0000000000000000000000000000000000000000000000000000000000000000",
                "20",
                "0000000000000000000000000000000000000000000000000000000000000000",
                "20",
                "0000000000000000000000000000000000000000000000000000000000000000",
                "00105e5f00000000",
                "64000000",
                "00000000",
                "14",
                "000102030405060708090a0b0c0d0e0f10111213",
                "00",
            )),
            expected_hash: "360d339a4d4bb2530264c8ff64baf261992e33612afd339a778cd30b54d748f2",
        },
        GoldenVector {
            name: "maximum widths with 3-byte length prefix",
            header: UnsignedHeader {
                version: u32::MAX,
                prev_block_hash: Hash256::from_bytes([0x11; 32]),
                transactions_root: Hash256::from_bytes([0x22; 32]),
                state_root: Hash256::from_bytes([0x33; 32]),
                timestamp: -1,
                height: u32::MAX,
                winner_type: WinnerType::BLOCK_SIGNER,
                signer: Bytes::from(vec![0xab; 300]),
                chord_id: Bytes::from_static(&[1, 2, 3, 4]),
                ..UnsignedHeader::default()
            },
            expected_bytes: None,
            expected_hash: "20dff1c7aec7eb9a97ce1f58e302c0e27f4f6dd3d35548d15e81703a3ad4211c",
        },
    ]
}

/// Program code whose Hash160 is pinned: `0x20 || [0x42; 32] || 0xac`.
pub fn code_hash_vector() -> (Vec<u8>, &'static str) {
    let mut code = vec![0x20];
    code.extend_from_slice(&[0x42; 32]);
    code.push(0xac);
    (code, "41fdf8dbd981933087f776af800865c3c786d6b5")
}

/// Check every vector, returning `(name, matches, computed hash)`.
///
/// Call this to verify your implementation matches the reference.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let bytes = encode_unsigned(&v.header);
            let hash = v.header.hash().to_hex();
            let bytes_match = v
                .expected_bytes
                .map_or(true, |expected| hex::encode(&bytes) == expected);
            (v.name.to_string(), bytes_match && hash == v.expected_hash, hash)
        })
        .collect()
}

/// Check the pinned code hash.
pub fn verify_code_hash_vector() -> bool {
    let (code, expected) = code_hash_vector();
    hash160(&code).to_hex() == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainhead_core::decode_unsigned;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, hash) in verify_all_vectors() {
            assert!(matches, "vector '{}' produced {}", name, hash);
        }
    }

    #[test]
    fn test_code_hash_vector() {
        assert!(verify_code_hash_vector());
    }

    #[test]
    fn test_vectors_decode_back() {
        for vector in all_vectors() {
            let bytes = encode_unsigned(&vector.header);
            assert_eq!(
                decode_unsigned(&bytes).unwrap(),
                vector.header,
                "vector '{}' did not round-trip",
                vector.name
            );
        }
    }

    #[test]
    fn test_wide_signer_uses_three_byte_prefix() {
        let vector = &all_vectors()[1];
        let bytes = encode_unsigned(&vector.header);
        assert_eq!(bytes.len(), 427);
        assert_eq!(&bytes[119..122], &[0xfd, 0x2c, 0x01]);
    }
}

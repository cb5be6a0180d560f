//! Signing payload and block identity.
//!
//! The signing payload is the canonical unsigned encoding. The block hash is
//! `SHA-256(SHA-256(payload))`, and it is the identifier used for chain
//! linkage and indexing everywhere else in the node.

use crate::codec::encode_unsigned;
use crate::crypto::double_sha256;
use crate::header::UnsignedHeader;
use crate::types::Hash256;

/// Bytes over which the block signature is computed and verified.
pub fn signing_payload(header: &UnsignedHeader) -> Vec<u8> {
    encode_unsigned(header)
}

/// The block hash of `header`.
pub fn block_hash(header: &UnsignedHeader) -> Hash256 {
    double_sha256(&signing_payload(header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::WinnerType;
    use bytes::Bytes;

    fn base() -> UnsignedHeader {
        UnsignedHeader {
            version: 0,
            timestamp: 1_600_000_000,
            height: 100,
            signer: Bytes::from(vec![0xab; 33]),
            ..UnsignedHeader::default()
        }
    }

    #[test]
    fn test_block_hash_deterministic() {
        assert_eq!(block_hash(&base()), block_hash(&base()));
        assert_eq!(block_hash(&base()), double_sha256(&encode_unsigned(&base())));
    }

    #[test]
    fn test_every_canonical_field_changes_hash() {
        let original = block_hash(&base());
        let mutations: [(&str, fn(&mut UnsignedHeader)); 9] = [
            ("version", |h: &mut UnsignedHeader| h.version += 1),
            ("prev_block_hash", |h: &mut UnsignedHeader| h.prev_block_hash.0[0] ^= 1),
            ("transactions_root", |h: &mut UnsignedHeader| h.transactions_root.0[31] ^= 1),
            ("state_root", |h: &mut UnsignedHeader| h.state_root.0[15] ^= 1),
            ("timestamp", |h: &mut UnsignedHeader| h.timestamp += 1),
            ("height", |h: &mut UnsignedHeader| h.height += 1),
            ("winner_type", |h: &mut UnsignedHeader| h.winner_type = WinnerType::BLOCK_SIGNER),
            ("signer", |h: &mut UnsignedHeader| h.signer = Bytes::from(vec![0xac; 33])),
            ("chord_id", |h: &mut UnsignedHeader| h.chord_id = Bytes::from_static(&[0])),
        ];
        for (field, mutate) in mutations {
            let mut header = base();
            mutate(&mut header);
            assert_ne!(block_hash(&header), original, "{field} did not affect the hash");
        }
    }

    #[test]
    fn test_fields_outside_payload_do_not_change_hash() {
        let mut header = base();
        header.consensus_data = 0xdead_beef;
        header.next_book_keeper = Bytes::from_static(b"next");
        header.winner_hash = Bytes::from(vec![0x99; 32]);
        assert_eq!(signing_payload(&header), signing_payload(&base()));
        assert_eq!(block_hash(&header), block_hash(&base()));
    }
}

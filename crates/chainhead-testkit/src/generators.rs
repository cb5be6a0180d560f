//! Proptest generators for property-based testing.

use bytes::Bytes;
use proptest::prelude::*;

use chainhead_core::{Hash256, Program, SealedHeader, UnsignedHeader, WinnerType};

use crate::fixtures::TestSigner;

/// Generate a random Hash256.
pub fn hash256() -> impl Strategy<Value = Hash256> {
    any::<[u8; 32]>().prop_map(Hash256::from_bytes)
}

/// Known winner types, plus arbitrary ordinals consensus may add later.
pub fn winner_type() -> impl Strategy<Value = WinnerType> {
    prop_oneof![
        Just(WinnerType::GENESIS_SIGNER),
        Just(WinnerType::TXN_SIGNER),
        Just(WinnerType::BLOCK_SIGNER),
        any::<u32>().prop_map(WinnerType),
    ]
}

/// Byte strings up to `max_len`, including empty.
pub fn var_bytes(max_len: usize) -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..=max_len).prop_map(Bytes::from)
}

/// Timestamps over the whole i64 range, with the edges weighted in.
pub fn timestamp() -> impl Strategy<Value = i64> {
    prop_oneof![
        Just(0i64),
        Just(i64::MAX),
        Just(i64::MIN),
        0i64..=4_000_000_000i64,
        any::<i64>(),
    ]
}

/// Heights with both ends weighted in.
pub fn height() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), Just(u32::MAX), any::<u32>()]
}

/// Generate an UnsignedHeader, every field populated.
pub fn unsigned_header() -> impl Strategy<Value = UnsignedHeader> {
    (
        (any::<u32>(), hash256(), hash256(), hash256()),
        (timestamp(), height(), any::<u64>(), var_bytes(64)),
        (var_bytes(64), winner_type(), var_bytes(300), var_bytes(64)),
    )
        .prop_map(
            |(
                (version, prev_block_hash, transactions_root, state_root),
                (timestamp, height, consensus_data, next_book_keeper),
                (winner_hash, winner_type, signer, chord_id),
            )| UnsignedHeader {
                version,
                prev_block_hash,
                transactions_root,
                state_root,
                timestamp,
                height,
                consensus_data,
                next_book_keeper,
                winner_hash,
                winner_type,
                signer,
                chord_id,
            },
        )
}

/// Keep only the fields the canonical encoding carries.
pub fn canonical_only(header: &UnsignedHeader) -> UnsignedHeader {
    UnsignedHeader {
        consensus_data: 0,
        next_book_keeper: Bytes::new(),
        winner_hash: Bytes::new(),
        ..header.clone()
    }
}

/// Generate a Program.
pub fn program() -> impl Strategy<Value = Program> {
    (var_bytes(128), var_bytes(128)).prop_map(|(code, parameter)| Program { code, parameter })
}

/// Parameters for generating a sealed header.
#[derive(Debug, Clone)]
pub struct SealedParams {
    pub seed: [u8; 32],
    pub unsigned: UnsignedHeader,
}

impl Arbitrary for SealedParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<[u8; 32]>(), unsigned_header())
            .prop_map(|(seed, unsigned)| SealedParams { seed, unsigned })
            .boxed()
    }
}

/// Sign and seal the header described by `params`.
pub fn sealed_from_params(params: &SealedParams) -> SealedHeader {
    let signer = TestSigner::from_seed(&params.seed);
    let header = chainhead_core::Header::new(params.unsigned.clone());
    signer
        .seal(header)
        .expect("signer always attaches one program and a signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainhead_core::{
        decode_unsigned, encode_unsigned, Error, Header, HeaderInfo, SealedHeader,
    };

    proptest! {
        #[test]
        fn test_unsigned_roundtrip(header in unsigned_header()) {
            let decoded = decode_unsigned(&encode_unsigned(&header)).unwrap();
            prop_assert_eq!(decoded, canonical_only(&header));
        }

        #[test]
        fn test_every_strict_prefix_rejected(header in unsigned_header(), cut in any::<prop::sample::Index>()) {
            let bytes = encode_unsigned(&header);
            let len = cut.index(bytes.len());
            prop_assert!(decode_unsigned(&bytes[..len]).is_err());
        }

        #[test]
        fn test_sealed_hash_deterministic(params: SealedParams) {
            let a = sealed_from_params(&params);
            let b = sealed_from_params(&params);
            prop_assert_eq!(a.hash(), b.hash());
            prop_assert_eq!(a.hash(), a.hash());
            prop_assert_eq!(a.hash(), params.unsigned.hash());
        }

        #[test]
        fn test_height_change_changes_hash(header in unsigned_header()) {
            let mut bumped = header.clone();
            bumped.height = header.height.wrapping_add(1);
            prop_assert_ne!(header.hash(), bumped.hash());
        }

        #[test]
        fn test_full_header_roundtrip(params: SealedParams) {
            let sealed = sealed_from_params(&params);
            let bytes = sealed.to_array().unwrap();
            prop_assert_eq!(SealedHeader::from_array(&bytes).unwrap(), sealed);
        }

        #[test]
        fn test_info_parses(params: SealedParams) {
            let sealed = sealed_from_params(&params);
            let doc: HeaderInfo = serde_json::from_slice(&sealed.info().unwrap()).unwrap();
            prop_assert_eq!(doc.height, params.unsigned.height);
            prop_assert_eq!(hex::decode(&doc.signer).unwrap(), params.unsigned.signer.to_vec());
            prop_assert_eq!(hex::decode(&doc.winner_hash).unwrap(), params.unsigned.winner_hash.to_vec());
            prop_assert_eq!(doc.hash, sealed.hash().to_hex());
        }

        #[test]
        fn test_set_program_count(header in unsigned_header(), programs in prop::collection::vec(program(), 0..4)) {
            let mut draft = Header::new(header);
            let original = Program::new(vec![0xac], vec![]);
            draft.set_program(vec![original.clone()]).unwrap();

            let count = programs.len();
            let result = draft.set_program(programs.clone());
            if count == 1 {
                prop_assert!(result.is_ok());
                prop_assert_eq!(draft.programs().unwrap(), &programs[..]);
            } else {
                prop_assert!(matches!(result, Err(Error::InvalidProgramCount(n)) if n == count));
                prop_assert_eq!(draft.program(), Some(&original));
            }
        }
    }
}

//! JSON snapshot of a full header for RPC and query layers.
//!
//! Byte fields are lowercase hex without a `0x` prefix, the winner type is
//! rendered by name, and `hash` is the block hash.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::header::UnsignedHeader;
use crate::program::Program;
use crate::types::Hash256;

/// Hex-encoded program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    pub code: String,
    pub parameter: String,
}

/// The JSON document produced by [`info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeaderInfo {
    pub version: u32,
    pub prev_block_hash: String,
    pub transactions_root: String,
    pub state_root: String,
    pub timestamp: i64,
    pub height: u32,
    pub consensus_data: u64,
    pub next_book_keeper: String,
    pub winner_hash: String,
    pub winner_type: String,
    pub signer: String,
    #[serde(rename = "chordID")]
    pub chord_id: String,
    pub signature: String,
    pub program: ProgramInfo,
    pub hash: String,
}

impl HeaderInfo {
    pub fn new(
        unsigned: &UnsignedHeader,
        signature: &[u8],
        program: &Program,
        hash: &Hash256,
    ) -> Self {
        Self {
            version: unsigned.version,
            prev_block_hash: unsigned.prev_block_hash.to_hex(),
            transactions_root: unsigned.transactions_root.to_hex(),
            state_root: unsigned.state_root.to_hex(),
            timestamp: unsigned.timestamp,
            height: unsigned.height,
            consensus_data: unsigned.consensus_data,
            next_book_keeper: hex::encode(&unsigned.next_book_keeper),
            winner_hash: hex::encode(&unsigned.winner_hash),
            winner_type: unsigned.winner_type.name().into_owned(),
            signer: hex::encode(&unsigned.signer),
            chord_id: hex::encode(&unsigned.chord_id),
            signature: hex::encode(signature),
            program: ProgramInfo {
                code: hex::encode(&program.code),
                parameter: hex::encode(&program.parameter),
            },
            hash: hash.to_hex(),
        }
    }
}

/// Serialize the header snapshot to JSON bytes.
pub fn info(
    unsigned: &UnsignedHeader,
    signature: &[u8],
    program: &Program,
    hash: &Hash256,
) -> Result<Vec<u8>> {
    let doc = HeaderInfo::new(unsigned, signature, program, hash);
    serde_json::to_vec(&doc).map_err(|e| Error::Encoding(e.to_string()))
}

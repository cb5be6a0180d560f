//! Canonical encoding of the unsigned header.
//!
//! Field order and widths are part of the network protocol. Every node must
//! produce identical bytes for identical content or the chain forks.
//!
//! | # | field               | encoding                        |
//! |---|---------------------|---------------------------------|
//! | 1 | `version`           | u32                             |
//! | 2 | `prev_block_hash`   | var-bytes (32)                  |
//! | 3 | `transactions_root` | var-bytes (32)                  |
//! | 4 | `state_root`        | var-bytes (32)                  |
//! | 5 | `timestamp`         | u64 (two's complement bit pattern) |
//! | 6 | `height`            | u32                             |
//! | 7 | `winner_type`       | u32 ordinal                     |
//! | 8 | `signer`            | var-bytes                       |
//! | 9 | `chord_id`          | var-bytes                       |
//!
//! `consensus_data`, `next_book_keeper` and `winner_hash` are not part of
//! this encoding, so they do not affect the block hash or the signature.

use bytes::{Buf, BufMut};

use crate::config::CodecConfig;
use crate::error::{DecodeError, Result};
use crate::header::{UnsignedHeader, WinnerType};
use crate::types::Hash256;
use crate::wire;

/// Encode the unsigned header to its canonical bytes.
pub fn encode_unsigned(header: &UnsignedHeader) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(header));
    write_unsigned(&mut buf, header);
    buf
}

/// Append the canonical bytes of `header` to `buf`.
pub fn write_unsigned(buf: &mut impl BufMut, header: &UnsignedHeader) {
    wire::write_u32(buf, header.version);
    wire::write_var_bytes(buf, header.prev_block_hash.as_bytes());
    wire::write_var_bytes(buf, header.transactions_root.as_bytes());
    wire::write_var_bytes(buf, header.state_root.as_bytes());
    wire::write_u64(buf, header.timestamp as u64);
    wire::write_u32(buf, header.height);
    wire::write_u32(buf, header.winner_type.ordinal());
    wire::write_var_bytes(buf, &header.signer);
    wire::write_var_bytes(buf, &header.chord_id);
}

/// Exact length of [`encode_unsigned`]'s output.
pub fn encoded_len(header: &UnsignedHeader) -> usize {
    const HASH_FIELD: usize = 1 + Hash256::LEN;
    let var = |len: usize| wire::var_uint_size(len as u64) + len;

    4 + 3 * HASH_FIELD + 8 + 4 + 4 + var(header.signer.len()) + var(header.chord_id.len())
}

/// Decode canonical bytes with the default limits.
///
/// The input must contain exactly one unsigned header.
pub fn decode_unsigned(bytes: &[u8]) -> Result<UnsignedHeader> {
    decode_unsigned_with(bytes, &CodecConfig::default())
}

/// Decode canonical bytes with explicit limits.
pub fn decode_unsigned_with(bytes: &[u8], config: &CodecConfig) -> Result<UnsignedHeader> {
    let mut reader = bytes;
    let header = read_unsigned(&mut reader, config).map_err(|e| {
        tracing::warn!(error = %e, len = bytes.len(), "rejected unsigned header");
        e
    })?;
    if !reader.is_empty() {
        tracing::warn!(trailing = reader.len(), "rejected unsigned header");
        return Err(DecodeError::TrailingBytes(reader.len()).into());
    }
    tracing::debug!(height = header.height, len = bytes.len(), "decoded unsigned header");
    Ok(header)
}

/// Read one unsigned header from the front of `buf`.
///
/// Bytes after the header are left in `buf`. Fields outside the canonical
/// encoding come back zeroed.
pub fn read_unsigned(
    buf: &mut impl Buf,
    config: &CodecConfig,
) -> std::result::Result<UnsignedHeader, DecodeError> {
    let max = config.max_var_bytes;

    let version = wire::read_u32(buf, "version")?;
    let prev_block_hash = Hash256(wire::read_var_hash256(buf, "prev_block_hash")?);
    let transactions_root = Hash256(wire::read_var_hash256(buf, "transactions_root")?);
    let state_root = Hash256(wire::read_var_hash256(buf, "state_root")?);
    let timestamp = wire::read_u64(buf, "timestamp")? as i64;
    let height = wire::read_u32(buf, "height")?;
    let winner_type = WinnerType(wire::read_u32(buf, "winner_type")?);
    let signer = wire::read_var_bytes(buf, "signer", max)?;
    let chord_id = wire::read_var_bytes(buf, "chord_id", max)?;

    Ok(UnsignedHeader {
        version,
        prev_block_hash,
        transactions_root,
        state_root,
        timestamp,
        height,
        winner_type,
        signer,
        chord_id,
        ..UnsignedHeader::default()
    })
}

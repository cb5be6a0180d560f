//! Structured encoding of the full header, for storage and transmission.
//!
//! The full header is a deterministic CBOR map (RFC 8949 core deterministic
//! encoding) with small integer keys:
//! - Map keys sorted by encoded bytes
//! - Integers use smallest valid encoding
//! - Definite lengths only
//!
//! Unlike [`crate::codec`], this form carries every field, including the
//! signature and the program. Callers treat the bytes as opaque.

use bytes::Bytes;
use ciborium::value::{Integer, Value};

use crate::config::CodecConfig;
use crate::error::{DecodeError, Error, Result};
use crate::header::{UnsignedHeader, WinnerType};
use crate::program::Program;
use crate::types::Hash256;

/// Map keys. 0-23 encode as a single byte.
mod keys {
    pub const VERSION: u64 = 0;
    pub const PREV_BLOCK_HASH: u64 = 1;
    pub const TRANSACTIONS_ROOT: u64 = 2;
    pub const STATE_ROOT: u64 = 3;
    pub const TIMESTAMP: u64 = 4;
    pub const HEIGHT: u64 = 5;
    pub const CONSENSUS_DATA: u64 = 6;
    pub const NEXT_BOOK_KEEPER: u64 = 7;
    pub const WINNER_HASH: u64 = 8;
    pub const WINNER_TYPE: u64 = 9;
    pub const SIGNER: u64 = 10;
    pub const CHORD_ID: u64 = 11;
    pub const SIGNATURE: u64 = 12;
    pub const PROGRAM_CODE: u64 = 13;
    pub const PROGRAM_PARAMETER: u64 = 14;
}

/// Encode a full header. Program keys are omitted when there is no program.
pub fn encode_header(
    unsigned: &UnsignedHeader,
    signature: &[u8],
    program: Option<&Program>,
) -> Result<Vec<u8>> {
    let value = header_to_cbor_value(unsigned, signature, program);
    let mut buf = Vec::new();
    encode_value(&mut buf, &value)?;
    Ok(buf)
}

fn entry(key: u64, value: Value) -> (Value, Value) {
    (Value::Integer(key.into()), value)
}

fn header_to_cbor_value(
    h: &UnsignedHeader,
    signature: &[u8],
    program: Option<&Program>,
) -> Value {
    let mut entries = vec![
        entry(keys::VERSION, Value::Integer(h.version.into())),
        entry(keys::PREV_BLOCK_HASH, Value::Bytes(h.prev_block_hash.0.to_vec())),
        entry(keys::TRANSACTIONS_ROOT, Value::Bytes(h.transactions_root.0.to_vec())),
        entry(keys::STATE_ROOT, Value::Bytes(h.state_root.0.to_vec())),
        entry(keys::TIMESTAMP, Value::Integer(h.timestamp.into())),
        entry(keys::HEIGHT, Value::Integer(h.height.into())),
        entry(keys::CONSENSUS_DATA, Value::Integer(h.consensus_data.into())),
        entry(keys::NEXT_BOOK_KEEPER, Value::Bytes(h.next_book_keeper.to_vec())),
        entry(keys::WINNER_HASH, Value::Bytes(h.winner_hash.to_vec())),
        entry(keys::WINNER_TYPE, Value::Integer(h.winner_type.ordinal().into())),
        entry(keys::SIGNER, Value::Bytes(h.signer.to_vec())),
        entry(keys::CHORD_ID, Value::Bytes(h.chord_id.to_vec())),
        entry(keys::SIGNATURE, Value::Bytes(signature.to_vec())),
    ];
    if let Some(program) = program {
        entries.push(entry(keys::PROGRAM_CODE, Value::Bytes(program.code.to_vec())));
        entries.push(entry(
            keys::PROGRAM_PARAMETER,
            Value::Bytes(program.parameter.to_vec()),
        ));
    }
    Value::Map(entries)
}

fn encode_value(buf: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Map(entries) => encode_map(buf, entries)?,
        other => {
            return Err(Error::Encoding(format!(
                "unsupported CBOR value in header: {other:?}"
            )))
        }
    }
    Ok(())
}

fn encode_integer(buf: &mut Vec<u8>, i: Integer) {
    let n: i128 = i.into();
    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_map(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<()> {
    let mut sorted = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_bytes = Vec::new();
        encode_value(&mut key_bytes, k)?;
        sorted.push((key_bytes, v));
    }
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, sorted.len() as u64);
    for (key_bytes, v) in sorted {
        buf.extend_from_slice(&key_bytes);
        encode_value(buf, v)?;
    }
    Ok(())
}

fn malformed(msg: impl Into<String>) -> Error {
    Error::Decoding(DecodeError::Malformed(msg.into()))
}

/// Decode a full header. Rejects anything that would not re-encode to the
/// same bytes.
pub fn decode_header(
    bytes: &[u8],
    config: &CodecConfig,
) -> Result<(UnsignedHeader, Bytes, Option<Program>)> {
    let mut cursor = std::io::Cursor::new(bytes);
    let value: Value = ciborium::from_reader(&mut cursor).map_err(|e| malformed(e.to_string()))?;
    let consumed = cursor.position() as usize;
    if consumed != bytes.len() {
        return Err(DecodeError::TrailingBytes(bytes.len() - consumed).into());
    }

    let decoded = cbor_value_to_header(&value, config)?;

    let (unsigned, signature, program) = &decoded;
    if encode_header(unsigned, signature, program.as_ref())? != bytes {
        return Err(malformed("non-canonical encoding"));
    }
    Ok(decoded)
}

fn cbor_value_to_header(
    value: &Value,
    config: &CodecConfig,
) -> Result<(UnsignedHeader, Bytes, Option<Program>)> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(malformed("expected map")),
    };

    let get = |key: u64| {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == i128::from(key)))
            .map(|(_, v)| v)
    };

    let int = |key: u64, name: &str| -> Result<i128> {
        match get(key) {
            Some(Value::Integer(i)) => Ok(i128::from(*i)),
            _ => Err(malformed(format!("missing or invalid {name}"))),
        }
    };

    let bytes = |key: u64, name: &str| -> Result<Bytes> {
        match get(key) {
            Some(Value::Bytes(b)) if b.len() <= config.max_var_bytes => Ok(Bytes::from(b.clone())),
            Some(Value::Bytes(b)) => Err(malformed(format!(
                "{name} exceeds limit: {} > {}",
                b.len(),
                config.max_var_bytes
            ))),
            _ => Err(malformed(format!("missing or invalid {name}"))),
        }
    };

    let hash = |key: u64, name: &str| -> Result<Hash256> {
        match get(key) {
            Some(Value::Bytes(b)) => Hash256::try_from(b.as_slice())
                .map_err(|_| malformed(format!("{name} must be 32 bytes, got {}", b.len()))),
            _ => Err(malformed(format!("missing or invalid {name}"))),
        }
    };

    let version = u32::try_from(int(keys::VERSION, "version")?)
        .map_err(|_| malformed("version out of range"))?;
    let timestamp = i64::try_from(int(keys::TIMESTAMP, "timestamp")?)
        .map_err(|_| malformed("timestamp out of range"))?;
    let height = u32::try_from(int(keys::HEIGHT, "height")?)
        .map_err(|_| malformed("height out of range"))?;
    let consensus_data = u64::try_from(int(keys::CONSENSUS_DATA, "consensus_data")?)
        .map_err(|_| malformed("consensus_data out of range"))?;
    let winner_type = u32::try_from(int(keys::WINNER_TYPE, "winner_type")?)
        .map_err(|_| malformed("winner_type out of range"))?;

    let unsigned = UnsignedHeader {
        version,
        prev_block_hash: hash(keys::PREV_BLOCK_HASH, "prev_block_hash")?,
        transactions_root: hash(keys::TRANSACTIONS_ROOT, "transactions_root")?,
        state_root: hash(keys::STATE_ROOT, "state_root")?,
        timestamp,
        height,
        consensus_data,
        next_book_keeper: bytes(keys::NEXT_BOOK_KEEPER, "next_book_keeper")?,
        winner_hash: bytes(keys::WINNER_HASH, "winner_hash")?,
        winner_type: WinnerType(winner_type),
        signer: bytes(keys::SIGNER, "signer")?,
        chord_id: bytes(keys::CHORD_ID, "chord_id")?,
    };
    let signature = bytes(keys::SIGNATURE, "signature")?;

    let program = match (get(keys::PROGRAM_CODE), get(keys::PROGRAM_PARAMETER)) {
        (None, None) => None,
        (Some(_), Some(_)) => Some(Program {
            code: bytes(keys::PROGRAM_CODE, "program_code")?,
            parameter: bytes(keys::PROGRAM_PARAMETER, "program_parameter")?,
        }),
        _ => return Err(malformed("program code and parameter must appear together")),
    };

    Ok((unsigned, signature, program))
}

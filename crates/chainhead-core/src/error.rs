//! Error types for header encoding, hashing and authorization.

use thiserror::Error;

/// Errors produced by header operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("decoding error: {0}")]
    Decoding(#[from] DecodeError),

    #[error("expected exactly one program, got {0}")]
    InvalidProgramCount(usize),

    #[error("header has no program attached")]
    MissingProgram,

    #[error("header has no signature attached")]
    MissingSignature,

    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Wire-level decoding failures.
///
/// Each variant names the field whose read failed so that a rejected block
/// can be traced back to the offending bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input reading {field}: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("non-canonical length prefix for {field}")]
    NonCanonicalVarInt { field: &'static str },

    #[error("length of {field} exceeds limit: {len} > {max}")]
    LengthExceeded {
        field: &'static str,
        len: u64,
        max: usize,
    },

    #[error("invalid length for {field}: expected {expected}, got {got}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{0} trailing bytes after header")]
    TrailingBytes(usize),

    #[error("malformed header: {0}")]
    Malformed(String),
}

/// Result type for header operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Hash primitives: double SHA-256 block identity and Hash160 code hashes.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::types::{Hash160, Hash256};

/// `SHA-256(SHA-256(data))`.
pub fn double_sha256(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    Hash256(second.into())
}

/// `RIPEMD-160(SHA-256(data))`.
pub fn hash160(data: &[u8]) -> Hash160 {
    let sha = Sha256::digest(data);
    let mut hasher = Ripemd160::new();
    hasher.update(sha);
    Hash160(hasher.finalize().into())
}

/// Maps a program's verification code to the identity hash of its signer.
///
/// Consensus compares this hash against the elected signer, so every node
/// must use the same transform.
pub trait CodeHasher {
    fn code_hash(&self, code: &[u8]) -> Hash160;
}

/// The network's code-to-address transform: `RIPEMD-160(SHA-256(code))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Ripemd160;

impl CodeHasher for Sha256Ripemd160 {
    fn code_hash(&self, code: &[u8]) -> Hash160 {
        hash160(code)
    }
}

impl<F> CodeHasher for F
where
    F: Fn(&[u8]) -> Hash160,
{
    fn code_hash(&self, code: &[u8]) -> Hash160 {
        self(code)
    }
}

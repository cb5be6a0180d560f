//! Programs: the verification predicate that authorizes a header.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::crypto::CodeHasher;
use crate::types::Hash160;

/// A code + parameter pair.
///
/// `code` is the verification predicate (for a single-signer block, the
/// signer's public key and a check-signature opcode); `parameter` holds its
/// arguments (the signature).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Program {
    pub code: Bytes,
    pub parameter: Bytes,
}

impl Program {
    pub fn new(code: impl Into<Bytes>, parameter: impl Into<Bytes>) -> Self {
        Self {
            code: code.into(),
            parameter: parameter.into(),
        }
    }

    /// Identity hash of the signer this program's code represents.
    pub fn code_hash(&self, hasher: &impl CodeHasher) -> Hash160 {
        hasher.code_hash(&self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{hash160, Sha256Ripemd160};

    #[test]
    fn test_code_hash_ignores_parameter() {
        let a = Program::new(vec![0x21, 0xac], vec![0x01]);
        let b = Program::new(vec![0x21, 0xac], vec![0x02]);
        assert_eq!(a.code_hash(&Sha256Ripemd160), b.code_hash(&Sha256Ripemd160));
        assert_eq!(a.code_hash(&Sha256Ripemd160), hash160(&[0x21, 0xac]));
    }
}

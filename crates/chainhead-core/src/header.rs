//! Block headers: the Draft value assembled by block production and the
//! Sealed value that the rest of the node reads.
//!
//! A [`Header`] is a Draft. Its unsigned fields and signature are freely
//! mutable and it may hold at most one [`Program`]. [`Header::seal`] turns
//! it into a [`SealedHeader`], which is immutable, caches its block hash, and
//! can be shared across threads without synchronization. There is no way
//! back from Sealed to Draft.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::codec::encode_unsigned;
use crate::config::CodecConfig;
use crate::crypto::{CodeHasher, Sha256Ripemd160};
use crate::error::{Error, Result};
use crate::hashing::block_hash;
use crate::info;
use crate::program::Program;
use crate::structured;
use crate::types::{Hash160, Hash256};

/// Which consensus path selected the block's signer.
///
/// Ordinals are owned by consensus and carried opaquely: any `u32` decodes
/// and re-encodes unchanged, only the symbolic name is looked up here.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WinnerType(pub u32);

impl WinnerType {
    pub const GENESIS_SIGNER: Self = Self(0);
    pub const TXN_SIGNER: Self = Self(1);
    pub const BLOCK_SIGNER: Self = Self(2);

    pub const fn ordinal(self) -> u32 {
        self.0
    }

    /// Symbolic name, or the decimal ordinal when it is not a known one.
    pub fn name(self) -> Cow<'static, str> {
        match self {
            Self::GENESIS_SIGNER => Cow::Borrowed("GENESIS_SIGNER"),
            Self::TXN_SIGNER => Cow::Borrowed("TXN_SIGNER"),
            Self::BLOCK_SIGNER => Cow::Borrowed("BLOCK_SIGNER"),
            Self(other) => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Debug for WinnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WinnerType({})", self.name())
    }
}

impl fmt::Display for WinnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<u32> for WinnerType {
    fn from(ordinal: u32) -> Self {
        Self(ordinal)
    }
}

/// Block metadata, excluding the authorization proof.
///
/// Only some fields take part in the canonical encoding and therefore in
/// the block hash; see [`crate::codec`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedHeader {
    pub version: u32,
    pub prev_block_hash: Hash256,
    pub transactions_root: Hash256,
    pub state_root: Hash256,
    /// Unix seconds, as claimed by the block producer.
    pub timestamp: i64,
    pub height: u32,
    pub consensus_data: u64,
    pub next_book_keeper: Bytes,
    pub winner_hash: Bytes,
    pub winner_type: WinnerType,
    /// Public key of the elected signer.
    pub signer: Bytes,
    /// Overlay-network identifier of the elected signer.
    pub chord_id: Bytes,
}

impl UnsignedHeader {
    /// The block hash of this content: double SHA-256 of the canonical bytes.
    pub fn hash(&self) -> Hash256 {
        block_hash(self)
    }

    /// The canonical bytes, which are also the signing payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_unsigned(self)
    }
}

/// A Draft header: unsigned content plus an optional single program and a
/// signature, both still being assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub unsigned: UnsignedHeader,
    /// Signature over [`Header::signing_payload`], assigned by the signer.
    pub signature: Bytes,
    program: Option<Program>,
}

impl Header {
    pub fn new(unsigned: UnsignedHeader) -> Self {
        Self {
            unsigned,
            signature: Bytes::new(),
            program: None,
        }
    }

    /// Bytes the block signature is computed over.
    ///
    /// Excludes the program and the signature itself.
    pub fn signing_payload(&self) -> Vec<u8> {
        encode_unsigned(&self.unsigned)
    }

    /// Block hash, recomputed on every call while Draft.
    pub fn hash(&self) -> Hash256 {
        block_hash(&self.unsigned)
    }

    /// Replace the program. Exactly one program must be supplied.
    ///
    /// On failure the current program is left as it was.
    pub fn set_program(&mut self, programs: Vec<Program>) -> Result<()> {
        let count = programs.len();
        let mut programs = programs.into_iter();
        match (programs.next(), programs.next()) {
            (Some(program), None) => {
                self.program = Some(program);
                Ok(())
            }
            _ => {
                tracing::warn!(count, height = self.unsigned.height, "rejected program set");
                Err(Error::InvalidProgramCount(count))
            }
        }
    }

    pub fn set_signature(&mut self, signature: impl Into<Bytes>) {
        self.signature = signature.into();
    }

    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// The attached program as a single-element slice.
    pub fn programs(&self) -> Result<&[Program]> {
        self.program
            .as_ref()
            .map(std::slice::from_ref)
            .ok_or(Error::MissingProgram)
    }

    /// Signer identity hashes derived with the network's code hash.
    pub fn program_hashes(&self) -> Result<Vec<Hash160>> {
        self.program_hashes_with(&Sha256Ripemd160)
    }

    /// Signer identity hashes derived with a caller-supplied code hash.
    pub fn program_hashes_with(&self, hasher: &impl CodeHasher) -> Result<Vec<Hash160>> {
        let program = self.program.as_ref().ok_or(Error::MissingProgram)?;
        Ok(vec![program.code_hash(hasher)])
    }

    /// JSON snapshot of the header. Requires a program.
    pub fn info(&self) -> Result<Vec<u8>> {
        let program = self.program.as_ref().ok_or(Error::MissingProgram)?;
        info::info(&self.unsigned, &self.signature, program, &self.hash())
    }

    /// Full-header bytes for storage and transmission.
    pub fn to_array(&self) -> Result<Vec<u8>> {
        structured::encode_header(&self.unsigned, &self.signature, self.program.as_ref())
    }

    /// Decode full-header bytes produced by [`Header::to_array`].
    pub fn from_array(bytes: &[u8]) -> Result<Self> {
        Self::from_array_with(bytes, &CodecConfig::default())
    }

    pub fn from_array_with(bytes: &[u8], config: &CodecConfig) -> Result<Self> {
        let (unsigned, signature, program) = structured::decode_header(bytes, config)?;
        Ok(Self {
            unsigned,
            signature,
            program,
        })
    }

    /// Finish the Draft. Requires a program and a non-empty signature.
    pub fn seal(self) -> Result<SealedHeader> {
        let program = self.program.ok_or(Error::MissingProgram)?;
        if self.signature.is_empty() {
            return Err(Error::MissingSignature);
        }
        let hash = block_hash(&self.unsigned);
        tracing::debug!(height = self.unsigned.height, %hash, "header sealed");
        Ok(SealedHeader {
            unsigned: self.unsigned,
            signature: self.signature,
            program,
            hash,
        })
    }
}

/// An immutable, signed header with its block hash computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedHeader {
    unsigned: UnsignedHeader,
    signature: Bytes,
    program: Program,
    hash: Hash256,
}

impl SealedHeader {
    /// Decode full-header bytes and seal the result.
    pub fn from_array(bytes: &[u8]) -> Result<Self> {
        Header::from_array(bytes)?.seal()
    }

    pub fn unsigned(&self) -> &UnsignedHeader {
        &self.unsigned
    }

    pub fn signature(&self) -> &Bytes {
        &self.signature
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn programs(&self) -> &[Program] {
        std::slice::from_ref(&self.program)
    }

    pub fn height(&self) -> u32 {
        self.unsigned.height
    }

    /// Cached block hash.
    pub fn hash(&self) -> Hash256 {
        self.hash
    }

    pub fn signing_payload(&self) -> Vec<u8> {
        encode_unsigned(&self.unsigned)
    }

    pub fn program_hashes(&self) -> Vec<Hash160> {
        self.program_hashes_with(&Sha256Ripemd160)
    }

    pub fn program_hashes_with(&self, hasher: &impl CodeHasher) -> Vec<Hash160> {
        vec![self.program.code_hash(hasher)]
    }

    pub fn info(&self) -> Result<Vec<u8>> {
        info::info(&self.unsigned, &self.signature, &self.program, &self.hash)
    }

    pub fn to_array(&self) -> Result<Vec<u8>> {
        structured::encode_header(&self.unsigned, &self.signature, Some(&self.program))
    }
}

/// Builder for Draft headers.
#[derive(Debug, Clone, Default)]
pub struct HeaderBuilder {
    unsigned: UnsignedHeader,
}

impl HeaderBuilder {
    /// Start a header at `height` on top of `prev_block_hash`.
    pub fn new(height: u32, prev_block_hash: Hash256) -> Self {
        Self {
            unsigned: UnsignedHeader {
                height,
                prev_block_hash,
                ..UnsignedHeader::default()
            },
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.unsigned.version = version;
        self
    }

    pub fn transactions_root(mut self, root: Hash256) -> Self {
        self.unsigned.transactions_root = root;
        self
    }

    pub fn state_root(mut self, root: Hash256) -> Self {
        self.unsigned.state_root = root;
        self
    }

    pub fn timestamp(mut self, ts: i64) -> Self {
        self.unsigned.timestamp = ts;
        self
    }

    pub fn consensus_data(mut self, data: u64) -> Self {
        self.unsigned.consensus_data = data;
        self
    }

    pub fn next_book_keeper(mut self, keeper: impl Into<Bytes>) -> Self {
        self.unsigned.next_book_keeper = keeper.into();
        self
    }

    pub fn winner(mut self, winner_type: WinnerType, winner_hash: impl Into<Bytes>) -> Self {
        self.unsigned.winner_type = winner_type;
        self.unsigned.winner_hash = winner_hash.into();
        self
    }

    pub fn signer(mut self, signer: impl Into<Bytes>, chord_id: impl Into<Bytes>) -> Self {
        self.unsigned.signer = signer.into();
        self.unsigned.chord_id = chord_id.into();
        self
    }

    pub fn build(self) -> Header {
        Header::new(self.unsigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash160;

    fn draft() -> Header {
        HeaderBuilder::new(7, Hash256::from_bytes([0x11; 32]))
            .timestamp(1_600_000_000)
            .transactions_root(Hash256::from_bytes([0x22; 32]))
            .state_root(Hash256::from_bytes([0x33; 32]))
            .winner(WinnerType::TXN_SIGNER, vec![0x44; 32])
            .signer(vec![0x55; 33], vec![0x66; 32])
            .build()
    }

    fn program(tag: u8) -> Program {
        Program::new(vec![tag; 35], vec![tag; 65])
    }

    #[test]
    fn test_set_program_requires_exactly_one() {
        let mut header = draft();
        header.set_program(vec![program(1)]).unwrap();

        let err = header.set_program(vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidProgramCount(0)));
        assert_eq!(header.program(), Some(&program(1)));

        let err = header.set_program(vec![program(2), program(3)]).unwrap_err();
        assert!(matches!(err, Error::InvalidProgramCount(2)));
        assert_eq!(header.program(), Some(&program(1)));

        header.set_program(vec![program(4)]).unwrap();
        assert_eq!(header.programs().unwrap(), &[program(4)]);
    }

    #[test]
    fn test_programs_missing() {
        let header = draft();
        assert!(matches!(header.programs(), Err(Error::MissingProgram)));
        assert!(matches!(header.program_hashes(), Err(Error::MissingProgram)));
        assert!(matches!(header.info(), Err(Error::MissingProgram)));
    }

    #[test]
    fn test_program_hashes_single_code_hash() {
        let mut header = draft();
        header.set_program(vec![program(9)]).unwrap();
        let hashes = header.program_hashes().unwrap();
        assert_eq!(hashes, vec![hash160(&[9u8; 35])]);

        let custom = header
            .program_hashes_with(&|code: &[u8]| Hash160([code.len() as u8; 20]))
            .unwrap();
        assert_eq!(custom, vec![Hash160([35; 20])]);
    }

    #[test]
    fn test_seal_requires_program_and_signature() {
        let header = draft();
        assert!(matches!(header.clone().seal(), Err(Error::MissingProgram)));

        let mut header = draft();
        header.set_program(vec![program(1)]).unwrap();
        assert!(matches!(header.clone().seal(), Err(Error::MissingSignature)));

        header.set_signature(vec![0xaa; 64]);
        let sealed = header.clone().seal().unwrap();
        assert_eq!(sealed.hash(), header.hash());
        assert_eq!(sealed.signing_payload(), header.signing_payload());
        assert_eq!(sealed.programs(), header.programs().unwrap());
        assert_eq!(sealed.program_hashes(), header.program_hashes().unwrap());
    }

    #[test]
    fn test_hash_ignores_authorization() {
        let mut header = draft();
        let before = header.hash();
        header.set_program(vec![program(1)]).unwrap();
        header.set_signature(vec![0xaa; 64]);
        assert_eq!(header.hash(), before);
    }

    #[test]
    fn test_draft_hash_tracks_mutation() {
        let mut header = draft();
        let before = header.hash();
        header.unsigned.height += 1;
        assert_ne!(header.hash(), before);
        header.unsigned.height -= 1;
        assert_eq!(header.hash(), before);
    }

    #[test]
    fn test_sealed_header_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SealedHeader>();

        let mut header = draft();
        header.set_program(vec![program(1)]).unwrap();
        header.set_signature(vec![0xaa; 64]);
        let sealed = std::sync::Arc::new(header.seal().unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sealed = sealed.clone();
                std::thread::spawn(move || (sealed.hash(), sealed.unsigned().hash()))
            })
            .collect();
        for handle in handles {
            let (cached, computed) = handle.join().unwrap();
            assert_eq!(cached, sealed.hash());
            assert_eq!(computed, sealed.hash());
        }
    }

    #[test]
    fn test_winner_type_names() {
        assert_eq!(WinnerType::GENESIS_SIGNER.name(), "GENESIS_SIGNER");
        assert_eq!(WinnerType::TXN_SIGNER.name(), "TXN_SIGNER");
        assert_eq!(WinnerType::BLOCK_SIGNER.name(), "BLOCK_SIGNER");
        assert_eq!(WinnerType(7).name(), "7");
        assert_eq!(WinnerType::from(2).to_string(), "BLOCK_SIGNER");
    }
}

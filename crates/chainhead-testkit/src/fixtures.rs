//! Test fixtures and helpers.
//!
//! A [`TestSigner`] plays the role of an elected block producer: it builds
//! Draft headers naming itself as signer, signs the signing payload with a
//! deterministic ed25519 key, and attaches the matching signature program.

use chainhead_core::{
    hash160, Hash160, Hash256, Header, HeaderBuilder, Program, SealedHeader, WinnerType,
};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// Opcode closing a single-key verification program.
pub const CHECKSIG: u8 = 0xac;

/// Timestamp of height 0 in generated chains.
pub const BASE_TIMESTAMP: i64 = 1_600_000_000;

/// Seconds between consecutive generated blocks.
pub const BLOCK_INTERVAL: i64 = 20;

/// `code = 0x20 || pubkey || CHECKSIG`.
pub fn signature_program_code(public_key: &[u8; 32]) -> Vec<u8> {
    let mut code = Vec::with_capacity(34);
    code.push(public_key.len() as u8);
    code.extend_from_slice(public_key);
    code.push(CHECKSIG);
    code
}

/// Program for a single ed25519 signature: `parameter = 0x40 || signature`.
pub fn signature_program(public_key: &[u8; 32], signature: &[u8; 64]) -> Program {
    let mut parameter = Vec::with_capacity(65);
    parameter.push(signature.len() as u8);
    parameter.extend_from_slice(signature);
    Program::new(signature_program_code(public_key), parameter)
}

/// A block producer with a deterministic or random ed25519 key.
#[derive(Clone)]
pub struct TestSigner {
    signing_key: SigningKey,
}

impl TestSigner {
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The identity consensus expects in `program_hashes`.
    pub fn identity(&self) -> Hash160 {
        hash160(&signature_program_code(&self.public_key()))
    }

    /// A Draft at `height` naming this signer as the block winner.
    pub fn draft(&self, height: u32, prev_block_hash: Hash256) -> Header {
        HeaderBuilder::new(height, prev_block_hash)
            .timestamp(BASE_TIMESTAMP + i64::from(height) * BLOCK_INTERVAL)
            .winner(WinnerType::BLOCK_SIGNER, prev_block_hash.0.to_vec())
            .signer(self.public_key().to_vec(), self.public_key().to_vec())
            .build()
    }

    /// Sign the Draft's payload, attach the program and seal.
    pub fn seal(&self, mut header: Header) -> chainhead_core::Result<SealedHeader> {
        let signature = self.signing_key.sign(&header.signing_payload()).to_bytes();
        header.set_program(vec![signature_program(&self.public_key(), &signature)])?;
        header.set_signature(signature.to_vec());
        header.seal()
    }

    /// Check a sealed header's signature against this signer's key.
    pub fn verify(&self, header: &SealedHeader) -> bool {
        let Ok(bytes) = <[u8; 64]>::try_from(&header.signature()[..]) else {
            return false;
        };
        let Ok(key) = VerifyingKey::from_bytes(&self.public_key()) else {
            return false;
        };
        key.verify(&header.signing_payload(), &Signature::from_bytes(&bytes))
            .is_ok()
    }
}

impl std::fmt::Debug for TestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TestSigner({})", self.identity())
    }
}

/// A linked chain of `len` sealed headers starting at height 0.
pub fn build_chain(signer: &TestSigner, len: u32) -> chainhead_core::Result<Vec<SealedHeader>> {
    let mut chain: Vec<SealedHeader> = Vec::with_capacity(len as usize);
    for height in 0..len {
        let prev = chain.last().map(SealedHeader::hash).unwrap_or(Hash256::ZERO);
        chain.push(signer.seal(signer.draft(height, prev))?);
    }
    Ok(chain)
}

/// Signers with distinct deterministic keys.
pub fn multi_signer_fixtures(count: usize) -> Vec<TestSigner> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestSigner::from_seed(&seed)
        })
        .collect()
}

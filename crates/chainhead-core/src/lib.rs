//! # Chainhead Core
//!
//! Block header primitives: canonical encoding, block identity, and signer
//! identity extraction.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over header values, and every node must agree on it bit for
//! bit.
//!
//! ## Key Types
//!
//! - [`UnsignedHeader`] - Block metadata without the authorization proof
//! - [`Header`] - A Draft header being assembled and signed
//! - [`SealedHeader`] - An immutable, signed header with a cached hash
//! - [`Program`] - The verification predicate that authorizes a header
//! - [`Hash256`] / [`Hash160`] - Block identity and signer identity
//!
//! ## Lifecycle
//!
//! ```rust
//! use chainhead_core::{HeaderBuilder, Hash256, Program, WinnerType};
//!
//! let mut header = HeaderBuilder::new(1, Hash256::ZERO)
//!     .timestamp(1_600_000_000)
//!     .winner(WinnerType::BLOCK_SIGNER, Vec::new())
//!     .signer(vec![0x02; 33], Vec::new())
//!     .build();
//!
//! // The signer signs these bytes.
//! let _payload = header.signing_payload();
//!
//! header.set_program(vec![Program::new(vec![0xac], vec![0x01])]).unwrap();
//! header.set_signature(vec![0x01; 64]);
//!
//! let sealed = header.seal().unwrap();
//! assert_eq!(sealed.program_hashes().len(), 1);
//! ```
//!
//! ## Encodings
//!
//! The unsigned header has a fixed canonical byte layout, see [`codec`]. It
//! is both the signing payload and the preimage of the block hash. The full
//! header, including signature and program, uses the deterministic CBOR form
//! in [`structured`].

pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod hashing;
pub mod header;
pub mod info;
pub mod program;
pub mod structured;
pub mod types;
pub mod wire;

pub use codec::{decode_unsigned, decode_unsigned_with, encode_unsigned, read_unsigned};
pub use config::CodecConfig;
pub use crypto::{double_sha256, hash160, CodeHasher, Sha256Ripemd160};
pub use error::{DecodeError, Error, Result};
pub use hashing::{block_hash, signing_payload};
pub use header::{Header, HeaderBuilder, SealedHeader, UnsignedHeader, WinnerType};
pub use info::{HeaderInfo, ProgramInfo};
pub use program::Program;
pub use types::{Hash160, Hash256};

//! # Chainhead Testkit
//!
//! Testing utilities for Chainhead.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known headers with expected bytes and hashes for cross-node verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A deterministic ed25519 block producer that signs and seals headers
//!
//! ## Golden Vectors
//!
//! ```rust
//! use chainhead_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hash) in verify_all_vectors() {
//!     assert!(matches, "{name}: {hash}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use chainhead_testkit::generators::{sealed_from_params, SealedParams};
//!
//! proptest! {
//!     #[test]
//!     fn hash_is_deterministic(params: SealedParams) {
//!         let a = sealed_from_params(&params);
//!         let b = sealed_from_params(&params);
//!         prop_assert_eq!(a.hash(), b.hash());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use chainhead_core::Hash256;
//! use chainhead_testkit::fixtures::TestSigner;
//!
//! let signer = TestSigner::from_seed(&[7; 32]);
//! let sealed = signer.seal(signer.draft(1, Hash256::ZERO)).unwrap();
//! assert_eq!(sealed.program_hashes(), vec![signer.identity()]);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{build_chain, multi_signer_fixtures, signature_program, TestSigner};
pub use generators::{sealed_from_params, SealedParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};

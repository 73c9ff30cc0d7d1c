// src/lib.rs

pub mod api;
pub mod core;
pub mod crypto;
pub mod security;

// Public surface re-exports so callers don't need to know the module tree.
pub use crate::api::types::{Bip44, Ed25519Signature};
pub use crate::core::account::ChainState;
pub use crate::core::config::EngineConfig;
pub use crate::core::engine::SigningEngine;
pub use crate::core::errors::{PathError, SignerError};
pub use crate::core::path::{coin_types, Bip44Path};
pub use crate::crypto::keypair::{KeyPair, SignatureScheme};
pub use crate::crypto::signing::Signature;
pub use crate::security::seed_store::{generate_entropy, SeedStore};

// Conditionally compile the test environment setup. Include when running
// `cargo test` or when the explicit `test-env` feature is enabled.
#[cfg(any(test, feature = "test-env"))]
mod test_env;

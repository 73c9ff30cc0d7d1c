//! Ed25519 signing and verification.
//!
//! Signing is deterministic per RFC 8032: the nonce is derived from the
//! private key and the message via SHA-512, so no external randomness is
//! involved. That determinism is a correctness property: it removes the
//! weak-RNG nonce-reuse failure mode entirely.
//!
//! Verification is a pure predicate. Malformed lengths, off-curve public
//! keys and cryptographically invalid signatures all evaluate to `false`;
//! an invalid signature is an expected outcome, not an exception.

use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};
use subtle::ConstantTimeEq;

use crate::crypto::keypair::{KeyPair, SignatureScheme};

/// A produced signature plus the public key that verifies it.
/// Contains no secret material; freely copyable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub public_key: [u8; 32],
    pub signature: [u8; 64],
    pub scheme: SignatureScheme,
}

impl Signature {
    /// Verify this record against the message digest it claims to cover.
    pub fn verify(&self, message_digest: &[u8]) -> bool {
        verify_digest(&self.public_key, message_digest, &self.signature)
    }

    /// Verify against a caller-supplied public key instead of the embedded
    /// one. The key comparison is constant-time; an embedded key that does
    /// not match the expected key fails verification without shortcutting.
    pub fn verify_for(&self, expected_public_key: &[u8; 32], message_digest: &[u8]) -> bool {
        let key_matches: bool = self.public_key.ct_eq(expected_public_key).into();
        // Evaluate the signature check unconditionally so the mismatch case
        // does not return early on the key comparison alone.
        let sig_valid = verify_digest(&self.public_key, message_digest, &self.signature);
        key_matches & sig_valid
    }
}

/// Sign a message digest with a derived keypair.
///
/// RFC 8032 Ed25519: deterministic, 64-byte signature. The transient
/// `SigningKey` zeroizes itself on drop.
pub fn sign_digest(keypair: &KeyPair, message_digest: &[u8]) -> Signature {
    let signing_key: SigningKey = keypair.signing_key();
    let signature = signing_key.sign(message_digest);
    Signature {
        public_key: keypair.public(),
        signature: signature.to_bytes(),
        scheme: SignatureScheme::Ed25519,
    }
}

/// Verify an Ed25519 signature over a message digest.
///
/// Accepts raw slices so the boundary layer can pass unvalidated input
/// directly: any length mismatch, decoding failure or off-curve public key
/// returns `false`, never an error. Uses strict verification, which also
/// rejects small-order components and non-canonical encodings.
pub fn verify_digest(public_key: &[u8], message_digest: &[u8], signature: &[u8]) -> bool {
    let public_key: [u8; 32] = match public_key.try_into() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let signature: [u8; 64] = match signature.try_into() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let verifying_key = match VerifyingKey::from_bytes(&public_key) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let signature = ed25519_dalek::Signature::from_bytes(&signature);

    verifying_key
        .verify_strict(message_digest, &signature)
        .is_ok()
}

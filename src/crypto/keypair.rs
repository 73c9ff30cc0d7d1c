//! Keypair and signature value types.

use ed25519_dalek::SigningKey;

use crate::security::secret::SecretBytes32;

/// Signature scheme discriminant, carried as an integer tag at the binding
/// boundary. Tag 0 is Ed25519; other values are reserved for future schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SignatureScheme {
    Ed25519 = 0,
}

impl SignatureScheme {
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(SignatureScheme::Ed25519),
            _ => None,
        }
    }
}

/// A derived Ed25519 keypair.
///
/// The secret half lives in a `Zeroizing` buffer and is erased when the
/// owning cache entry is dropped or evicted. It is never serialized and
/// never logged.
pub struct KeyPair {
    secret: SecretBytes32,
    public: [u8; 32],
}

impl KeyPair {
    /// Build a keypair from 32 secret bytes, computing the public half.
    /// Ed25519 accepts any 32-byte string as a secret key.
    pub fn from_secret(secret: SecretBytes32) -> Self {
        let signing_key = SigningKey::from_bytes(&secret);
        let public = signing_key.verifying_key().to_bytes();
        Self { secret, public }
    }

    /// The 32-byte Ed25519 public key.
    pub fn public(&self) -> [u8; 32] {
        self.public
    }

    /// Reconstruct the dalek signing key for one signing operation.
    /// `SigningKey` zeroizes itself on drop.
    pub(crate) fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.secret)
    }

    /// Secret bytes, crate-internal. Exposed only so tests and the deriver
    /// can assert determinism; the public API never hands these out.
    #[cfg(test)]
    pub(crate) fn secret_bytes(&self) -> &[u8; 32] {
        &self.secret
    }
}

// Debug must never print key material.
impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &hex::encode(self.public))
            .field("secret", &"<redacted>")
            .finish()
    }
}

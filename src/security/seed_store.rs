//! Seed Store：master seed的唯一属主
//!
//! Raw entropy lives in one `Zeroizing` buffer behind a mutex for the
//! process lifetime. Access is scoped: `with_seed` lends the bytes to a
//! closure and excludes every other reader, writer and the teardown path
//! for exactly that long, so teardown and rotation can zero the buffer
//! without racing a borrower.
//!
//! ## 安全性
//! - ✅ seed bytes从不被copy出作用域
//! - ✅ teardown/rotation时显式清零（不依赖GC/析构时机）
//! - ✅ memlock feature：seed页面锁定在RAM，不写入swap

use hkdf::Hkdf;
use parking_lot::Mutex;
use sha2::Sha256;
use tracing::{info, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::core::errors::SignerError;
use crate::security::memory_protection;
use crate::security::secret::SecretVec;

/// Accepted entropy length range in bytes.
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

/// Owns the master seed for the session. All access is mediated by
/// [`SeedStore::with_seed`]; rotation and teardown take the same lock, so
/// a signer holding the scope blocks both until it exits.
pub struct SeedStore {
    slot: Mutex<Option<SecretVec>>,
}

impl SeedStore {
    /// Initialize the store from raw entropy.
    ///
    /// # Errors
    /// `InvalidSeedLength` if the entropy is outside [16, 64] bytes.
    pub fn new(raw_entropy: &[u8]) -> Result<Self, SignerError> {
        check_seed_length(raw_entropy.len())?;

        let buffer = Zeroizing::new(raw_entropy.to_vec());
        if let Err(e) = memory_protection::pin_buffer(&buffer) {
            // Continue unpinned: zeroization still holds, and mlock quotas
            // are routinely exhausted inside containers.
            warn!("failed to pin seed buffer in memory: {}", e);
        }
        info!(len = buffer.len(), "seed store initialized");

        Ok(Self {
            slot: Mutex::new(Some(buffer)),
        })
    }

    /// Initialize from a BIP-39 mnemonic.
    ///
    /// The phrase is expanded with PBKDF2-HMAC-SHA512 (2048 rounds, the
    /// BIP-39 standard) and the optional passphrase. When an application
    /// salt is supplied, the 64-byte BIP-39 seed is additionally run
    /// through HKDF-SHA256 into a 32-byte master seed; all intermediates
    /// are zeroized.
    pub fn from_mnemonic(
        phrase: &str,
        passphrase: &str,
        app_salt: Option<&[u8]>,
    ) -> Result<Self, SignerError> {
        let mnemonic = bip39::Mnemonic::parse(phrase)
            .map_err(|e| SignerError::Mnemonic(format!("invalid mnemonic: {}", e)))?;

        let mut seed = mnemonic.to_seed(passphrase);

        let entropy: SecretVec = if let Some(salt) = app_salt {
            let hk = Hkdf::<Sha256>::new(Some(salt), &seed[..]);
            let mut okm = Zeroizing::new(vec![0u8; 32]);
            hk.expand(b"hd-signer-master-seed", okm.as_mut())
                .map_err(|_| SignerError::Derivation("HKDF expansion failed".into()))?;
            okm
        } else {
            Zeroizing::new(seed.to_vec())
        };

        seed.zeroize();
        Self::new(&entropy)
    }

    /// Scoped access to the seed bytes for exactly the duration of `f`.
    /// The buffer cannot be copied out of the scope through this API, and
    /// rotation/teardown block until `f` returns.
    ///
    /// # Errors
    /// `Derivation` if the store has already been torn down.
    pub fn with_seed<T>(&self, f: impl FnOnce(&[u8]) -> T) -> Result<T, SignerError> {
        let slot = self.slot.lock();
        match slot.as_ref() {
            Some(buffer) => Ok(f(buffer)),
            None => Err(SignerError::Derivation(
                "seed store has been torn down".into(),
            )),
        }
    }

    /// Replace the seed with fresh entropy, then run `after_swap` while the
    /// exclusive lock is still held.
    ///
    /// The closure is the second half of the rotation transaction: the
    /// engine purges its key cache inside it, so no reader can observe the
    /// new seed next to keys derived from the old one.
    pub fn rotate<T>(
        &self,
        raw_entropy: &[u8],
        after_swap: impl FnOnce() -> T,
    ) -> Result<T, SignerError> {
        check_seed_length(raw_entropy.len())?;

        let mut slot = self.slot.lock();
        if let Some(old) = slot.take() {
            let _ = memory_protection::unpin_buffer(&old);
            drop(old); // zeroizes
        }

        let buffer = Zeroizing::new(raw_entropy.to_vec());
        if let Err(e) = memory_protection::pin_buffer(&buffer) {
            warn!("failed to pin rotated seed buffer in memory: {}", e);
        }
        *slot = Some(buffer);
        info!("seed rotated");

        Ok(after_swap())
    }

    /// Zeroize and drop the seed. Idempotent; subsequent `with_seed` calls
    /// fail.
    pub fn teardown(&self) {
        let mut slot = self.slot.lock();
        if let Some(buffer) = slot.take() {
            let _ = memory_protection::unpin_buffer(&buffer);
            drop(buffer); // zeroizes
            info!("seed store torn down");
        }
    }

    /// Whether the store still holds a seed.
    pub fn is_active(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl Drop for SeedStore {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn check_seed_length(len: usize) -> Result<(), SignerError> {
    if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&len) {
        return Err(SignerError::InvalidSeedLength(len));
    }
    Ok(())
}

/// Generate `len` bytes of fresh OS entropy for seed initialization or
/// rotation. Same length contract as the store itself.
pub fn generate_entropy(len: usize) -> Result<SecretVec, SignerError> {
    use rand::RngCore;

    check_seed_length(len)?;
    let mut entropy = Zeroizing::new(vec![0u8; len]);
    rand::rngs::OsRng.fill_bytes(entropy.as_mut());
    Ok(entropy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_rejects_entropy_outside_range() {
        assert!(matches!(
            SeedStore::new(&[0u8; 15]),
            Err(SignerError::InvalidSeedLength(15))
        ));
        assert!(matches!(
            SeedStore::new(&[0u8; 65]),
            Err(SignerError::InvalidSeedLength(65))
        ));
        assert!(SeedStore::new(&[0u8; 16]).is_ok());
        assert!(SeedStore::new(&[0u8; 64]).is_ok());
    }

    #[test]
    fn test_with_seed_scoped_access() {
        let store = SeedStore::new(&[0xABu8; 32]).unwrap();
        let len = store.with_seed(|seed| {
            assert!(seed.iter().all(|&b| b == 0xAB));
            seed.len()
        });
        assert_eq!(len.unwrap(), 32);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let store = SeedStore::new(&[1u8; 32]).unwrap();
        store.teardown();
        store.teardown();
        assert!(!store.is_active());
        assert!(matches!(
            store.with_seed(|_| ()),
            Err(SignerError::Derivation(_))
        ));
    }

    #[test]
    fn test_rotate_swaps_entropy_and_runs_closure_under_lock() {
        let store = SeedStore::new(&[1u8; 32]).unwrap();
        let mut purged = false;
        store.rotate(&[2u8; 32], || purged = true).unwrap();
        assert!(purged);
        store
            .with_seed(|seed| assert!(seed.iter().all(|&b| b == 2)))
            .unwrap();
    }

    #[test]
    fn test_rotate_rejects_bad_length_without_dropping_seed() {
        let store = SeedStore::new(&[1u8; 32]).unwrap();
        assert!(matches!(
            store.rotate(&[0u8; 8], || ()),
            Err(SignerError::InvalidSeedLength(8))
        ));
        // Old seed must survive a rejected rotation.
        store
            .with_seed(|seed| assert!(seed.iter().all(|&b| b == 1)))
            .unwrap();
    }

    #[test]
    fn test_mnemonic_import_matches_bip39_vector() {
        // BIP-39 seed for the all-"abandon" phrase with empty passphrase.
        let store = SeedStore::from_mnemonic(TEST_MNEMONIC, "", None).unwrap();
        store
            .with_seed(|seed| {
                assert_eq!(
                    hex::encode(seed),
                    "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
                     9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
                );
            })
            .unwrap();
    }

    #[test]
    fn test_mnemonic_app_salt_changes_seed() {
        let plain = SeedStore::from_mnemonic(TEST_MNEMONIC, "", None).unwrap();
        let salted = SeedStore::from_mnemonic(TEST_MNEMONIC, "", Some(b"app-salt-v1")).unwrap();

        let a = plain.with_seed(|s| s.to_vec()).unwrap();
        let b = salted.with_seed(|s| s.to_vec()).unwrap();
        assert_ne!(a, b);
        assert_eq!(b.len(), 32);
    }

    #[test]
    fn test_invalid_mnemonic_rejected() {
        assert!(matches!(
            SeedStore::from_mnemonic("definitely not a mnemonic", "", None),
            Err(SignerError::Mnemonic(_))
        ));
    }

    #[test]
    fn test_generate_entropy_length_contract() {
        assert!(matches!(
            generate_entropy(4),
            Err(SignerError::InvalidSeedLength(4))
        ));
        let entropy = generate_entropy(32).unwrap();
        assert_eq!(entropy.len(), 32);
        // Not all zero, with overwhelming probability.
        assert!(entropy.iter().any(|&b| b != 0));
    }
}

//! 签名引擎核心模块
//!
//! Coordinates the seed store, path deriver, key cache and account manager
//! behind one narrow surface.
//!
//! ## 数据流
//! ```text
//! nextAddress (account, change)
//!    ↓
//! Bip44Path  (validate: 31-bit segments, coin type)
//!    ↓
//! Key Cache ──miss──→ SLIP-0010 Deriver ←── Seed Store (scoped access)
//!    ↓
//! KeyPair (secret stays in the cache entry)
//!    ↓
//! sign (Ed25519, RFC 8032 deterministic)
//!    ↓
//! Signature {publicKey, signature, scheme}
//! ```
//!
//! ## 锁顺序
//! seed lock → cache lock，没有别的顺序。Rotation holds the seed lock
//! across the cache purge, so no reader observes a half-rotated state.

use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::core::account::{AccountManager, ChainState};
use crate::core::config::EngineConfig;
use crate::core::errors::SignerError;
use crate::core::path::Bip44Path;
use crate::crypto::cache::KeyCache;
use crate::crypto::signing::{self, Signature};
use crate::security::seed_store::SeedStore;

/// The key-derivation and signing engine.
///
/// Derivation and signing are CPU-bound and synchronous; callers running a
/// worker pool can sign/verify distinct paths in parallel. The only shared
/// mutable state is the cache (mutex) and the account table (rwlock).
pub struct SigningEngine {
    config: EngineConfig,
    seed: SeedStore,
    cache: Mutex<KeyCache>,
    accounts: RwLock<AccountManager>,
}

impl SigningEngine {
    /// Build an engine over raw seed entropy.
    ///
    /// # Errors
    /// `InvalidSeedLength` if the entropy is outside [16, 64] bytes.
    pub fn new(raw_entropy: &[u8], config: EngineConfig) -> Result<Self, SignerError> {
        let seed = SeedStore::new(raw_entropy)?;
        Ok(Self::assemble(seed, config))
    }

    /// Build an engine from a BIP-39 mnemonic (optional passphrase and
    /// application salt, see [`SeedStore::from_mnemonic`]).
    pub fn from_mnemonic(
        phrase: &str,
        passphrase: &str,
        app_salt: Option<&[u8]>,
        config: EngineConfig,
    ) -> Result<Self, SignerError> {
        let seed = SeedStore::from_mnemonic(phrase, passphrase, app_salt)?;
        Ok(Self::assemble(seed, config))
    }

    fn assemble(seed: SeedStore, config: EngineConfig) -> Self {
        info!(
            coin_type = config.coin_type,
            cache_capacity = config.cache_capacity,
            "signing engine initialized"
        );
        Self {
            seed,
            cache: Mutex::new(KeyCache::new(config.cache_capacity)),
            accounts: RwLock::new(AccountManager::new(config.coin_type)),
            config,
        }
    }

    /// Allocate the next unused address path for (account, change).
    /// Indices are strictly increasing per chain, never reused in-session.
    pub fn next_address(&self, account: u32, change: u32) -> Result<Bip44Path, SignerError> {
        let path = self.accounts.write().next_address(account, change)?;
        Ok(path)
    }

    /// Public key for a path, deriving (and caching) the keypair on first
    /// use. The secret half never leaves the cache.
    pub fn public_key(&self, path: &Bip44Path) -> Result<[u8; 32], SignerError> {
        self.accounts.read().validate(path)?;
        self.seed.with_seed(|seed| {
            let mut cache = self.cache.lock();
            cache
                .get_or_derive(seed, path, self.config.max_zero_key_retries)
                .map(|keypair| keypair.public())
        })?
    }

    /// Sign a message digest with the key at `path`.
    ///
    /// Deterministic (RFC 8032): no randomness is drawn, so the same
    /// (seed, path, digest) always produces the same signature. The seed
    /// scope is held for the duration of the operation; a concurrent
    /// rotation waits until the signature is produced.
    pub fn sign(&self, path: &Bip44Path, message_digest: &[u8]) -> Result<Signature, SignerError> {
        self.accounts.read().validate(path)?;
        let signature = self.seed.with_seed(|seed| {
            let mut cache = self.cache.lock();
            let keypair = cache.get_or_derive(seed, path, self.config.max_zero_key_retries)?;
            Ok::<_, SignerError>(signing::sign_digest(keypair, message_digest))
        })??;
        info!(%path, "message digest signed");
        Ok(signature)
    }

    /// Verify an Ed25519 signature. Pure; any malformed or invalid input
    /// evaluates to `false`, never an error.
    pub fn verify(public_key: &[u8], message_digest: &[u8], signature: &[u8]) -> bool {
        signing::verify_digest(public_key, message_digest, signature)
    }

    /// Rotate the master seed: swap the entropy and purge every cached key
    /// in one exclusive transaction.
    ///
    /// Both steps happen under the seed lock. A signer inside its seed
    /// scope blocks the rotation until the scope exits; conversely no sign
    /// call can run between the swap and the purge.
    pub fn rotate_seed(&self, raw_entropy: &[u8]) -> Result<(), SignerError> {
        self.seed.rotate(raw_entropy, || {
            self.cache.lock().purge();
        })?;
        info!("seed rotated, key cache purged");
        Ok(())
    }

    /// Purge the cache and zeroize the seed. Idempotent; the engine rejects
    /// further derivation afterwards.
    pub fn teardown(&self) {
        self.cache.lock().purge();
        self.seed.teardown();
    }

    /// Lifecycle state of an (account, change) chain.
    pub fn chain_state(&self, account: u32, change: u32) -> ChainState {
        self.accounts.read().chain_state(account, change)
    }

    /// Number of times the deriver has actually run (cache misses).
    pub fn derivation_count(&self) -> u64 {
        self.cache.lock().derivations()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::PathError;

    fn engine() -> SigningEngine {
        SigningEngine::new(&[0u8; 32], EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_sign_then_verify() {
        let engine = engine();
        let path = engine.next_address(0, 0).unwrap();
        let digest = [0x7Fu8; 32];

        let sig = engine.sign(&path, &digest).unwrap();
        assert!(SigningEngine::verify(&sig.public_key, &digest, &sig.signature));
        assert!(!SigningEngine::verify(&sig.public_key, &[0u8; 32], &sig.signature));
    }

    #[test]
    fn test_pinned_public_key_for_default_path() {
        let engine = engine();
        let public_key = engine.public_key(&Bip44Path::iota_default()).unwrap();
        assert_eq!(
            hex::encode(public_key),
            "b6dc1647c67b85e48ae1d24cfbae59c957e9541f7f1d63c68bb104589427bd25"
        );
    }

    #[test]
    fn test_sign_populates_cache_once() {
        let engine = engine();
        let path = Bip44Path::iota_default();

        engine.sign(&path, b"digest-1").unwrap();
        engine.sign(&path, b"digest-2").unwrap();
        engine.public_key(&path).unwrap();

        // 同一路径只派生一次
        assert_eq!(engine.derivation_count(), 1);
    }

    #[test]
    fn test_validation_runs_before_derivation() {
        let engine = engine();

        // Out-of-range segment.
        let bad = Bip44Path::new(4218, 1 << 31, 0, 0);
        assert!(matches!(
            engine.sign(&bad, &[0u8; 32]),
            Err(SignerError::Path(PathError::SegmentOutOfRange { .. }))
        ));

        // Foreign coin type.
        let foreign = Bip44Path::new(60, 0, 0, 0);
        assert!(matches!(
            engine.public_key(&foreign),
            Err(SignerError::Path(PathError::CoinTypeMismatch { .. }))
        ));

        assert_eq!(engine.derivation_count(), 0);
    }

    #[test]
    fn test_rotation_purges_cache_and_changes_keys() {
        let engine = engine();
        let path = Bip44Path::iota_default();

        let before = engine.public_key(&path).unwrap();
        engine.rotate_seed(&[9u8; 32]).unwrap();
        let after = engine.public_key(&path).unwrap();

        assert_ne!(before, after);
        // One derivation before rotation, one after the purge.
        assert_eq!(engine.derivation_count(), 2);
    }

    #[test]
    fn test_teardown_blocks_further_signing() {
        let engine = engine();
        engine.teardown();
        engine.teardown(); // idempotent

        assert!(matches!(
            engine.sign(&Bip44Path::iota_default(), &[0u8; 32]),
            Err(SignerError::Derivation(_))
        ));
    }

    #[test]
    fn test_next_address_monotone_across_chains() {
        let engine = engine();

        let a0 = engine.next_address(0, 0).unwrap();
        let a1 = engine.next_address(0, 0).unwrap();
        let c0 = engine.next_address(0, 1).unwrap();

        assert_eq!((a0.address_index, a1.address_index), (0, 1));
        assert_eq!(c0.address_index, 0);
        assert_eq!(engine.chain_state(0, 0), ChainState::Active);
        assert_eq!(engine.chain_state(7, 0), ChainState::Unused);
    }
}

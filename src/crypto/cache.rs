//! 密钥缓存模块
//!
//! Memoizes derived keypairs per BIP44 path so repeated signing for the
//! same address does not pay the five-level HMAC chain again.
//!
//! ## 生命周期
//! - created on first derivation request for a path
//! - refreshed on access (LRU stamp)
//! - evicted under capacity pressure or explicit purge (seed rotation)
//!
//! Eviction and purge drop the `KeyPair`, whose secret half zeroizes
//! itself. The cache is not internally synchronized; the engine wraps it
//! in a mutex when shared across threads.

use std::collections::HashMap;

use tracing::debug;

use crate::core::errors::SignerError;
use crate::core::path::Bip44Path;
use crate::crypto::keypair::KeyPair;
use crate::crypto::slip10;

struct CacheEntry {
    keypair: KeyPair,
    last_access: u64,
}

/// Capacity-bounded LRU cache of derived keypairs, keyed by path.
pub struct KeyCache {
    capacity: usize,
    /// Monotone access clock; bumped on every lookup.
    clock: u64,
    entries: HashMap<Bip44Path, CacheEntry>,
    hits: u64,
    derivations: u64,
}

impl KeyCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            clock: 0,
            entries: HashMap::new(),
            hits: 0,
            derivations: 0,
        }
    }

    /// Return the cached keypair for `path`, deriving and inserting it on a
    /// miss. The least-recently-used entry is evicted first when the cache
    /// is full.
    pub fn get_or_derive(
        &mut self,
        seed: &[u8],
        path: &Bip44Path,
        max_zero_key_retries: u8,
    ) -> Result<&KeyPair, SignerError> {
        self.clock += 1;
        let now = self.clock;

        if let Some(entry) = self.entries.get_mut(path) {
            entry.last_access = now;
            self.hits += 1;
            debug!(%path, "key cache hit");
            return Ok(&self.entries[path].keypair);
        }

        let keypair = slip10::derive_keypair(seed, path, max_zero_key_retries)?;
        self.derivations += 1;

        if self.entries.len() >= self.capacity {
            self.evict_lru();
        }

        debug!(%path, entries = self.entries.len() + 1, "key cache miss, derived");
        let entry = self.entries.entry(*path).or_insert(CacheEntry {
            keypair,
            last_access: now,
        });
        Ok(&entry.keypair)
    }

    /// Drop the entry with the oldest access stamp. Its secret key material
    /// zeroizes on drop.
    fn evict_lru(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(path, _)| *path);
        if let Some(path) = victim {
            self.entries.remove(&path);
            debug!(%path, "evicted least-recently-used key cache entry");
        }
    }

    /// Zeroize and drop every entry. Must run on seed rotation and teardown
    /// so no key derived from a retired seed survives.
    pub fn purge(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        if dropped > 0 {
            debug!(dropped, "key cache purged");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of times the deriver actually ran.
    pub fn derivations(&self) -> u64 {
        self.derivations
    }

    pub fn contains(&self, path: &Bip44Path) -> bool {
        self.entries.contains_key(path)
    }
}

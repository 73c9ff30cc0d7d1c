//! Account and address lifecycle management.
//!
//! Tracks a monotone address cursor per (account, change) pair and
//! validates caller-supplied paths before they reach the deriver. An
//! address index handed out once is never handed out again within a
//! session.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::core::errors::PathError;
use crate::core::path::{Bip44Path, HARDENED_BIT};

/// Lifecycle state of an (account, change) chain. Chains become `Active`
/// on their first address request and stay active for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Unused,
    Active,
}

#[derive(Debug, Clone, Copy)]
struct ChainCursor {
    state: ChainState,
    next_index: u32,
}

impl Default for ChainCursor {
    fn default() -> Self {
        Self {
            state: ChainState::Unused,
            next_index: 0,
        }
    }
}

/// Enforces path-segment invariants and allocates fresh address indices.
pub struct AccountManager {
    coin_type: u32,
    chains: HashMap<(u32, u32), ChainCursor>,
}

impl AccountManager {
    pub fn new(coin_type: u32) -> Self {
        Self {
            coin_type,
            chains: HashMap::new(),
        }
    }

    /// Allocate the next unused address index for (account, change) and
    /// return the full path. Indices are strictly increasing per chain and
    /// never reused within a session.
    pub fn next_address(&mut self, account: u32, change: u32) -> Result<Bip44Path, PathError> {
        if account >= HARDENED_BIT {
            return Err(PathError::SegmentOutOfRange {
                segment: "account",
                value: account,
            });
        }
        if change >= HARDENED_BIT {
            return Err(PathError::SegmentOutOfRange {
                segment: "change",
                value: change,
            });
        }

        let cursor = self.chains.entry((account, change)).or_default();
        if cursor.next_index >= HARDENED_BIT {
            return Err(PathError::IndexSpaceExhausted { account, change });
        }

        if cursor.state == ChainState::Unused {
            cursor.state = ChainState::Active;
            info!(account, change, "account chain activated");
        }

        let path = Bip44Path::new(self.coin_type, account, change, cursor.next_index);
        cursor.next_index += 1;
        debug!(%path, "allocated address index");
        Ok(path)
    }

    /// Reject out-of-range segments and foreign coin types before any key
    /// material is touched.
    pub fn validate(&self, path: &Bip44Path) -> Result<(), PathError> {
        for (segment, value) in path.named_segments() {
            if value >= HARDENED_BIT {
                return Err(PathError::SegmentOutOfRange { segment, value });
            }
        }
        if path.coin_type != self.coin_type {
            return Err(PathError::CoinTypeMismatch {
                expected: self.coin_type,
                actual: path.coin_type,
            });
        }
        Ok(())
    }

    /// Current lifecycle state of an (account, change) chain.
    pub fn chain_state(&self, account: u32, change: u32) -> ChainState {
        self.chains
            .get(&(account, change))
            .map(|cursor| cursor.state)
            .unwrap_or(ChainState::Unused)
    }
}

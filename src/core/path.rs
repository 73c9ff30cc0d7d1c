//! BIP44 derivation path value type.
//!
//! Path format: m/44'/coin_type'/account'/change'/address_index'
//!
//! Every level is hardened: Ed25519 under SLIP-0010 admits no non-hardened
//! child derivation, so the change and address_index levels are hardened too
//! (unlike secp256k1 BIP44 wallets, which leave the last two levels public).

use serde::{Deserialize, Serialize};

/// BIP44 purpose constant (44').
pub const PURPOSE: u32 = 44;

/// Registered coin types for the ledgers this SDK targets.
pub mod coin_types {
    /// IOTA mainnet, SLIP-0044 registration 4218.
    pub const IOTA: u32 = 4218;

    /// Shimmer, SLIP-0044 registration 4219.
    pub const SHIMMER: u32 = 4219;
}

/// Hardened-index bit: segments at or above this value cannot be expressed.
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// BIP44 derivation path, compared and cached by structural equality.
///
/// Immutable once constructed. All four stored segments are plain 31-bit
/// values; the hardened bit is applied by the deriver, never stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bip44Path {
    /// Cryptocurrency type (4218 = IOTA)
    pub coin_type: u32,
    /// Account index
    pub account: u32,
    /// External/internal chain (0 = receive, 1 = change)
    pub change: u32,
    /// Address index within the chain
    pub address_index: u32,
}

impl Bip44Path {
    pub fn new(coin_type: u32, account: u32, change: u32, address_index: u32) -> Self {
        Self {
            coin_type,
            account,
            change,
            address_index,
        }
    }

    /// Default IOTA path: m/44'/4218'/0'/0'/0'
    pub fn iota_default() -> Self {
        Self::new(coin_types::IOTA, 0, 0, 0)
    }

    /// The five path levels in derivation order, without the hardened bit.
    /// The deriver hardens every level (SLIP-0010 Ed25519 requirement).
    pub fn segments(&self) -> [u32; 5] {
        [
            PURPOSE,
            self.coin_type,
            self.account,
            self.change,
            self.address_index,
        ]
    }

    /// (name, value) pairs for the four caller-controlled segments, used by
    /// validation to report which segment is out of range.
    pub fn named_segments(&self) -> [(&'static str, u32); 4] {
        [
            ("coin_type", self.coin_type),
            ("account", self.account),
            ("change", self.change),
            ("address_index", self.address_index),
        ]
    }
}

impl Default for Bip44Path {
    fn default() -> Self {
        Self::iota_default()
    }
}

impl std::fmt::Display for Bip44Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "m/{}'/{}'/{}'/{}'/{}'",
            PURPOSE, self.coin_type, self.account, self.change, self.address_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_is_iota() {
        let path = Bip44Path::default();
        assert_eq!(path.coin_type, 4218);
        assert_eq!(path.account, 0);
        assert_eq!(path.change, 0);
        assert_eq!(path.address_index, 0);
    }

    #[test]
    fn test_segments_order() {
        let path = Bip44Path::new(coin_types::IOTA, 1, 0, 7);
        assert_eq!(path.segments(), [44, 4218, 1, 0, 7]);
    }

    #[test]
    fn test_display_all_hardened() {
        let path = Bip44Path::new(coin_types::SHIMMER, 2, 1, 5);
        assert_eq!(format!("{}", path), "m/44'/4219'/2'/1'/5'");
    }

    #[test]
    fn test_structural_equality_and_hash() {
        use std::collections::HashMap;

        let a = Bip44Path::new(4218, 0, 0, 3);
        let b = Bip44Path::new(4218, 0, 0, 3);
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a, "entry");
        assert_eq!(map.get(&b), Some(&"entry"));
    }
}

//! SLIP-0010 hardened key derivation for Ed25519.
//!
//! frommaster seed派生BIP44路径密钥
//!
//! ## 算法
//! - Master: I = HMAC-SHA512(Key = "ed25519 seed", Data = seed)
//! - Child:  I = HMAC-SHA512(Key = chain_code, Data = 0x00 || key || ser32(index + 2^31))
//! - IL (32 bytes) = private key, IR (32 bytes) = chain code
//!
//! ## 安全性
//! - ✅ 每一级都是hardened derivation（Ed25519不支持non-hardened）
//! - ✅ Zeroizing：intermediate key material自动清零
//! - ✅ 零密钥输出触发有界tweak重试，超出后显式failed（可审计）
//!
//! Reference: https://github.com/satoshilabs/slips/blob/master/slip-0010.md

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::core::errors::SignerError;
use crate::core::path::{Bip44Path, HARDENED_BIT};
use crate::crypto::keypair::KeyPair;
use crate::security::secret::SecretBytes32;

type HmacSha512 = Hmac<Sha512>;

/// SLIP-0010 master key seed constant for the Ed25519 curve.
const MASTER_SECRET: &[u8] = b"ed25519 seed";

/// One node of the derivation chain: private key half + chain code.
/// Both buffers zeroize on drop; nodes never outlive a single derivation.
struct Node {
    key: SecretBytes32,
    chain_code: SecretBytes32,
}

/// Derive the keypair for a BIP44 path from raw seed bytes.
///
/// Deterministic: identical (seed, path) always yields a bit-identical
/// keypair. Only root-to-leaf paths are materialized; intermediate nodes
/// are dropped (and zeroized) as soon as the next level is computed.
///
/// # Arguments
/// * `seed` - master seed bytes (the Seed Store enforces the length range)
/// * `path` - BIP44 path; every segment must be a 31-bit value
/// * `max_zero_key_retries` - bounded tweak retry for all-zero HMAC output
///
/// # Errors
/// * `SignerError::UnknownPath` - a segment carries the hardened bit,
///   meaning path validation was bypassed upstream
/// * `SignerError::Derivation` - an HMAC step produced an all-zero key
///   even after the bounded tweak retry
pub fn derive_keypair(
    seed: &[u8],
    path: &Bip44Path,
    max_zero_key_retries: u8,
) -> Result<KeyPair, SignerError> {
    // Invariant re-check: the Account Manager validates paths before they
    // reach this point. A set hardened bit here means that step was skipped.
    for (name, value) in path.named_segments() {
        if value >= HARDENED_BIT {
            return Err(SignerError::UnknownPath(format!(
                "segment '{}' = {:#x} carries the hardened bit",
                name, value
            )));
        }
    }

    let mut node = master_node(seed, max_zero_key_retries)?;
    for segment in path.segments() {
        node = child_node(&node, segment, max_zero_key_retries)?;
    }

    Ok(KeyPair::from_secret(node.key))
}

/// Master node: I = HMAC-SHA512("ed25519 seed", seed).
fn master_node(seed: &[u8], max_zero_key_retries: u8) -> Result<Node, SignerError> {
    for tweak in 0..=max_zero_key_retries {
        let mut mac = HmacSha512::new_from_slice(MASTER_SECRET)
            .map_err(|e| SignerError::Derivation(format!("HMAC initialization failed: {}", e)))?;
        mac.update(seed);
        if tweak > 0 {
            mac.update(&[tweak]);
        }
        if let Some(node) = split_digest(mac) {
            if tweak > 0 {
                tracing::warn!(tweak, "master key derivation required zero-key tweak");
            }
            return Ok(node);
        }
    }
    Err(SignerError::Derivation(format!(
        "master HMAC output was all-zero after {} tweak retries",
        max_zero_key_retries
    )))
}

/// Hardened child: I = HMAC-SHA512(chain_code, 0x00 || key || ser32(index')).
fn child_node(parent: &Node, index: u32, max_zero_key_retries: u8) -> Result<Node, SignerError> {
    let hardened_index = index | HARDENED_BIT;

    for tweak in 0..=max_zero_key_retries {
        let mut mac = HmacSha512::new_from_slice(parent.chain_code.as_ref())
            .map_err(|e| SignerError::Derivation(format!("HMAC initialization failed: {}", e)))?;
        mac.update(&[0x00]);
        mac.update(parent.key.as_ref());
        mac.update(&hardened_index.to_be_bytes());
        if tweak > 0 {
            mac.update(&[tweak]);
        }
        if let Some(node) = split_digest(mac) {
            if tweak > 0 {
                tracing::warn!(index, tweak, "child key derivation required zero-key tweak");
            }
            return Ok(node);
        }
    }
    Err(SignerError::Derivation(format!(
        "child HMAC output for index {}' was all-zero after {} tweak retries",
        index, max_zero_key_retries
    )))
}

/// Split a finalized HMAC into (IL = key, IR = chain code), rejecting an
/// all-zero IL. The 64-byte digest buffer is zeroized before return.
fn split_digest(mac: HmacSha512) -> Option<Node> {
    let digest = mac.finalize().into_bytes();
    let mut buf = Zeroizing::new([0u8; 64]);
    buf.copy_from_slice(&digest);

    if buf[..32].iter().all(|&b| b == 0) {
        return None;
    }

    let mut key = Zeroizing::new([0u8; 32]);
    let mut chain_code = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&buf[..32]);
    chain_code.copy_from_slice(&buf[32..]);
    Some(Node { key, chain_code })
}

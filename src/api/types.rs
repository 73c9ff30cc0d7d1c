//! Boundary DTOs for the binding/marshalling layer.
//!
//! The wire schema is fixed by the SDK bindings: binary fields are
//! `0x`-prefixed lowercase hex strings, the signature scheme is an integer
//! tag (`type`, 0 = Ed25519), and path segments are plain integers with
//! field defaults (coin type defaults to the IOTA registration). Internal
//! representations (raw byte arrays, cache structures) stay behind this
//! module.

use serde::{Deserialize, Serialize};

use crate::core::errors::SignerError;
use crate::core::path::{coin_types, Bip44Path};
use crate::crypto::keypair::SignatureScheme;
use crate::crypto::signing::Signature;

/// Encode binary data the way the bindings expect: `0x` + lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a hex field, accepting the `0x` prefix or bare hex.
pub fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, SignerError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(stripped)
        .map_err(|e| SignerError::Encoding(format!("field '{}' is not valid hex: {}", field, e)))
}

/// An Ed25519 signature as the bindings see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ed25519Signature {
    /// The Ed25519 public key, hex-encoded.
    pub public_key: String,
    /// The Ed25519 signature of some message, hex-encoded.
    pub signature: String,
    /// The signature scheme tag. 0 = Ed25519; other values reserved.
    #[serde(rename = "type", default)]
    pub kind: u8,
}

impl From<Signature> for Ed25519Signature {
    fn from(sig: Signature) -> Self {
        Self {
            public_key: encode_hex(&sig.public_key),
            signature: encode_hex(&sig.signature),
            kind: sig.scheme.tag(),
        }
    }
}

impl TryFrom<Ed25519Signature> for Signature {
    type Error = SignerError;

    fn try_from(dto: Ed25519Signature) -> Result<Self, Self::Error> {
        let scheme = SignatureScheme::from_tag(dto.kind).ok_or_else(|| {
            SignerError::Encoding(format!("unsupported signature scheme tag: {}", dto.kind))
        })?;

        let public_key: [u8; 32] = decode_hex("publicKey", &dto.public_key)?
            .try_into()
            .map_err(|bytes: Vec<u8>| {
                SignerError::Encoding(format!("publicKey must be 32 bytes, got {}", bytes.len()))
            })?;
        let signature: [u8; 64] = decode_hex("signature", &dto.signature)?
            .try_into()
            .map_err(|bytes: Vec<u8>| {
                SignerError::Encoding(format!("signature must be 64 bytes, got {}", bytes.len()))
            })?;

        Ok(Signature {
            public_key,
            signature,
            scheme,
        })
    }
}

/// A BIP44 chain as the bindings see it. Every field has a wire default:
/// the coin type falls back to the IOTA registration, the rest to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44 {
    #[serde(default = "Bip44::default_coin_type")]
    pub coin_type: u32,
    #[serde(default)]
    pub account: u32,
    #[serde(default)]
    pub change: u32,
    #[serde(default)]
    pub address_index: u32,
}

impl Bip44 {
    fn default_coin_type() -> u32 {
        coin_types::IOTA
    }
}

impl Default for Bip44 {
    fn default() -> Self {
        Self {
            coin_type: Self::default_coin_type(),
            account: 0,
            change: 0,
            address_index: 0,
        }
    }
}

impl From<Bip44Path> for Bip44 {
    fn from(path: Bip44Path) -> Self {
        Self {
            coin_type: path.coin_type,
            account: path.account,
            change: path.change,
            address_index: path.address_index,
        }
    }
}

impl From<Bip44> for Bip44Path {
    // Segment ranges are validated by the Account Manager, not here: the
    // DTO mirrors whatever the binding sent.
    fn from(dto: Bip44) -> Self {
        Bip44Path::new(dto.coin_type, dto.account, dto.change, dto.address_index)
    }
}

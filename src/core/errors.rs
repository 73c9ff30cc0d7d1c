//! Error types for the signing core.
//!
//! The taxonomy mirrors the recovery policy: `Path` errors are caller-input
//! validation failures and are always recoverable; `Derivation` is fatal for
//! the affected path but recoverable at the account level; `UnknownPath`
//! indicates a bypassed validation step and should not occur in correct
//! usage. Signature verification failures are booleans, never errors.

/// Validation failures for a BIP44 path, rejected before derivation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A segment does not fit in 31 bits (the top bit is reserved for the
    /// BIP32 hardened-index encoding).
    #[error("path segment '{segment}' out of range: {value} (must be < 2^31)")]
    SegmentOutOfRange { segment: &'static str, value: u32 },

    /// The path carries a coin type other than the one this engine is
    /// configured for.
    #[error("coin type mismatch: expected {expected}, got {actual}")]
    CoinTypeMismatch { expected: u32, actual: u32 },

    /// The monotone address counter for an (account, change) pair has
    /// reached the end of the 31-bit index space.
    #[error("address index space exhausted for account {account}, change {change}")]
    IndexSpaceExhausted { account: u32, change: u32 },
}

/// Top-level error type for the derivation/signing engine.
#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    /// Seed entropy outside the accepted [16, 64] byte range.
    #[error("invalid seed length: {0} bytes (expected 16..=64)")]
    InvalidSeedLength(usize),

    /// Hierarchical derivation failed (zero HMAC output past the bounded
    /// tweak retry, or the seed store was torn down mid-session).
    #[error("key derivation failed: {0}")]
    Derivation(String),

    /// Path rejected by validation.
    #[error("invalid derivation path: {0}")]
    Path(#[from] PathError),

    /// An unvalidated path reached the deriver/signer. Internal invariant
    /// violation: `validate` must run before any key material is touched.
    #[error("unvalidated path reached the signer: {0}")]
    UnknownPath(String),

    /// Mnemonic parsing/derivation failed during seed import.
    #[error("mnemonic error: {0}")]
    Mnemonic(String),

    /// Boundary encoding/decoding failed (hex fields, scheme tag).
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl SignerError {
    /// Whether the caller can recover by fixing its input and retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SignerError::Path(_) | SignerError::Mnemonic(_) | SignerError::Encoding(_)
        )
    }

    /// Whether this error indicates a broken internal invariant rather than
    /// bad input or bad luck.
    pub fn is_internal(&self) -> bool {
        matches!(self, SignerError::UnknownPath(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_seed_length() {
        let err = SignerError::InvalidSeedLength(8);
        assert_eq!(
            format!("{}", err),
            "invalid seed length: 8 bytes (expected 16..=64)"
        );
    }

    #[test]
    fn test_path_error_lowers_into_signer_error() {
        let path_err = PathError::SegmentOutOfRange {
            segment: "account",
            value: 0x8000_0000,
        };
        let err: SignerError = path_err.clone().into();
        match err {
            SignerError::Path(inner) => assert_eq!(inner, path_err),
            other => panic!("expected Path variant, got {:?}", other),
        }
    }

    #[test]
    fn test_recoverability_classification() {
        assert!(SignerError::Path(PathError::CoinTypeMismatch {
            expected: 4218,
            actual: 60
        })
        .is_recoverable());
        assert!(!SignerError::Derivation("zero key".into()).is_recoverable());
        assert!(SignerError::UnknownPath("hardened bit set".into()).is_internal());
        assert!(!SignerError::InvalidSeedLength(8).is_internal());
    }
}

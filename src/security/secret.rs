//! Small helpers and aliases for secret buffers that must be zeroized on drop.
use zeroize::Zeroizing;

/// Common alias for secret byte buffers which will be zeroed when dropped.
/// The seed store keeps its entropy in one of these.
pub type SecretVec = Zeroizing<Vec<u8>>;

/// Fixed-size secret, zeroed on drop. Derived private keys and SLIP-0010
/// chain codes use this shape.
pub type SecretBytes32 = Zeroizing<[u8; 32]>;

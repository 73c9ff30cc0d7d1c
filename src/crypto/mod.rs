pub mod cache;
pub mod keypair;
pub mod signing;
pub mod slip10;

pub use self::cache::KeyCache;
pub use self::keypair::{KeyPair, SignatureScheme};
pub use self::signing::{sign_digest, verify_digest, Signature};
pub use self::slip10::derive_keypair;

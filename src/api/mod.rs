pub mod types;

pub use self::types::{decode_hex, encode_hex, Bip44, Ed25519Signature};

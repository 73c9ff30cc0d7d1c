pub mod account;
pub mod config;
pub mod engine;
pub mod errors;
pub mod path;

pub use self::account::{AccountManager, ChainState};
pub use self::config::EngineConfig;
pub use self::engine::SigningEngine;
pub use self::errors::{PathError, SignerError};
pub use self::path::Bip44Path;

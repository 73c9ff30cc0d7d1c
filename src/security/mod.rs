pub mod memory_protection;
pub mod secret;
pub mod seed_store;

pub use self::secret::{SecretBytes32, SecretVec};
pub use self::seed_store::{generate_entropy, SeedStore, MAX_SEED_LEN, MIN_SEED_LEN};

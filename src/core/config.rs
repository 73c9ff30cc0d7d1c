use serde::{Deserialize, Serialize};

use crate::core::path::coin_types;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Coin type this engine derives for (SLIP-0044 registration)
    #[serde(default = "EngineConfig::default_coin_type")]
    pub coin_type: u32,

    /// Key cache capacity (entries)
    #[serde(default = "EngineConfig::default_cache_capacity")]
    pub cache_capacity: usize,

    /// Bounded retry count for the zero-key HMAC tweak (astronomically rare)
    #[serde(default = "EngineConfig::default_max_zero_key_retries")]
    pub max_zero_key_retries: u8,
}

impl EngineConfig {
    fn default_coin_type() -> u32 {
        coin_types::IOTA
    }
    fn default_cache_capacity() -> usize {
        1000
    }
    fn default_max_zero_key_retries() -> u8 {
        3
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            coin_type: Self::default_coin_type(),
            cache_capacity: Self::default_cache_capacity(),
            max_zero_key_retries: Self::default_max_zero_key_retries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.coin_type, 4218);
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.max_zero_key_retries, 3);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"cache_capacity": 16}"#).unwrap();
        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.coin_type, 4218);
        assert_eq!(config.max_zero_key_retries, 3);
    }
}

use crate::core::dirs::get_config_directory;
use crate::core::error::SvnNavigatorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache time-to-live settings, one per cache family, in seconds
///
/// A value of zero means the family never expires on its own and is removed
/// only by explicit invalidation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtlConfig {
    pub listing_secs: u64,
    pub shallow_status_secs: u64,
    pub deep_status_secs: u64,
    pub versioned_secs: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            listing_secs: 300,
            shallow_status_secs: 30,
            deep_status_secs: 120,
            versioned_secs: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Entries processed per scanner batch before yielding
    pub batch_size: usize,
    /// Simultaneously running operations admitted by the queue
    pub max_concurrent: usize,
    /// Retry limit for failed operations
    pub max_retries: u32,
    /// Quiet period before a watch-triggered rescan fires
    pub debounce_ms: u64,
    /// Cache family TTLs
    pub cache_ttl: CacheTtlConfig,
    /// Entry count above which the lazy chunk loader backs the listing
    pub large_threshold: usize,
    /// Entries fetched per lazy-loader chunk
    pub chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_concurrent: 3,
            max_retries: 3,
            debounce_ms: 1000,
            cache_ttl: CacheTtlConfig::default(),
            large_threshold: 10_000,
            chunk_size: 500,
        }
    }
}

impl EngineConfig {
    pub fn load_or_create() -> Result<Self, SvnNavigatorError> {
        let config_dir = get_config_directory()?;
        let config_file = config_dir.join("config.json");

        if config_file.exists() {
            let content = std::fs::read_to_string(&config_file)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<(), SvnNavigatorError> {
        let config_dir = get_config_directory()?;
        std::fs::create_dir_all(&config_dir)?;

        let config_file = config_dir.join("config.json");
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_file, content)
            .map_err(|e| SvnNavigatorError::config_write_failed(&config_file, e))?;

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_engine_contract() {
        let config = EngineConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.large_threshold, 10_000);
    }

    #[test]
    fn test_default_ttls() {
        let ttl = CacheTtlConfig::default();
        assert_eq!(ttl.listing_secs, 300);
        assert_eq!(ttl.shallow_status_secs, 30);
        assert_eq!(ttl.deep_status_secs, 120);
        assert_eq!(ttl.versioned_secs, 0);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = EngineConfig {
            batch_size: 50,
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}

use crate::compression::Compression;
use serde::Deserialize;

const DEFAULT_MAX_ENTRIES: u64 = 100_000;
const DEFAULT_TTL_SECS: u64 = 900;

/// Result cache configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// How long a stored result stays valid
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default)]
    pub compression: Compression,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl_secs: DEFAULT_TTL_SECS,
            compression: Compression::default(),
        }
    }
}

fn default_max_entries() -> u64 {
    DEFAULT_MAX_ENTRIES
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_yields_defaults() {
        let config: CacheConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, CacheConfig::default());
        assert_eq!(config.ttl_secs, 900);
        assert_eq!(config.compression, Compression::Gzip);
    }

    #[test]
    fn fields_override_defaults() {
        let config: CacheConfig = serde_yaml::from_str(
            "max_entries: 42\nttl_secs: 30\ncompression: none\n",
        )
        .unwrap();
        assert_eq!(config.max_entries, 42);
        assert_eq!(config.ttl_secs, 30);
        assert_eq!(config.compression, Compression::None);
    }
}

use aggregator::config::Config as AggregatorConfig;
use farecache::CacheConfig;
use serde::Deserialize;
use std::fs::File;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset, e.g. "info" or
    /// "aggregator=debug,info"
    pub level: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub aggregator: AggregatorConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.aggregator.validate()?;

        Ok(config)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] aggregator::config::ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use farecache::Compression;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn full_config() {
        let yaml = r#"
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            logging:
                level: info
            aggregator:
                listener:
                    host: 0.0.0.0
                    port: 8080
                request_timeout_ms: 1500
                providers:
                    - name: alpha
                      delay_ms: 200
                      offers: 5
            cache:
                max_entries: 5000
                ttl_secs: 600
                compression: gzip
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        assert_eq!(config.aggregator.listener.port, 8080);
        assert_eq!(config.aggregator.providers.len(), 1);
        assert_eq!(config.cache.ttl_secs, 600);
        assert_eq!(config.cache.compression, Compression::Gzip);
        let metrics = config.common.metrics.expect("metrics config");
        assert_eq!(metrics.statsd_port, 8125);
    }

    #[test]
    fn minimal_config_defaults_cache_and_observability() {
        let yaml = r#"
            aggregator:
                listener:
                    host: 127.0.0.1
                    port: 9000
                request_timeout_ms: 1000
                providers: []
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");

        assert!(config.common.metrics.is_none());
        assert!(config.common.logging.is_none());
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn invalid_aggregator_section_is_rejected() {
        let yaml = r#"
            aggregator:
                listener:
                    host: 127.0.0.1
                    port: 0
                request_timeout_ms: 1000
                providers: []
            "#;
        let tmp = write_tmp_file(yaml);
        assert!(matches!(
            Config::from_file(tmp.path()),
            Err(ConfigError::InvalidConfig(_))
        ));
    }
}
